use std::env;

/// Runtime configuration, read once at startup and passed to whoever needs
/// it. Nothing below this layer touches the environment.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub client_url: String,
    /// When set, a photo that fails the type or size check rejects the whole
    /// request instead of being silently dropped.
    pub strict_uploads: bool,
    pub image_host: String,
    pub cloudinary: Option<CloudinaryConfig>,
}

#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl Config {
    pub fn from_env() -> Config {
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);
        let client_url =
            env::var("CLIENT_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let strict_uploads = env::var("STRICT_UPLOADS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let image_host = env::var("IMAGE_HOST").unwrap_or_else(|_| "cloudinary".to_string());

        let cloudinary = match (
            env::var("CLOUDINARY_CLOUD_NAME"),
            env::var("CLOUDINARY_API_KEY"),
            env::var("CLOUDINARY_API_SECRET"),
        ) {
            (Ok(cloud_name), Ok(api_key), Ok(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => None,
        };

        Config {
            database_url,
            port,
            jwt_secret,
            client_url,
            strict_uploads,
            image_host,
            cloudinary,
        }
    }
}
