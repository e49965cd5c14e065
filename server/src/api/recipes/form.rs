use crate::api::ApiError;
use crate::images;
use crate::models::Category;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::multipart::{Multipart, MultipartError},
    http::StatusCode,
};
use utoipa::ToSchema;

/// Photos above this size are dropped (or rejected under strict uploads).
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Transport cap for the whole multipart body. Slightly above the photo
/// limit so an oversized photo hits the friendly check first.
pub const MAX_UPLOAD_BODY_BYTES: usize = 6 * 1024 * 1024;

/// Documentation shape of the multipart body for creating or updating a
/// recipe. The list fields are JSON-encoded arrays of strings.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct RecipeUpload {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub categories: String,
    #[schema(value_type = String, format = Binary)]
    pub photo: Option<Vec<u8>>,
}

/// One uploaded file, with whatever metadata the client claimed for it.
pub struct PhotoField {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Raw recipe fields as they came off the wire, before validation.
#[derive(Default)]
pub struct RecipeForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub categories: Vec<String>,
    pub photo: Option<PhotoField>,
}

/// A recipe payload that passed validation.
pub struct ValidatedRecipe {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub categories: Vec<Category>,
    pub photo: Option<PhotoField>,
}

impl RecipeForm {
    /// Drains a multipart request into a form. Unknown fields are ignored.
    pub async fn collect(mut multipart: Multipart) -> Result<RecipeForm, ApiError> {
        let mut form = RecipeForm::default();
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "title" => form.title = Some(field.text().await.map_err(multipart_error)?),
                "description" => {
                    form.description = Some(field.text().await.map_err(multipart_error)?);
                }
                "ingredients" => {
                    form.ingredients =
                        coerce_string_list(&field.text().await.map_err(multipart_error)?);
                }
                "instructions" => {
                    form.instructions =
                        coerce_string_list(&field.text().await.map_err(multipart_error)?);
                }
                "categories" => {
                    form.categories =
                        coerce_string_list(&field.text().await.map_err(multipart_error)?);
                }
                "photo" => {
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await.map_err(multipart_error)?;
                    form.photo = Some(PhotoField {
                        file_name,
                        content_type,
                        data,
                    });
                }
                _ => {}
            }
        }
        Ok(form)
    }

    pub fn validate(self) -> Result<ValidatedRecipe, ApiError> {
        let title = self.title.unwrap_or_default();
        let title_len = title.chars().count();
        if !(3..=100).contains(&title_len) {
            return Err(validation("title must be between 3 and 100 characters"));
        }

        let description = self.description.unwrap_or_default();
        let description_len = description.chars().count();
        if !(10..=500).contains(&description_len) {
            return Err(validation(
                "description must be between 10 and 500 characters",
            ));
        }

        if self.ingredients.is_empty() {
            return Err(validation("at least one ingredient is required"));
        }
        if self.ingredients.iter().any(|i| i.trim().is_empty()) {
            return Err(validation("ingredients must not contain empty entries"));
        }

        if self.instructions.is_empty() {
            return Err(validation("at least one instruction step is required"));
        }
        if self.instructions.iter().any(|i| i.trim().is_empty()) {
            return Err(validation("instructions must not contain empty entries"));
        }

        if self.categories.is_empty() {
            return Err(validation("at least one category is required"));
        }
        let mut categories = Vec::with_capacity(self.categories.len());
        for raw in &self.categories {
            match Category::parse(raw) {
                Some(category) => categories.push(category),
                None => {
                    return Err(ApiError::Validation(format!("unknown category: {raw}")));
                }
            }
        }

        Ok(ValidatedRecipe {
            title,
            description,
            ingredients: self.ingredients,
            instructions: self.instructions,
            categories,
            photo: self.photo,
        })
    }
}

/// List fields arrive as JSON-encoded strings. Anything that does not parse
/// as a list of strings quietly becomes the empty list, and validation then
/// rejects the empty list. The coercion itself never fails a request.
pub fn coerce_string_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Decides the stored photo URL for an upload, if any. Invalid photos are
/// logged and dropped unless strict uploads are on.
pub async fn resolve_photo_url(
    state: &AppState,
    photo: Option<PhotoField>,
) -> Result<Option<String>, ApiError> {
    let Some(photo) = photo else {
        return Ok(None);
    };

    let supported =
        images::is_supported_image(photo.content_type.as_deref(), photo.file_name.as_deref());
    if !supported {
        if state.config.strict_uploads {
            return Err(ApiError::Upload(
                "Only image files are allowed (jpeg, jpg, png, gif, webp, heic, heif)".to_string(),
            ));
        }
        tracing::warn!(
            "Dropping photo with unsupported type {:?} ({:?})",
            photo.content_type,
            photo.file_name
        );
        return Ok(None);
    }
    if photo.data.len() > MAX_PHOTO_BYTES {
        if state.config.strict_uploads {
            return Err(ApiError::Upload(
                "File too large. Maximum size is 5MB".to_string(),
            ));
        }
        tracing::warn!("Dropping oversized photo ({} bytes)", photo.data.len());
        return Ok(None);
    }

    let content_type = photo
        .content_type
        .as_deref()
        .unwrap_or("application/octet-stream");
    let uploaded = state.images.upload(content_type, &photo.data).await?;
    Ok(Some(uploaded.url))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::Upload("File too large. Maximum size is 5MB".to_string())
    } else {
        ApiError::Upload(err.body_text())
    }
}

fn validation(message: &str) -> ApiError {
    ApiError::Validation(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RecipeForm {
        RecipeForm {
            title: Some("Shakshuka".to_string()),
            description: Some("Eggs poached in spiced tomato sauce.".to_string()),
            ingredients: vec!["6 eggs".to_string(), "4 tomatoes".to_string()],
            instructions: vec!["Simmer the sauce.".to_string(), "Add eggs.".to_string()],
            categories: vec!["Breakfast".to_string(), "Vegan".to_string()],
            photo: None,
        }
    }

    #[test]
    fn coerces_json_lists() {
        assert_eq!(
            coerce_string_list(r#"["flour", "water"]"#),
            vec!["flour".to_string(), "water".to_string()]
        );
        assert_eq!(coerce_string_list("[]"), Vec::<String>::new());
    }

    #[test]
    fn malformed_lists_coerce_to_empty() {
        assert!(coerce_string_list("not json").is_empty());
        assert!(coerce_string_list(r#"{"a": 1}"#).is_empty());
        assert!(coerce_string_list("[1, 2, 3]").is_empty());
        assert!(coerce_string_list("").is_empty());
    }

    #[test]
    fn valid_form_passes() {
        let validated = form().validate().unwrap();
        assert_eq!(validated.title, "Shakshuka");
        assert_eq!(
            validated.categories,
            vec![Category::Breakfast, Category::Vegan]
        );
    }

    #[test]
    fn title_bounds() {
        let mut f = form();
        f.title = Some("ab".to_string());
        assert!(f.validate().is_err());

        let mut f = form();
        f.title = Some("x".repeat(101));
        assert!(f.validate().is_err());

        let mut f = form();
        f.title = None;
        assert!(f.validate().is_err());
    }

    #[test]
    fn description_bounds() {
        let mut f = form();
        f.description = Some("too short".to_string());
        assert!(f.validate().is_err());

        let mut f = form();
        f.description = Some("y".repeat(501));
        assert!(f.validate().is_err());
    }

    #[test]
    fn lists_must_be_present_and_non_empty() {
        let mut f = form();
        f.ingredients.clear();
        assert!(f.validate().is_err());

        let mut f = form();
        f.instructions = vec!["  ".to_string()];
        assert!(f.validate().is_err());
    }

    #[test]
    fn unknown_categories_are_rejected() {
        let mut f = form();
        f.categories = vec!["Fish".to_string()];
        let err = f.validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let mut f = form();
        f.categories = vec!["breakfast".to_string()];
        assert!(f.validate().is_err());
    }

    #[test]
    fn garbage_category_payload_fails_validation_not_parsing() {
        let mut f = form();
        f.categories = coerce_string_list("oops");
        assert!(f.validate().is_err());
    }
}
