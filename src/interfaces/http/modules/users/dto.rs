//! User profile DTOs

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Profile update request. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}
