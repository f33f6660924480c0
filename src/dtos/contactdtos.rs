use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::contactmodels::*;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ContactMessageDto {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 7, max = 20, message = "Phone number must be between 7-20 characters"))]
    pub phone: Option<String>,

    #[validate(length(min = 1, max = 300, message = "Subject is required"))]
    pub subject: String,

    #[validate(length(min = 10, message = "Message must be at least 10 characters"))]
    pub message: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UserRequestDto {
    #[validate(length(min = 1, max = 200, message = "Full name is required"))]
    pub full_name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 1, max = 300, message = "Subject is required"))]
    pub subject: String,

    #[validate(length(min = 10, message = "Message must be at least 10 characters"))]
    pub message: String,
}

#[derive(Serialize, Deserialize, Validate, Default)]
pub struct ContactListQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
    pub status: Option<ContactStatus>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ContactReplyDto {
    #[validate(length(min = 1, max = 5000, message = "Reply is required"))]
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct ContactMessageResponseDto {
    pub status: String,
    pub contact: ContactMessage,
}

#[derive(Debug, Serialize)]
pub struct ContactListResponseDto {
    pub status: String,
    pub contacts: Vec<ContactMessage>,
    pub results: i64,
}

#[derive(Debug, Serialize)]
pub struct UserRequestResponseDto {
    pub status: String,
    pub request: UserRequest,
}

#[derive(Debug, Serialize)]
pub struct UserRequestListResponseDto {
    pub status: String,
    pub requests: Vec<UserRequest>,
    pub results: usize,
}
