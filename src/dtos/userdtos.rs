use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::usermodel::*;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,

    #[validate(
        length(min = 1, message = "Confirm Password is required"),
        must_match(other = "password", message = "passwords do not match")
    )]
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: String,

    /// client or freelancer; admin accounts are never self-registered.
    pub role: Option<RegisterRole>,
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RegisterRole {
    #[default]
    Client,
    Freelancer,
}

impl From<RegisterRole> for UserRole {
    fn from(role: RegisterRole) -> Self {
        match role {
            RegisterRole::Client => UserRole::Client,
            RegisterRole::Freelancer => UserRole::Freelancer,
        }
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct VerifyEmailQueryDto {
    #[validate(length(min = 1, message = "Token is required."))]
    pub token: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ResendVerificationEmailDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct RequestQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateUserProfileDto {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: Option<String>,

    #[validate(length(min = 7, max = 20, message = "Phone number must be between 7-20 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 1000, message = "Bio must be at most 1000 characters"))]
    pub bio: Option<String>,

    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct AvatarUpdateDto {
    #[validate(url(message = "Avatar URL must be a valid URL"))]
    pub avatar_url: String,
}

#[derive(Debug, Validate, Default, Clone, Serialize, Deserialize)]
pub struct UserPasswordUpdateDto {
    #[validate(
        length(min = 1, message = "New password is required."),
        length(min = 6, message = "new password must be at least 6 characters")
    )]
    pub new_password: String,

    #[validate(
        length(min = 1, message = "New password confirm is required."),
        length(min = 6, message = "new password confirm must be at least 6 characters"),
        must_match(other = "new_password", message = "new passwords do not match")
    )]
    pub new_password_confirm: String,

    #[validate(
        length(min = 1, message = "Old password is required."),
        length(min = 6, message = "Old password must be at least 6 characters")
    )]
    pub old_password: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct FreelancerProfileUpdateDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    // Comma separated list
    pub skills: Option<String>,

    #[validate(range(min = 0, max = 60, message = "Experience years must be 0-60"))]
    pub experience_years: Option<i32>,

    pub hourly_rate: Option<BigDecimal>,

    #[validate(length(max = 100))]
    pub city: Option<String>,

    #[validate(length(max = 100))]
    pub country: Option<String>,

    #[validate(url(message = "Portfolio URL must be a valid URL"))]
    pub portfolio_url: Option<String>,

    #[validate(url(message = "GitHub URL must be a valid URL"))]
    pub github_url: Option<String>,

    #[validate(url(message = "LinkedIn URL must be a valid URL"))]
    pub linkedin_url: Option<String>,

    pub is_available: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub avatar_url: Option<String>,
    pub verified: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            first_name: user.first_name.to_owned(),
            last_name: user.last_name.to_owned(),
            email: user.email.to_owned(),
            role: user.role.to_str().to_string(),
            phone: user.phone.clone(),
            bio: user.bio.clone(),
            website: user.website.clone(),
            avatar_url: user.avatar_url.clone(),
            verified: user.verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    pub fn filter_users(users: &[User]) -> Vec<FilterUserDto> {
        users.iter().map(FilterUserDto::filter_user).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponseDto {
    pub status: String,
    pub data: UserData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponseDto {
    pub status: String,
    pub users: Vec<FilterUserDto>,
    pub results: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
}

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct FreelancerProfileData {
    pub profile: FreelancerProfile,
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FreelancerProfileResponseDto {
    pub status: String,
    pub data: FreelancerProfileData,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_projects: i64,
    pub active_projects: i64,
    pub completed_projects: i64,
    pub total_earnings: BigDecimal,
    pub unread_messages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_dto_rejects_password_mismatch() {
        let dto = RegisterUserDto {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
            password_confirm: "secret2".to_string(),
            role: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn register_dto_rejects_bad_email() {
        let dto = RegisterUserDto {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
            password_confirm: "secret1".to_string(),
            role: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn register_dto_valid() {
        let dto = RegisterUserDto {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
            password_confirm: "secret1".to_string(),
            role: Some(RegisterRole::Freelancer),
        };
        assert!(dto.validate().is_ok());
        assert_eq!(
            UserRole::from(dto.role.unwrap()),
            UserRole::Freelancer
        );
    }

    #[test]
    fn register_role_never_maps_to_admin() {
        assert_eq!(UserRole::from(RegisterRole::Client), UserRole::Client);
        assert_eq!(
            UserRole::from(RegisterRole::Freelancer),
            UserRole::Freelancer
        );
    }
}
