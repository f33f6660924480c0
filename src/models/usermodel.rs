use bigdecimal::BigDecimal;
use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Client,
    Freelancer,
    Admin,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Client => "client",
            UserRole::Freelancer => "freelancer",
            UserRole::Admin => "admin",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub avatar_url: Option<String>,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,
    pub token_expires_at: Option<DateTime<Utc>>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim().to_string();
        if name.is_empty() {
            self.email.clone()
        } else {
            name
        }
    }

    pub fn is_freelancer(&self) -> bool {
        self.role == UserRole::Freelancer
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct FreelancerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    // Comma separated, see skills_list()
    pub skills: String,
    pub experience_years: i32,
    pub hourly_rate: Option<BigDecimal>,
    pub city: String,
    pub country: String,
    pub portfolio_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub is_available: bool,
    pub is_verified: bool,
    // Denormalized, corrected by the stats sync job
    pub total_projects: i32,
    pub total_earnings: BigDecimal,
    pub rating: BigDecimal,
    pub rating_count: i32,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl FreelancerProfile {
    pub fn skills_list(&self) -> Vec<String> {
        self.skills
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_to_str() {
        assert_eq!(UserRole::Client.to_str(), "client");
        assert_eq!(UserRole::Freelancer.to_str(), "freelancer");
        assert_eq!(UserRole::Admin.to_str(), "admin");
    }

    fn sample_profile(skills: &str) -> FreelancerProfile {
        FreelancerProfile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Backend Developer".to_string(),
            skills: skills.to_string(),
            experience_years: 3,
            hourly_rate: None,
            city: "Istanbul".to_string(),
            country: "Turkey".to_string(),
            portfolio_url: None,
            github_url: None,
            linkedin_url: None,
            is_available: true,
            is_verified: true,
            total_projects: 0,
            total_earnings: BigDecimal::from(0),
            rating: BigDecimal::from(5),
            rating_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn skills_list_trims_and_drops_empties() {
        let profile = sample_profile("rust, sql , , axum,");
        assert_eq!(profile.skills_list(), vec!["rust", "sql", "axum"]);
    }

    #[test]
    fn skills_list_empty_string() {
        let profile = sample_profile("");
        assert!(profile.skills_list().is_empty());
    }
}
