use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::careermodels::*;
use crate::models::usermodel::FreelancerProfile;

#[derive(Serialize, Deserialize, Validate, Default)]
pub struct ProjectListQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub budget: Option<BudgetRange>,
    /// created_at | views | featured (default)
    pub sort: Option<String>,
}

#[derive(Serialize, Deserialize, Validate, Default)]
pub struct FreelancerListQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub city: Option<String>,
    pub min_experience: Option<i32>,
    pub available_only: Option<bool>,
    /// rating | experience | rate (default rating)
    pub sort: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateProjectDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 20, message = "Description must be at least 20 characters"))]
    pub description: String,

    pub category_slug: Option<String>,

    // Comma separated list
    #[validate(length(min = 1, message = "Technologies are required"))]
    pub technologies: String,

    pub requirements: Option<String>,

    #[validate(length(min = 1, message = "Deliverables are required"))]
    pub deliverables: String,

    #[validate(length(min = 1, message = "Estimated duration is required"))]
    pub estimated_duration: String,

    pub budget_range: BudgetRange,

    /// Defaults to true; set false to keep the project as a draft.
    pub publish: Option<bool>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct SubmitOfferDto {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub client_name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub client_email: String,

    #[validate(length(min = 7, max = 20, message = "Phone number must be between 7-20 characters"))]
    pub client_phone: Option<String>,

    #[validate(length(max = 200))]
    pub company_name: Option<String>,

    pub offer_amount: BigDecimal,

    #[validate(length(min = 10, message = "Message must be at least 10 characters"))]
    pub message: String,

    #[validate(length(min = 1, message = "Timeline is required"))]
    pub timeline: String,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct SubmitApplicationDto {
    #[validate(length(min = 1, max = 200, message = "Full name is required"))]
    pub full_name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 7, max = 20, message = "Phone number must be between 7-20 characters"))]
    pub phone: String,

    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,

    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(range(min = 0, max = 60, message = "Experience years is out of range"))]
    pub experience_years: i32,

    pub skill_level: SkillLevel,

    // Comma separated list
    #[validate(length(min = 1, message = "Skills are required"))]
    pub skills: String,

    #[validate(url(message = "Portfolio URL is invalid"))]
    pub portfolio_url: Option<String>,

    #[validate(url(message = "GitHub URL is invalid"))]
    pub github_url: Option<String>,

    #[validate(url(message = "LinkedIn URL is invalid"))]
    pub linkedin_url: Option<String>,

    #[validate(url(message = "CV URL is invalid"))]
    pub cv_url: Option<String>,

    #[validate(length(
        min = 50,
        max = 1000,
        message = "Cover letter must be between 50-1000 characters"
    ))]
    pub cover_letter: String,
}

#[derive(Serialize, Deserialize, Validate, Default)]
pub struct ApplicationListQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
    pub status: Option<ApplicationStatus>,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct ReviewApplicationDto {
    pub approve: bool,
    #[validate(length(max = 2000))]
    pub reviewer_notes: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RespondOfferDto {
    pub accept: bool,
    #[validate(length(max = 2000))]
    pub response_message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectData {
    pub project: FreelancerProject,
    pub technologies: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponseDto {
    pub status: String,
    pub data: ProjectData,
}

#[derive(Debug, Serialize)]
pub struct ProjectDetailResponseDto {
    pub status: String,
    pub project: FreelancerProject,
    pub category: Option<ProjectCategory>,
    pub similar_projects: Vec<FreelancerProject>,
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponseDto {
    pub status: String,
    pub projects: Vec<FreelancerProject>,
    pub categories: Vec<ProjectCategory>,
    pub results: usize,
}

#[derive(Debug, Serialize)]
pub struct FreelancerListResponseDto {
    pub status: String,
    pub freelancers: Vec<FreelancerProfile>,
    pub results: usize,
}

#[derive(Debug, Serialize)]
pub struct OfferResponseDto {
    pub status: String,
    pub offer: ProjectOffer,
}

#[derive(Debug, Serialize)]
pub struct OfferListResponseDto {
    pub status: String,
    pub offers: Vec<ProjectOffer>,
    pub results: usize,
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponseDto {
    pub status: String,
    pub application: FreelancerApplication,
}

#[derive(Debug, Serialize)]
pub struct ApplicationListResponseDto {
    pub status: String,
    pub applications: Vec<FreelancerApplication>,
    pub results: i64,
}

#[derive(Debug, Serialize)]
pub struct HomeResponseDto {
    pub status: String,
    pub featured_freelancers: Vec<FreelancerProfile>,
    pub featured_projects: Vec<FreelancerProject>,
    pub recent_projects: Vec<FreelancerProject>,
    pub categories: Vec<ProjectCategory>,
    pub total_freelancers: i64,
    pub total_projects: i64,
    pub total_offers: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn offer_dto_requires_valid_email() {
        let dto = SubmitOfferDto {
            client_name: "Jane Roe".to_string(),
            client_email: "nope".to_string(),
            client_phone: None,
            company_name: None,
            offer_amount: BigDecimal::from_str("1500.00").unwrap(),
            message: "We would like to hire you for this.".to_string(),
            timeline: "2 weeks".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    fn application_dto() -> SubmitApplicationDto {
        SubmitApplicationDto {
            full_name: "Ada Example".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+15550100".to_string(),
            city: "Berlin".to_string(),
            title: "Backend Developer".to_string(),
            experience_years: 4,
            skill_level: SkillLevel::Advanced,
            skills: "rust,postgres".to_string(),
            portfolio_url: None,
            github_url: None,
            linkedin_url: None,
            cv_url: None,
            cover_letter: "I have shipped several production services and would like \
                           to take on freelance work through this site."
                .to_string(),
        }
    }

    #[test]
    fn application_dto_accepts_complete_submission() {
        assert!(application_dto().validate().is_ok());
    }

    #[test]
    fn application_dto_rejects_short_cover_letter() {
        let mut dto = application_dto();
        dto.cover_letter = "Hire me.".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn application_dto_rejects_malformed_urls() {
        let mut dto = application_dto();
        dto.github_url = Some("not-a-url".to_string());
        assert!(dto.validate().is_err());
    }

    #[test]
    fn create_project_dto_requires_long_description() {
        let dto = CreateProjectDto {
            title: "Site".to_string(),
            description: "too short".to_string(),
            category_slug: None,
            technologies: "rust".to_string(),
            requirements: None,
            deliverables: "code".to_string(),
            estimated_duration: "1 week".to_string(),
            budget_range: BudgetRange::Under1000,
            publish: None,
        };
        assert!(dto.validate().is_err());
    }
}
