use bigdecimal::BigDecimal;
use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Draft,
    Published,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Published => "published",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

// Renames are explicit: digits make the derived snake_case labels ambiguous.
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "budget_range")]
pub enum BudgetRange {
    #[default]
    #[sqlx(rename = "under_1000")]
    #[serde(rename = "under_1000")]
    Under1000,
    #[sqlx(rename = "from_1000_to_5000")]
    #[serde(rename = "from_1000_to_5000")]
    From1000To5000,
    #[sqlx(rename = "from_5000_to_10000")]
    #[serde(rename = "from_5000_to_10000")]
    From5000To10000,
    #[sqlx(rename = "from_10000_to_25000")]
    #[serde(rename = "from_10000_to_25000")]
    From10000To25000,
    #[sqlx(rename = "from_25000_to_50000")]
    #[serde(rename = "from_25000_to_50000")]
    From25000To50000,
    #[sqlx(rename = "over_50000")]
    #[serde(rename = "over_50000")]
    Over50000,
}

impl BudgetRange {
    pub fn to_str(&self) -> &str {
        match self {
            BudgetRange::Under1000 => "under_1000",
            BudgetRange::From1000To5000 => "from_1000_to_5000",
            BudgetRange::From5000To10000 => "from_5000_to_10000",
            BudgetRange::From10000To25000 => "from_10000_to_25000",
            BudgetRange::From25000To50000 => "from_25000_to_50000",
            BudgetRange::Over50000 => "over_50000",
        }
    }
}

// Status set for offers placed against a showcased project. The chat offer
// enum ends in Cancelled instead of Withdrawn; the two are kept separate.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "offer_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl OfferStatus {
    pub fn to_str(&self) -> &str {
        match self {
            OfferStatus::Pending => "pending",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Rejected => "rejected",
            OfferStatus::Withdrawn => "withdrawn",
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "skill_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn to_str(&self) -> &str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Expert => "expert",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct ProjectCategory {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: String,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct FreelancerProject {
    pub id: Uuid,
    pub freelancer_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub slug: String,
    // Comma separated
    pub technologies: String,
    pub requirements: Option<String>,
    pub deliverables: String,
    pub estimated_duration: String,
    pub budget_range: BudgetRange,
    pub image_url: Option<String>,
    pub featured_image_url: Option<String>,
    pub project_url: Option<String>,
    pub demo_url: Option<String>,
    pub github_url: Option<String>,
    pub completion_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub is_featured: bool,
    // Denormalized counters
    pub views: i32,
    pub offers_count: i32,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl FreelancerProject {
    pub fn technologies_list(&self) -> Vec<String> {
        self.technologies
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct ProjectOffer {
    pub id: Uuid,
    pub project_id: Uuid,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub company_name: Option<String>,
    pub offer_amount: BigDecimal,
    pub message: String,
    pub timeline: String,
    pub status: OfferStatus,
    pub response_message: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Someone applying to join the site as a freelancer. Applications are
/// reviewed by an admin; approval does not create an account by itself.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct FreelancerApplication {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub title: String,
    pub experience_years: i32,
    pub skill_level: SkillLevel,
    // Comma separated
    pub skills: String,
    pub portfolio_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub cv_url: Option<String>,
    pub cover_letter: String,
    pub status: ApplicationStatus,
    pub reviewer_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,

    #[serde(rename = "appliedAt")]
    pub applied_at: DateTime<Utc>,
}

impl FreelancerApplication {
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
    fn offer_status_to_str() {
        assert_eq!(OfferStatus::Pending.to_str(), "pending");
        assert_eq!(OfferStatus::Withdrawn.to_str(), "withdrawn");
    }

    #[test]
    fn project_status_to_str() {
        assert_eq!(ProjectStatus::Published.to_str(), "published");
        assert_eq!(ProjectStatus::Cancelled.to_str(), "cancelled");
    }

    #[test]
    fn application_status_defaults_to_pending() {
        assert_eq!(ApplicationStatus::default(), ApplicationStatus::Pending);
        assert_eq!(ApplicationStatus::Approved.to_str(), "approved");
    }

    fn application(skills: &str) -> FreelancerApplication {
        FreelancerApplication {
            id: Uuid::new_v4(),
            full_name: "Ada Example".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+15550100".to_string(),
            city: "Berlin".to_string(),
            title: "Backend Developer".to_string(),
            experience_years: 4,
            skill_level: SkillLevel::Advanced,
            skills: skills.to_string(),
            portfolio_url: None,
            github_url: None,
            linkedin_url: None,
            cv_url: None,
            cover_letter: "I build reliable services.".to_string(),
            status: ApplicationStatus::Pending,
            reviewer_notes: None,
            reviewed_at: None,
            applied_at: Utc::now(),
        }
    }

    #[test]
    fn application_skills_list_trims_and_drops_empties() {
        let app = application(" rust, postgres ,,axum ");
        assert_eq!(app.skills_list(), vec!["rust", "postgres", "axum"]);
    }
}
