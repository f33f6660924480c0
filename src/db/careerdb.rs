use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::careermodels::*;
use crate::utils::slug::{slug_candidates, slugify};

#[async_trait]
pub trait CareerExt {
    // Categories
    async fn get_project_categories(&self, limit: i64) -> Result<Vec<ProjectCategory>, Error>;
    async fn get_project_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<ProjectCategory>, Error>;
    async fn create_project_category(
        &self,
        name: String,
        description: Option<String>,
        icon: Option<String>,
    ) -> Result<ProjectCategory, Error>;

    // Projects
    #[allow(clippy::too_many_arguments)]
    async fn create_project(
        &self,
        freelancer_id: Uuid,
        category_id: Option<Uuid>,
        title: String,
        description: String,
        technologies: String,
        requirements: Option<String>,
        deliverables: String,
        estimated_duration: String,
        budget_range: BudgetRange,
        status: ProjectStatus,
    ) -> Result<FreelancerProject, Error>;

    async fn get_project_by_slug(
        &self,
        slug: &str,
        published_only: bool,
    ) -> Result<Option<FreelancerProject>, Error>;

    async fn get_project_by_id(&self, project_id: Uuid)
        -> Result<Option<FreelancerProject>, Error>;

    async fn increment_project_views(&self, project_id: Uuid) -> Result<(), Error>;

    #[allow(clippy::too_many_arguments)]
    async fn list_projects(
        &self,
        search: Option<&str>,
        category_slug: Option<&str>,
        budget: Option<BudgetRange>,
        sort: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FreelancerProject>, Error>;

    async fn list_projects_by_freelancer(
        &self,
        freelancer_id: Uuid,
        published_only: bool,
        limit: i64,
    ) -> Result<Vec<FreelancerProject>, Error>;

    async fn featured_projects(&self, limit: i64) -> Result<Vec<FreelancerProject>, Error>;

    async fn similar_projects(
        &self,
        project_id: Uuid,
        category_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<FreelancerProject>, Error>;

    async fn published_project_count(&self) -> Result<i64, Error>;

    async fn count_projects_for_profile(
        &self,
        freelancer_id: Uuid,
        status: Option<ProjectStatus>,
    ) -> Result<i64, Error>;

    // Offers
    #[allow(clippy::too_many_arguments)]
    async fn create_project_offer(
        &self,
        project_id: Uuid,
        client_name: String,
        client_email: String,
        client_phone: Option<String>,
        company_name: Option<String>,
        offer_amount: BigDecimal,
        message: String,
        timeline: String,
    ) -> Result<ProjectOffer, Error>;

    async fn get_project_offer(&self, offer_id: Uuid) -> Result<Option<ProjectOffer>, Error>;

    async fn list_project_offers(&self, project_id: Uuid) -> Result<Vec<ProjectOffer>, Error>;

    async fn respond_to_project_offer(
        &self,
        offer_id: Uuid,
        status: OfferStatus,
        response_message: Option<String>,
    ) -> Result<ProjectOffer, Error>;

    /// Recompute the denormalized offers_count from an actual COUNT(*).
    async fn recount_project_offers(&self, project_id: Uuid) -> Result<i64, Error>;

    async fn total_offer_count(&self) -> Result<i64, Error>;

    /// Sum of accepted offer amounts across a freelancer's projects.
    async fn accepted_offer_total(&self, freelancer_id: Uuid) -> Result<BigDecimal, Error>;

    // Applications
    #[allow(clippy::too_many_arguments)]
    async fn create_freelancer_application(
        &self,
        full_name: String,
        email: String,
        phone: String,
        city: String,
        title: String,
        experience_years: i32,
        skill_level: SkillLevel,
        skills: String,
        portfolio_url: Option<String>,
        github_url: Option<String>,
        linkedin_url: Option<String>,
        cv_url: Option<String>,
        cover_letter: String,
    ) -> Result<FreelancerApplication, Error>;

    async fn get_freelancer_application(
        &self,
        application_id: Uuid,
    ) -> Result<Option<FreelancerApplication>, Error>;

    async fn list_freelancer_applications(
        &self,
        status: Option<ApplicationStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FreelancerApplication>, Error>;

    async fn count_freelancer_applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<i64, Error>;

    async fn review_freelancer_application(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
        reviewer_notes: Option<String>,
    ) -> Result<FreelancerApplication, Error>;
}

#[async_trait]
impl CareerExt for DBClient {
    async fn get_project_categories(&self, limit: i64) -> Result<Vec<ProjectCategory>, Error> {
        sqlx::query_as::<_, ProjectCategory>(
            "SELECT * FROM project_categories ORDER BY name ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_project_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<ProjectCategory>, Error> {
        sqlx::query_as::<_, ProjectCategory>("SELECT * FROM project_categories WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_project_category(
        &self,
        name: String,
        description: Option<String>,
        icon: Option<String>,
    ) -> Result<ProjectCategory, Error> {
        let slug = self
            .unique_slug(&slugify(&name), "project_categories")
            .await?;

        sqlx::query_as::<_, ProjectCategory>(
            r#"
            INSERT INTO project_categories (name, slug, description, icon)
            VALUES ($1, $2, $3, COALESCE($4, 'fas fa-code'))
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(icon)
        .fetch_one(&self.pool)
        .await
    }

    async fn create_project(
        &self,
        freelancer_id: Uuid,
        category_id: Option<Uuid>,
        title: String,
        description: String,
        technologies: String,
        requirements: Option<String>,
        deliverables: String,
        estimated_duration: String,
        budget_range: BudgetRange,
        status: ProjectStatus,
    ) -> Result<FreelancerProject, Error> {
        let slug = self
            .unique_slug(&slugify(&title), "freelancer_projects")
            .await?;

        sqlx::query_as::<_, FreelancerProject>(
            r#"
            INSERT INTO freelancer_projects
                (freelancer_id, category_id, title, description, slug, technologies,
                 requirements, deliverables, estimated_duration, budget_range, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(freelancer_id)
        .bind(category_id)
        .bind(title)
        .bind(description)
        .bind(slug)
        .bind(technologies)
        .bind(requirements)
        .bind(deliverables)
        .bind(estimated_duration)
        .bind(budget_range)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_project_by_slug(
        &self,
        slug: &str,
        published_only: bool,
    ) -> Result<Option<FreelancerProject>, Error> {
        sqlx::query_as::<_, FreelancerProject>(
            r#"
            SELECT * FROM freelancer_projects
            WHERE slug = $1
              AND ($2::bool = false OR status = 'published'::project_status)
            "#,
        )
        .bind(slug)
        .bind(published_only)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_project_by_id(
        &self,
        project_id: Uuid,
    ) -> Result<Option<FreelancerProject>, Error> {
        sqlx::query_as::<_, FreelancerProject>("SELECT * FROM freelancer_projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn increment_project_views(&self, project_id: Uuid) -> Result<(), Error> {
        sqlx::query("UPDATE freelancer_projects SET views = views + 1 WHERE id = $1")
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_projects(
        &self,
        search: Option<&str>,
        category_slug: Option<&str>,
        budget: Option<BudgetRange>,
        sort: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FreelancerProject>, Error> {
        let order_by = match sort {
            "created_at" => "fp.created_at DESC",
            "views" => "fp.views DESC",
            _ => "fp.is_featured DESC, fp.created_at DESC",
        };

        let query = format!(
            r#"
            SELECT fp.* FROM freelancer_projects fp
            LEFT JOIN project_categories pc ON pc.id = fp.category_id
            WHERE fp.status = 'published'::project_status
              AND ($1::text IS NULL OR fp.title ILIKE '%' || $1 || '%'
                   OR fp.description ILIKE '%' || $1 || '%'
                   OR fp.technologies ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR pc.slug = $2)
              AND ($3::budget_range IS NULL OR fp.budget_range = $3)
            ORDER BY {}
            LIMIT $4 OFFSET $5
            "#,
            order_by
        );

        sqlx::query_as::<_, FreelancerProject>(&query)
            .bind(search)
            .bind(category_slug)
            .bind(budget)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    async fn list_projects_by_freelancer(
        &self,
        freelancer_id: Uuid,
        published_only: bool,
        limit: i64,
    ) -> Result<Vec<FreelancerProject>, Error> {
        sqlx::query_as::<_, FreelancerProject>(
            r#"
            SELECT * FROM freelancer_projects
            WHERE freelancer_id = $1
              AND ($2::bool = false OR status = 'published'::project_status)
            ORDER BY is_featured DESC, created_at DESC
            LIMIT $3
            "#,
        )
        .bind(freelancer_id)
        .bind(published_only)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn featured_projects(&self, limit: i64) -> Result<Vec<FreelancerProject>, Error> {
        sqlx::query_as::<_, FreelancerProject>(
            r#"
            SELECT * FROM freelancer_projects
            WHERE status = 'published'::project_status AND is_featured = true
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn similar_projects(
        &self,
        project_id: Uuid,
        category_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<FreelancerProject>, Error> {
        sqlx::query_as::<_, FreelancerProject>(
            r#"
            SELECT * FROM freelancer_projects
            WHERE status = 'published'::project_status
              AND id != $1
              AND ($2::uuid IS NULL OR category_id = $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(project_id)
        .bind(category_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn published_project_count(&self) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM freelancer_projects WHERE status = 'published'::project_status",
        )
        .fetch_one(&self.pool)
        .await
    }

    async fn count_projects_for_profile(
        &self,
        freelancer_id: Uuid,
        status: Option<ProjectStatus>,
    ) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM freelancer_projects
            WHERE freelancer_id = $1
              AND ($2::project_status IS NULL OR status = $2)
            "#,
        )
        .bind(freelancer_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    async fn create_project_offer(
        &self,
        project_id: Uuid,
        client_name: String,
        client_email: String,
        client_phone: Option<String>,
        company_name: Option<String>,
        offer_amount: BigDecimal,
        message: String,
        timeline: String,
    ) -> Result<ProjectOffer, Error> {
        sqlx::query_as::<_, ProjectOffer>(
            r#"
            INSERT INTO project_offers
                (project_id, client_name, client_email, client_phone, company_name,
                 offer_amount, message, timeline)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(project_id)
        .bind(client_name)
        .bind(client_email)
        .bind(client_phone)
        .bind(company_name)
        .bind(offer_amount)
        .bind(message)
        .bind(timeline)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_project_offer(&self, offer_id: Uuid) -> Result<Option<ProjectOffer>, Error> {
        sqlx::query_as::<_, ProjectOffer>("SELECT * FROM project_offers WHERE id = $1")
            .bind(offer_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_project_offers(&self, project_id: Uuid) -> Result<Vec<ProjectOffer>, Error> {
        sqlx::query_as::<_, ProjectOffer>(
            r#"
            SELECT * FROM project_offers
            WHERE project_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn respond_to_project_offer(
        &self,
        offer_id: Uuid,
        status: OfferStatus,
        response_message: Option<String>,
    ) -> Result<ProjectOffer, Error> {
        sqlx::query_as::<_, ProjectOffer>(
            r#"
            UPDATE project_offers
            SET status = $2, response_message = $3, responded_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(offer_id)
        .bind(status)
        .bind(response_message)
        .fetch_one(&self.pool)
        .await
    }

    async fn recount_project_offers(&self, project_id: Uuid) -> Result<i64, Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM project_offers WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;

        sqlx::query("UPDATE freelancer_projects SET offers_count = $2 WHERE id = $1")
            .bind(project_id)
            .bind(count as i32)
            .execute(&self.pool)
            .await?;

        Ok(count)
    }

    async fn total_offer_count(&self) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM project_offers")
            .fetch_one(&self.pool)
            .await
    }

    async fn accepted_offer_total(&self, freelancer_id: Uuid) -> Result<BigDecimal, Error> {
        sqlx::query_scalar::<_, BigDecimal>(
            r#"
            SELECT COALESCE(SUM(po.offer_amount), 0)
            FROM project_offers po
            JOIN freelancer_projects fp ON fp.id = po.project_id
            WHERE fp.freelancer_id = $1
              AND po.status = 'accepted'::offer_status
            "#,
        )
        .bind(freelancer_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn create_freelancer_application(
        &self,
        full_name: String,
        email: String,
        phone: String,
        city: String,
        title: String,
        experience_years: i32,
        skill_level: SkillLevel,
        skills: String,
        portfolio_url: Option<String>,
        github_url: Option<String>,
        linkedin_url: Option<String>,
        cv_url: Option<String>,
        cover_letter: String,
    ) -> Result<FreelancerApplication, Error> {
        sqlx::query_as::<_, FreelancerApplication>(
            r#"
            INSERT INTO freelancer_applications
                (full_name, email, phone, city, title, experience_years, skill_level,
                 skills, portfolio_url, github_url, linkedin_url, cv_url, cover_letter)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(full_name)
        .bind(email)
        .bind(phone)
        .bind(city)
        .bind(title)
        .bind(experience_years)
        .bind(skill_level)
        .bind(skills)
        .bind(portfolio_url)
        .bind(github_url)
        .bind(linkedin_url)
        .bind(cv_url)
        .bind(cover_letter)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_freelancer_application(
        &self,
        application_id: Uuid,
    ) -> Result<Option<FreelancerApplication>, Error> {
        sqlx::query_as::<_, FreelancerApplication>(
            "SELECT * FROM freelancer_applications WHERE id = $1",
        )
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn list_freelancer_applications(
        &self,
        status: Option<ApplicationStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FreelancerApplication>, Error> {
        sqlx::query_as::<_, FreelancerApplication>(
            r#"
            SELECT * FROM freelancer_applications
            WHERE ($1::application_status IS NULL OR status = $1)
            ORDER BY applied_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn count_freelancer_applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM freelancer_applications
            WHERE ($1::application_status IS NULL OR status = $1)
            "#,
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    async fn review_freelancer_application(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
        reviewer_notes: Option<String>,
    ) -> Result<FreelancerApplication, Error> {
        sqlx::query_as::<_, FreelancerApplication>(
            r#"
            UPDATE freelancer_applications
            SET status = $2, reviewer_notes = $3, reviewed_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(application_id)
        .bind(status)
        .bind(reviewer_notes)
        .fetch_one(&self.pool)
        .await
    }
}

impl DBClient {
    /// Suffix-counter slug resolution against a table's slug column.
    /// Takes the first candidate not already present in the table.
    pub(crate) async fn unique_slug(&self, base: &str, table: &str) -> Result<String, Error> {
        let query = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE slug = $1)", table);

        for candidate in slug_candidates(base) {
            let taken = sqlx::query_scalar::<_, bool>(&query)
                .bind(&candidate)
                .fetch_one(&self.pool)
                .await?;

            if !taken {
                return Ok(candidate);
            }
        }

        unreachable!("slug candidate sequence is infinite")
    }
}
