use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::dtos::userdtos::{FreelancerProfileUpdateDto, UpdateUserProfileDto};
use crate::models::usermodel::*;

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
        verification_token: Option<&str>,
    ) -> Result<Option<User>, Error>;

    async fn get_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, Error>;

    async fn user_count(&self) -> Result<i64, Error>;

    #[allow(clippy::too_many_arguments)]
    async fn save_user(
        &self,
        first_name: String,
        last_name: String,
        email: String,
        password: String,
        role: UserRole,
        verification_token: String,
        token_expires_at: DateTime<Utc>,
    ) -> Result<User, Error>;

    async fn verify_email(&self, user_id: Uuid) -> Result<User, Error>;

    async fn set_verification_token(
        &self,
        user_id: Uuid,
        token: String,
        expires_at: DateTime<Utc>,
    ) -> Result<(), Error>;

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        dto: UpdateUserProfileDto,
    ) -> Result<User, Error>;

    async fn update_user_avatar(&self, user_id: Uuid, avatar_url: String) -> Result<User, Error>;

    async fn update_user_password(&self, user_id: Uuid, password: String) -> Result<User, Error>;

    async fn get_first_admin(&self) -> Result<Option<User>, Error>;

    // Freelancer profiles

    async fn get_freelancer_profile(&self, user_id: Uuid)
        -> Result<Option<FreelancerProfile>, Error>;

    async fn get_freelancer_profile_by_id(
        &self,
        profile_id: Uuid,
    ) -> Result<Option<FreelancerProfile>, Error>;

    /// Idempotent: returns the existing profile or inserts an empty one.
    async fn get_or_create_freelancer_profile(
        &self,
        user_id: Uuid,
    ) -> Result<FreelancerProfile, Error>;

    async fn update_freelancer_profile(
        &self,
        user_id: Uuid,
        dto: FreelancerProfileUpdateDto,
    ) -> Result<FreelancerProfile, Error>;

    async fn list_freelancers(
        &self,
        search: Option<&str>,
        city: Option<&str>,
        min_experience: Option<i32>,
        available_only: bool,
        sort: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FreelancerProfile>, Error>;

    async fn featured_freelancers(&self, limit: i64) -> Result<Vec<FreelancerProfile>, Error>;

    async fn verified_freelancer_count(&self) -> Result<i64, Error>;

    async fn get_all_freelancer_profiles(&self) -> Result<Vec<FreelancerProfile>, Error>;

    async fn update_profile_stats(
        &self,
        profile_id: Uuid,
        total_projects: i32,
        total_earnings: Option<BigDecimal>,
    ) -> Result<(), Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
        verification_token: Option<&str>,
    ) -> Result<Option<User>, Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        } else if let Some(token) = verification_token {
            user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE verification_token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;
        }

        Ok(user)
    }

    async fn get_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn user_count(&self) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
    }

    async fn save_user(
        &self,
        first_name: String,
        last_name: String,
        email: String,
        password: String,
        role: UserRole,
        verification_token: String,
        token_expires_at: DateTime<Utc>,
    ) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, password, role,
                               verification_token, token_expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(password)
        .bind(role)
        .bind(verification_token)
        .bind(token_expires_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn verify_email(&self, user_id: Uuid) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET verified = true,
                verification_token = NULL,
                token_expires_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_verification_token(
        &self,
        user_id: Uuid,
        token: String,
        expires_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET verification_token = $2, token_expires_at = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        dto: UpdateUserProfileDto,
    ) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                bio = COALESCE($5, bio),
                website = COALESCE($6, website),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(dto.first_name)
        .bind(dto.last_name)
        .bind(dto.phone)
        .bind(dto.bio)
        .bind(dto.website)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user_avatar(&self, user_id: Uuid, avatar_url: String) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET avatar_url = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(avatar_url)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user_password(&self, user_id: Uuid, password: String) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET password = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(password)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_first_admin(&self) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE role = 'admin'::user_role
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_freelancer_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<FreelancerProfile>, Error> {
        sqlx::query_as::<_, FreelancerProfile>(
            "SELECT * FROM freelancer_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_freelancer_profile_by_id(
        &self,
        profile_id: Uuid,
    ) -> Result<Option<FreelancerProfile>, Error> {
        sqlx::query_as::<_, FreelancerProfile>("SELECT * FROM freelancer_profiles WHERE id = $1")
            .bind(profile_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_or_create_freelancer_profile(
        &self,
        user_id: Uuid,
    ) -> Result<FreelancerProfile, Error> {
        if let Some(profile) = self.get_freelancer_profile(user_id).await? {
            return Ok(profile);
        }

        sqlx::query_as::<_, FreelancerProfile>(
            r#"
            INSERT INTO freelancer_profiles (user_id, title, skills, city, country)
            VALUES ($1, 'Freelancer', '', '', '')
            ON CONFLICT (user_id) DO UPDATE SET updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_freelancer_profile(
        &self,
        user_id: Uuid,
        dto: FreelancerProfileUpdateDto,
    ) -> Result<FreelancerProfile, Error> {
        sqlx::query_as::<_, FreelancerProfile>(
            r#"
            UPDATE freelancer_profiles
            SET title = COALESCE($2, title),
                skills = COALESCE($3, skills),
                experience_years = COALESCE($4, experience_years),
                hourly_rate = COALESCE($5, hourly_rate),
                city = COALESCE($6, city),
                country = COALESCE($7, country),
                portfolio_url = COALESCE($8, portfolio_url),
                github_url = COALESCE($9, github_url),
                linkedin_url = COALESCE($10, linkedin_url),
                is_available = COALESCE($11, is_available),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(dto.title)
        .bind(dto.skills)
        .bind(dto.experience_years)
        .bind(dto.hourly_rate)
        .bind(dto.city)
        .bind(dto.country)
        .bind(dto.portfolio_url)
        .bind(dto.github_url)
        .bind(dto.linkedin_url)
        .bind(dto.is_available)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_freelancers(
        &self,
        search: Option<&str>,
        city: Option<&str>,
        min_experience: Option<i32>,
        available_only: bool,
        sort: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FreelancerProfile>, Error> {
        // Only the keys matched here reach the format! below; anything
        // else falls back to rating.
        let order_by = match sort {
            "total_projects" => "fp.total_projects DESC",
            "created_at" => "fp.created_at DESC",
            "hourly_rate" => "fp.hourly_rate ASC NULLS LAST",
            _ => "fp.rating DESC",
        };

        let query = format!(
            r#"
            SELECT fp.* FROM freelancer_profiles fp
            JOIN users u ON u.id = fp.user_id
            WHERE fp.is_verified = true
              AND ($1::text IS NULL OR u.first_name ILIKE '%' || $1 || '%'
                   OR u.last_name ILIKE '%' || $1 || '%'
                   OR fp.title ILIKE '%' || $1 || '%'
                   OR fp.skills ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR fp.city ILIKE '%' || $2 || '%')
              AND ($3::int IS NULL OR fp.experience_years >= $3)
              AND ($4::bool = false OR fp.is_available = true)
            ORDER BY {}
            LIMIT $5 OFFSET $6
            "#,
            order_by
        );

        sqlx::query_as::<_, FreelancerProfile>(&query)
            .bind(search)
            .bind(city)
            .bind(min_experience)
            .bind(available_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    async fn featured_freelancers(&self, limit: i64) -> Result<Vec<FreelancerProfile>, Error> {
        sqlx::query_as::<_, FreelancerProfile>(
            r#"
            SELECT * FROM freelancer_profiles
            WHERE is_verified = true AND is_available = true
            ORDER BY rating DESC, total_projects DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn verified_freelancer_count(&self) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM freelancer_profiles WHERE is_verified = true",
        )
        .fetch_one(&self.pool)
        .await
    }

    async fn get_all_freelancer_profiles(&self) -> Result<Vec<FreelancerProfile>, Error> {
        sqlx::query_as::<_, FreelancerProfile>(
            "SELECT * FROM freelancer_profiles ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn update_profile_stats(
        &self,
        profile_id: Uuid,
        total_projects: i32,
        total_earnings: Option<BigDecimal>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE freelancer_profiles
            SET total_projects = $2,
                total_earnings = COALESCE($3, total_earnings),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(profile_id)
        .bind(total_projects)
        .bind(total_earnings)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
