use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::catalogmodels::*;
use crate::utils::slug::slugify;

#[async_trait]
pub trait CatalogExt {
    async fn get_catalog_categories(&self, active_only: bool) -> Result<Vec<Category>, Error>;

    async fn get_catalog_category_by_slug(&self, slug: &str) -> Result<Option<Category>, Error>;

    async fn create_catalog_category(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<Category, Error>;

    async fn list_applications(
        &self,
        search: Option<&str>,
        category_slug: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Application>, Error>;

    async fn count_applications(
        &self,
        search: Option<&str>,
        category_slug: Option<&str>,
    ) -> Result<i64, Error>;

    async fn get_application_by_slug(
        &self,
        slug: &str,
        active_only: bool,
    ) -> Result<Option<Application>, Error>;

    async fn get_application_by_id(
        &self,
        application_id: Uuid,
    ) -> Result<Option<Application>, Error>;

    async fn increment_application_views(&self, application_id: Uuid) -> Result<(), Error>;

    #[allow(clippy::too_many_arguments)]
    async fn create_application(
        &self,
        title: String,
        short_description: String,
        description_markdown: String,
        category_id: Uuid,
        tags: String,
        youtube_url: Option<String>,
    ) -> Result<Application, Error>;

    async fn get_releases(&self, application_id: Uuid) -> Result<Vec<Release>, Error>;

    async fn get_release(&self, release_id: Uuid) -> Result<Option<Release>, Error>;

    #[allow(clippy::too_many_arguments)]
    async fn create_release(
        &self,
        application_id: Uuid,
        version: String,
        channel: ReleaseChannel,
        file_path: String,
        file_size: i64,
        sha256: String,
        changelog_markdown: Option<String>,
    ) -> Result<Release, Error>;

    async fn increment_download_count(&self, release_id: Uuid) -> Result<(), Error>;
}

#[async_trait]
impl CatalogExt for DBClient {
    async fn get_catalog_categories(&self, active_only: bool) -> Result<Vec<Category>, Error> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT * FROM catalog_categories
            WHERE ($1::bool = false OR is_active = true)
            ORDER BY name ASC
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_catalog_category_by_slug(&self, slug: &str) -> Result<Option<Category>, Error> {
        sqlx::query_as::<_, Category>("SELECT * FROM catalog_categories WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_catalog_category(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<Category, Error> {
        let slug = self
            .unique_slug(&slugify(&name), "catalog_categories")
            .await?;

        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO catalog_categories (name, slug, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_applications(
        &self,
        search: Option<&str>,
        category_slug: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Application>, Error> {
        sqlx::query_as::<_, Application>(
            r#"
            SELECT a.* FROM applications a
            JOIN catalog_categories c ON c.id = a.category_id
            WHERE a.is_active = true
              AND ($1::text IS NULL OR a.title ILIKE '%' || $1 || '%'
                   OR a.short_description ILIKE '%' || $1 || '%'
                   OR a.tags ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR c.slug = $2)
            ORDER BY a.created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(search)
        .bind(category_slug)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn count_applications(
        &self,
        search: Option<&str>,
        category_slug: Option<&str>,
    ) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM applications a
            JOIN catalog_categories c ON c.id = a.category_id
            WHERE a.is_active = true
              AND ($1::text IS NULL OR a.title ILIKE '%' || $1 || '%'
                   OR a.short_description ILIKE '%' || $1 || '%'
                   OR a.tags ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR c.slug = $2)
            "#,
        )
        .bind(search)
        .bind(category_slug)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_application_by_slug(
        &self,
        slug: &str,
        active_only: bool,
    ) -> Result<Option<Application>, Error> {
        sqlx::query_as::<_, Application>(
            r#"
            SELECT * FROM applications
            WHERE slug = $1
              AND ($2::bool = false OR is_active = true)
            "#,
        )
        .bind(slug)
        .bind(active_only)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_application_by_id(
        &self,
        application_id: Uuid,
    ) -> Result<Option<Application>, Error> {
        sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
            .bind(application_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn increment_application_views(&self, application_id: Uuid) -> Result<(), Error> {
        sqlx::query("UPDATE applications SET view_count = view_count + 1 WHERE id = $1")
            .bind(application_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn create_application(
        &self,
        title: String,
        short_description: String,
        description_markdown: String,
        category_id: Uuid,
        tags: String,
        youtube_url: Option<String>,
    ) -> Result<Application, Error> {
        let slug = self.unique_slug(&slugify(&title), "applications").await?;

        sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications
                (title, slug, short_description, description_markdown, category_id,
                 tags, youtube_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(slug)
        .bind(short_description)
        .bind(description_markdown)
        .bind(category_id)
        .bind(tags)
        .bind(youtube_url)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_releases(&self, application_id: Uuid) -> Result<Vec<Release>, Error> {
        sqlx::query_as::<_, Release>(
            r#"
            SELECT * FROM releases
            WHERE application_id = $1 AND is_active = true
            ORDER BY published_at DESC
            "#,
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_release(&self, release_id: Uuid) -> Result<Option<Release>, Error> {
        sqlx::query_as::<_, Release>("SELECT * FROM releases WHERE id = $1")
            .bind(release_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_release(
        &self,
        application_id: Uuid,
        version: String,
        channel: ReleaseChannel,
        file_path: String,
        file_size: i64,
        sha256: String,
        changelog_markdown: Option<String>,
    ) -> Result<Release, Error> {
        sqlx::query_as::<_, Release>(
            r#"
            INSERT INTO releases
                (application_id, version, channel, file_path, file_size, sha256,
                 changelog_markdown)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(application_id)
        .bind(version)
        .bind(channel)
        .bind(file_path)
        .bind(file_size)
        .bind(sha256)
        .bind(changelog_markdown)
        .fetch_one(&self.pool)
        .await
    }

    async fn increment_download_count(&self, release_id: Uuid) -> Result<(), Error> {
        sqlx::query("UPDATE releases SET download_count = download_count + 1 WHERE id = $1")
            .bind(release_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
