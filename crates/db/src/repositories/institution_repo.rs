//! Repository for the `institutions` table.

use airwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::institution::{CreateInstitution, Institution, UpdateInstitution};

const COLUMNS: &str = "id, name, created_at, updated_at";

pub struct InstitutionRepo;

impl InstitutionRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateInstitution,
    ) -> Result<Institution, sqlx::Error> {
        let query = format!("INSERT INTO institutions (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Institution>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Institution>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM institutions WHERE id = $1");
        sqlx::query_as::<_, Institution>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<Institution>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM institutions WHERE name = $1");
        sqlx::query_as::<_, Institution>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all institutions alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Institution>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM institutions ORDER BY name ASC");
        sqlx::query_as::<_, Institution>(&query).fetch_all(pool).await
    }

    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateInstitution,
    ) -> Result<Option<Institution>, sqlx::Error> {
        let query = format!(
            "UPDATE institutions SET name = COALESCE($2, name)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Institution>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Delete an institution. Sectors and measurements reference it with
    /// `ON DELETE RESTRICT`, so this fails while any remain.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM institutions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
