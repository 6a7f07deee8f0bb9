//! Repository for the `sectors` table.

use airwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::sector::{CreateSector, Sector, UpdateSector};

const COLUMNS: &str = "id, name, institution_id, created_at, updated_at";

pub struct SectorRepo;

impl SectorRepo {
    pub async fn create(pool: &PgPool, input: &CreateSector) -> Result<Sector, sqlx::Error> {
        let query = format!(
            "INSERT INTO sectors (name, institution_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sector>(&query)
            .bind(&input.name)
            .bind(input.institution_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Sector>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sectors WHERE id = $1");
        sqlx::query_as::<_, Sector>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a sector by name within one institution.
    pub async fn find_by_name(
        pool: &PgPool,
        institution_id: DbId,
        name: &str,
    ) -> Result<Option<Sector>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM sectors WHERE institution_id = $1 AND name = $2");
        sqlx::query_as::<_, Sector>(&query)
            .bind(institution_id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List sectors alphabetically, optionally restricted to one institution.
    pub async fn list(
        pool: &PgPool,
        institution_id: Option<DbId>,
    ) -> Result<Vec<Sector>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sectors
             WHERE ($1::BIGINT IS NULL OR institution_id = $1)
             ORDER BY name ASC, id ASC"
        );
        sqlx::query_as::<_, Sector>(&query)
            .bind(institution_id)
            .fetch_all(pool)
            .await
    }

    /// Update a sector. Moving it to another institution moves its
    /// measurements too, in the same transaction, so a measurement's
    /// `institution_id` always matches its sector's.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSector,
    ) -> Result<Option<Sector>, sqlx::Error> {
        let query = format!(
            "UPDATE sectors SET
                name = COALESCE($2, name),
                institution_id = COALESCE($3, institution_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let sector = sqlx::query_as::<_, Sector>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.institution_id)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(sector) = &sector {
            sqlx::query(
                "UPDATE measurements SET institution_id = $2
                 WHERE sector_id = $1 AND institution_id <> $2",
            )
            .bind(sector.id)
            .bind(sector.institution_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(sector)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sectors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
