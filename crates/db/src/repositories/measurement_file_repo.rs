//! Repository for the `measurement_files` table.

use airwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::measurement_file::{CreateMeasurementFile, MeasurementFile};

const COLUMNS: &str = "id, measurement_id, name, path, mime, size, category, created_at";

pub struct MeasurementFileRepo;

impl MeasurementFileRepo {
    /// Insert all rows of one upload atomically, in input order.
    pub async fn create_many(
        pool: &PgPool,
        measurement_id: DbId,
        inputs: &[CreateMeasurementFile],
    ) -> Result<Vec<MeasurementFile>, sqlx::Error> {
        let query = format!(
            "INSERT INTO measurement_files (measurement_id, name, path, mime, size, category)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            let row = sqlx::query_as::<_, MeasurementFile>(&query)
                .bind(measurement_id)
                .bind(&input.name)
                .bind(&input.path)
                .bind(&input.mime)
                .bind(input.size)
                .bind(&input.category)
                .fetch_one(&mut *tx)
                .await?;
            created.push(row);
        }
        tx.commit().await?;

        Ok(created)
    }

    pub async fn list_by_measurement(
        pool: &PgPool,
        measurement_id: DbId,
    ) -> Result<Vec<MeasurementFile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM measurement_files
             WHERE measurement_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, MeasurementFile>(&query)
            .bind(measurement_id)
            .fetch_all(pool)
            .await
    }

    /// Files of several measurements at once, for embedding in a listing.
    pub async fn list_by_measurements(
        pool: &PgPool,
        measurement_ids: &[DbId],
    ) -> Result<Vec<MeasurementFile>, sqlx::Error> {
        if measurement_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM measurement_files
             WHERE measurement_id = ANY($1)
             ORDER BY measurement_id ASC, id ASC"
        );
        sqlx::query_as::<_, MeasurementFile>(&query)
            .bind(measurement_ids)
            .fetch_all(pool)
            .await
    }
}
