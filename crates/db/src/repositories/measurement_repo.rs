//! Repository for the `measurements` table.
//!
//! Listing, dashboard and report queries share one filter clause over
//! institution, sector and an inclusive date range.

use airwatch_core::compliance::{ComplianceStatus, MeasurementValues};
use airwatch_core::types::DbId;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use crate::models::measurement::{
    Measurement, MeasurementDetail, MeasurementFilter, MeasurementInput,
};

const COLUMNS: &str = "id, date, institution_id, sector_id, user_id, \
    humidity, air_speed, temperature, fungi_internal, fungi_external, ie_ratio, \
    aerodispersoids, bacteria_internal, bacteria_external, co2_internal, co2_external, \
    pm10, pm25, status, created_at, updated_at";

/// Joined column list for [`MeasurementDetail`].
const DETAIL_COLUMNS: &str = "m.id, m.date, m.institution_id, m.sector_id, m.user_id, \
    m.humidity, m.air_speed, m.temperature, m.fungi_internal, m.fungi_external, m.ie_ratio, \
    m.aerodispersoids, m.bacteria_internal, m.bacteria_external, m.co2_internal, \
    m.co2_external, m.pm10, m.pm25, m.status, m.created_at, m.updated_at, \
    i.name AS institution_name, s.name AS sector_name, u.name AS user_name";

const DETAIL_FROM: &str = "measurements m
    JOIN institutions i ON i.id = m.institution_id
    JOIN sectors s ON s.id = m.sector_id
    JOIN users u ON u.id = m.user_id";

/// Filter over `$1..$4`; bind with [`bind_filter`].
const FILTER: &str = "($1::BIGINT IS NULL OR m.institution_id = $1)
    AND ($2::BIGINT IS NULL OR m.sector_id = $2)
    AND ($3::TIMESTAMPTZ IS NULL OR m.date >= $3)
    AND ($4::TIMESTAMPTZ IS NULL OR m.date <= $4)";

type PgQueryAs<'q, O> = QueryAs<'q, Postgres, O, PgArguments>;

fn bind_filter<'q, O>(query: PgQueryAs<'q, O>, filter: &MeasurementFilter) -> PgQueryAs<'q, O> {
    query
        .bind(filter.institution_id)
        .bind(filter.sector_id)
        .bind(filter.range.from)
        .bind(filter.range.to)
}

/// Bind the thirteen readings in `COLUMNS` order.
fn bind_values<'q, O>(query: PgQueryAs<'q, O>, v: &MeasurementValues) -> PgQueryAs<'q, O> {
    query
        .bind(v.humidity)
        .bind(v.air_speed)
        .bind(v.temperature)
        .bind(v.fungi_internal)
        .bind(v.fungi_external)
        .bind(v.ie_ratio)
        .bind(v.aerodispersoids)
        .bind(v.bacteria_internal)
        .bind(v.bacteria_external)
        .bind(v.co2_internal)
        .bind(v.co2_external)
        .bind(v.pm10)
        .bind(v.pm25)
}

pub struct MeasurementRepo;

impl MeasurementRepo {
    /// Insert a measurement recorded by `user_id` with a precomputed status.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &MeasurementInput,
        status: ComplianceStatus,
    ) -> Result<Measurement, sqlx::Error> {
        let query = format!(
            "INSERT INTO measurements (date, institution_id, sector_id, user_id,
                humidity, air_speed, temperature, fungi_internal, fungi_external, ie_ratio,
                aerodispersoids, bacteria_internal, bacteria_external, co2_internal,
                co2_external, pm10, pm25, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                $17, $18)
             RETURNING {COLUMNS}"
        );
        let q = sqlx::query_as::<_, Measurement>(&query)
            .bind(input.date)
            .bind(input.institution_id)
            .bind(input.sector_id)
            .bind(user_id);
        bind_values(q, &input.values)
            .bind(status.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Measurement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM measurements WHERE id = $1");
        sqlx::query_as::<_, Measurement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a measurement joined with institution, sector and recorder names.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MeasurementDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM} WHERE m.id = $1");
        sqlx::query_as::<_, MeasurementDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of matching measurements, newest first.
    pub async fn list_page(
        pool: &PgPool,
        filter: &MeasurementFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MeasurementDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM}
             WHERE {FILTER}
             ORDER BY m.date DESC, m.id DESC
             LIMIT $5 OFFSET $6"
        );
        bind_filter(sqlx::query_as::<_, MeasurementDetail>(&query), filter)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of measurements matching `filter`.
    pub async fn count(pool: &PgPool, filter: &MeasurementFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM measurements m WHERE {FILTER}");
        let (total,): (i64,) = bind_filter(sqlx::query_as(&query), filter)
            .fetch_one(pool)
            .await?;
        Ok(total)
    }

    /// Every matching measurement, oldest first (dashboard input).
    pub async fn list_chronological(
        pool: &PgPool,
        filter: &MeasurementFilter,
    ) -> Result<Vec<Measurement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM measurements m
             WHERE {FILTER}
             ORDER BY m.date ASC, m.id ASC"
        );
        bind_filter(sqlx::query_as::<_, Measurement>(&query), filter)
            .fetch_all(pool)
            .await
    }

    /// Up to `limit` matching measurements, newest first (report input).
    pub async fn list_recent(
        pool: &PgPool,
        filter: &MeasurementFilter,
        limit: i64,
    ) -> Result<Vec<MeasurementDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM}
             WHERE {FILTER}
             ORDER BY m.date DESC, m.id DESC
             LIMIT $5"
        );
        bind_filter(sqlx::query_as::<_, MeasurementDetail>(&query), filter)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Replace every value of a measurement and store the recomputed status.
    /// The recorder is left unchanged.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &MeasurementInput,
        status: ComplianceStatus,
    ) -> Result<Option<Measurement>, sqlx::Error> {
        let query = format!(
            "UPDATE measurements SET
                date = $2, institution_id = $3, sector_id = $4,
                humidity = $5, air_speed = $6, temperature = $7,
                fungi_internal = $8, fungi_external = $9, ie_ratio = $10,
                aerodispersoids = $11, bacteria_internal = $12, bacteria_external = $13,
                co2_internal = $14, co2_external = $15, pm10 = $16, pm25 = $17,
                status = $18
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let q = sqlx::query_as::<_, Measurement>(&query)
            .bind(id)
            .bind(input.date)
            .bind(input.institution_id)
            .bind(input.sector_id);
        bind_values(q, &input.values)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete a measurement and its file rows in one transaction.
    ///
    /// Returns the public paths of the removed files so the caller can
    /// clean up storage, or `None` if the measurement did not exist.
    pub async fn delete_with_files(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Vec<String>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let paths: Vec<String> =
            sqlx::query_scalar("DELETE FROM measurement_files WHERE measurement_id = $1 RETURNING path")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        let result = sqlx::query("DELETE FROM measurements WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(paths))
    }
}
