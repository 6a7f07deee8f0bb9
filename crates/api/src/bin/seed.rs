//! Populate a database with a demo admin, two institutions, four sectors
//! and 60 days of randomised measurements per sector.
//!
//! Safe to re-run: existing users, institutions and sectors are reused, and
//! sectors that already hold measurements are left alone.

use anyhow::Context;
use chrono::{TimeDelta, Utc};
use rand::Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use airwatch_api::auth::password::hash_password;
use airwatch_core::compliance::{compute_status, MeasurementValues};
use airwatch_core::roles::ROLE_ADMIN;
use airwatch_core::types::DbId;
use airwatch_db::models::institution::CreateInstitution;
use airwatch_db::models::measurement::{MeasurementFilter, MeasurementInput};
use airwatch_db::models::sector::CreateSector;
use airwatch_db::models::user::CreateUser;
use airwatch_db::repositories::{InstitutionRepo, MeasurementRepo, SectorRepo, UserRepo};
use airwatch_db::DbPool;

const ADMIN_NAME: &str = "Administrador";
const ADMIN_EMAIL: &str = "admin@sistema.local";
const ADMIN_PASSWORD: &str = "admin123";

const DAYS_PER_SECTOR: i64 = 60;

/// (institution, sectors)
const LAYOUT: [(&str, [&str; 2]); 2] = [
    ("Hospital Alfa", ["UTI Adulto", "Laboratório"]),
    ("Universidade Beta", ["Biblioteca", "Sala de Aula"]),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "airwatch_seed=info,airwatch_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = airwatch_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    airwatch_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let admin_id = ensure_admin(&pool).await?;

    for (institution_name, sector_names) in LAYOUT {
        let institution_id = ensure_institution(&pool, institution_name).await?;
        for sector_name in sector_names {
            let sector_id = ensure_sector(&pool, institution_id, sector_name).await?;
            let inserted =
                seed_measurements(&pool, admin_id, institution_id, sector_id).await?;
            tracing::info!(
                institution = institution_name,
                sector = sector_name,
                inserted,
                "Sector seeded"
            );
        }
    }

    tracing::info!("Seed complete");
    Ok(())
}

async fn ensure_admin(pool: &DbPool) -> anyhow::Result<DbId> {
    if let Some(user) = UserRepo::find_by_email(pool, ADMIN_EMAIL).await? {
        tracing::info!(email = ADMIN_EMAIL, "Admin user already exists");
        return Ok(user.id);
    }

    let password_hash =
        hash_password(ADMIN_PASSWORD).map_err(|e| anyhow::anyhow!("hashing failed: {e}"))?;
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: ADMIN_NAME.to_string(),
            email: ADMIN_EMAIL.to_string(),
            password_hash,
            role: ROLE_ADMIN.to_string(),
        },
    )
    .await
    .context("Failed to create admin user")?;

    tracing::info!(email = ADMIN_EMAIL, "Admin user created");
    Ok(user.id)
}

async fn ensure_institution(pool: &DbPool, name: &str) -> anyhow::Result<DbId> {
    if let Some(existing) = InstitutionRepo::find_by_name(pool, name).await? {
        return Ok(existing.id);
    }
    let created = InstitutionRepo::create(
        pool,
        &CreateInstitution {
            name: name.to_string(),
        },
    )
    .await
    .with_context(|| format!("Failed to create institution '{name}'"))?;
    Ok(created.id)
}

async fn ensure_sector(pool: &DbPool, institution_id: DbId, name: &str) -> anyhow::Result<DbId> {
    if let Some(existing) = SectorRepo::find_by_name(pool, institution_id, name).await? {
        return Ok(existing.id);
    }
    let created = SectorRepo::create(
        pool,
        &CreateSector {
            name: name.to_string(),
            institution_id,
        },
    )
    .await
    .with_context(|| format!("Failed to create sector '{name}'"))?;
    Ok(created.id)
}

/// One measurement per day going back [`DAYS_PER_SECTOR`] days. Returns the
/// number inserted (0 if the sector already has data).
async fn seed_measurements(
    pool: &DbPool,
    user_id: DbId,
    institution_id: DbId,
    sector_id: DbId,
) -> anyhow::Result<i64> {
    let filter = MeasurementFilter {
        sector_id: Some(sector_id),
        ..MeasurementFilter::default()
    };
    if MeasurementRepo::count(pool, &filter).await? > 0 {
        return Ok(0);
    }

    let now = Utc::now();
    for day in 0..DAYS_PER_SECTOR {
        let values = random_values(&mut rand::rng());
        let input = MeasurementInput {
            date: now - TimeDelta::days(day),
            institution_id,
            sector_id,
            values,
        };
        MeasurementRepo::create(pool, user_id, &input, compute_status(&values)).await?;
    }
    Ok(DAYS_PER_SECTOR)
}

/// Uniform in `[min, max)`, rounded to two decimals.
fn in_range(rng: &mut impl Rng, min: f64, max: f64) -> f64 {
    (rng.random_range(min..max) * 100.0).round() / 100.0
}

/// Plausible readings; ranges straddle the limits so both verdicts occur.
fn random_values(rng: &mut impl Rng) -> MeasurementValues {
    MeasurementValues {
        humidity: in_range(rng, 38.0, 72.0),
        air_speed: in_range(rng, 0.1, 0.28),
        temperature: in_range(rng, 22.0, 29.0),
        fungi_internal: in_range(rng, 300.0, 900.0),
        fungi_external: in_range(rng, 300.0, 1200.0),
        ie_ratio: in_range(rng, 0.9, 1.8),
        aerodispersoids: in_range(rng, 40.0, 100.0),
        bacteria_internal: in_range(rng, 200.0, 600.0),
        bacteria_external: in_range(rng, 200.0, 1200.0),
        co2_internal: in_range(rng, 500.0, 1200.0),
        co2_external: in_range(rng, 380.0, 450.0),
        pm10: in_range(rng, 30.0, 65.0),
        pm25: in_range(rng, 15.0, 35.0),
    }
}
