//! Repository layer: one zero-sized struct per table, every method taking
//! `&PgPool` and returning `sqlx::Error`.

pub mod contact_message_repo;
pub mod institution_repo;
pub mod measurement_file_repo;
pub mod measurement_repo;
pub mod sector_repo;
pub mod user_repo;

pub use contact_message_repo::ContactMessageRepo;
pub use institution_repo::InstitutionRepo;
pub use measurement_file_repo::MeasurementFileRepo;
pub use measurement_repo::MeasurementRepo;
pub use sector_repo::SectorRepo;
pub use user_repo::UserRepo;
