pub mod contact_message;
pub mod institution;
pub mod measurement;
pub mod measurement_file;
pub mod sector;
pub mod user;
