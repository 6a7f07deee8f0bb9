pub mod auth;
pub mod contact;
pub mod dashboard;
pub mod files;
pub mod institutions;
pub mod measurements;
pub mod reports;
pub mod sectors;
pub mod users;
