//! Repository implementations for database access

pub mod schools;

pub use schools::MySqlSchoolRepo;
