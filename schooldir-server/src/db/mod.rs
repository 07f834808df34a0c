//! Database layer - connection provider, schema guard and the school store
//!
//! # Design Principles
//!
//! - One lazily created pool per process, shared by every request
//! - Missing database and missing table are repaired, not reported
//! - Callers see the [`SchoolStore`] trait, not MySQL

pub mod pool;
pub mod repos;
pub mod schema;
pub mod store;

use sqlx::mysql::MySqlDatabaseError;

pub use pool::Database;
pub use repos::MySqlSchoolRepo;
pub use schema::ensure_schema;
pub use store::{SchoolStore, StoreError};

/// MySQL `ER_BAD_DB_ERROR`: unknown database
pub const ER_BAD_DB_ERROR: u16 = 1049;

/// MySQL `ER_NO_SUCH_TABLE`: table doesn't exist
pub const ER_NO_SUCH_TABLE: u16 = 1146;

/// Server error number of a MySQL-reported failure
pub fn mysql_error_number(err: &sqlx::Error) -> Option<u16> {
    match err {
        sqlx::Error::Database(db) => db
            .try_downcast_ref::<MySqlDatabaseError>()
            .map(MySqlDatabaseError::number),
        _ => None,
    }
}

pub fn is_unknown_database(err: &sqlx::Error) -> bool {
    mysql_error_number(err) == Some(ER_BAD_DB_ERROR)
}

pub fn is_missing_table(err: &sqlx::Error) -> bool {
    mysql_error_number(err) == Some(ER_NO_SUCH_TABLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_have_no_number() {
        let err = sqlx::Error::RowNotFound;
        assert_eq!(mysql_error_number(&err), None);
        assert!(!is_unknown_database(&err));
        assert!(!is_missing_table(&err));
    }
}
