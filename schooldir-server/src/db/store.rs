//! Storage seam for school records

use async_trait::async_trait;

use super::is_missing_table;
use super::schema::SCHOOLS_TABLE;
use crate::models::{NewSchool, School, SchoolId};

/// Store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The `schools` table hasn't been created yet
    #[error("Table '{table}' doesn't exist")]
    MissingTable { table: &'static str },

    #[error("{0}")]
    Database(sqlx::Error),

    /// Failure raised by the in-memory test store
    #[cfg(test)]
    #[error("{0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_missing_table(&self) -> bool {
        matches!(self, Self::MissingTable { .. })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if is_missing_table(&err) {
            Self::MissingTable {
                table: SCHOOLS_TABLE,
            }
        } else {
            Self::Database(err)
        }
    }
}

/// Persistence operations the record service relies on
#[async_trait]
pub trait SchoolStore: Send + Sync {
    /// All schools, newest first
    async fn list(&self) -> Result<Vec<School>, StoreError>;

    async fn contact_exists(&self, contact: &str) -> Result<bool, StoreError>;

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;

    /// Insert a row and return its id
    async fn insert(
        &self,
        school: &NewSchool,
        image_path: Option<&str>,
    ) -> Result<SchoolId, StoreError>;

    /// Point a row at a new image; returns the number of rows touched
    async fn set_image(&self, id: SchoolId, image_path: &str) -> Result<u64, StoreError>;

    /// Create the `schools` table if it is absent
    async fn ensure_schema(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_sqlx_errors_stay_database_errors() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Database(_)));
        assert!(!err.is_missing_table());
    }

    #[test]
    fn missing_table_display() {
        let err = StoreError::MissingTable { table: "schools" };
        assert_eq!(err.to_string(), "Table 'schools' doesn't exist");
    }
}
