//! School repository
//!
//! MySQL implementation of [`SchoolStore`]. Every call goes through the
//! lazily provisioned [`Database`] pool.

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::schema;
use crate::db::store::{SchoolStore, StoreError};
use crate::db::Database;
use crate::models::{NewSchool, School, SchoolId};

/// School repository backed by MySQL
#[derive(Clone)]
pub struct MySqlSchoolRepo {
    db: Arc<Database>,
}

impl MySqlSchoolRepo {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    async fn exists(&self, sql: &str, value: &str) -> Result<bool, StoreError> {
        let pool = self.db.acquire().await?;
        let row: Option<(SchoolId,)> = sqlx::query_as(sql).bind(value).fetch_optional(pool).await?;
        Ok(row.is_some())
    }

    /// Remove every row and reset the id counter
    pub async fn truncate(&self) -> Result<(), StoreError> {
        let pool = self.db.acquire().await?;
        sqlx::query("TRUNCATE TABLE schools").execute(pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SchoolStore for MySqlSchoolRepo {
    async fn list(&self) -> Result<Vec<School>, StoreError> {
        let pool = self.db.acquire().await?;
        let schools = sqlx::query_as::<_, School>(
            r#"
            SELECT id, name, address, city, state, contact, email, imagePath, createdAt
            FROM schools
            ORDER BY id DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(schools)
    }

    async fn contact_exists(&self, contact: &str) -> Result<bool, StoreError> {
        self.exists("SELECT id FROM schools WHERE contact = ? LIMIT 1", contact)
            .await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        self.exists("SELECT id FROM schools WHERE email = ? LIMIT 1", email)
            .await
    }

    async fn insert(
        &self,
        school: &NewSchool,
        image_path: Option<&str>,
    ) -> Result<SchoolId, StoreError> {
        let pool = self.db.acquire().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO schools (name, address, city, state, contact, email, imagePath)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(school.name())
        .bind(school.address())
        .bind(school.city())
        .bind(school.state())
        .bind(school.contact())
        .bind(school.email())
        .bind(image_path)
        .execute(pool)
        .await?;

        // `INT AUTO_INCREMENT` ids always fit
        let id = SchoolId::try_from(result.last_insert_id())
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        Ok(id)
    }

    async fn set_image(&self, id: SchoolId, image_path: &str) -> Result<u64, StoreError> {
        let pool = self.db.acquire().await?;
        let result = sqlx::query("UPDATE schools SET imagePath = ? WHERE id = ?")
            .bind(image_path)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let pool = self.db.acquire().await?;
        schema::ensure_schema(pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbConfig;
    use crate::models::SchoolForm;

    // Integration tests - run with MYSQL_* set
    // cargo test -p schooldir-server -- --ignored

    fn repo() -> MySqlSchoolRepo {
        let mut config = DbConfig::from_env().expect("config");
        config.database = format!("schooldir_test_{}", uuid::Uuid::new_v4().simple());
        MySqlSchoolRepo::new(Arc::new(Database::new(config)))
    }

    fn candidate(contact: &str, email: &str) -> NewSchool {
        NewSchool::from_form(SchoolForm {
            name: "Heritage Public School".into(),
            address: "5 River Lane".into(),
            city: "Chennai".into(),
            state: "Tamil Nadu".into(),
            contact: contact.into(),
            email: email.into(),
        })
        .expect("valid candidate")
    }

    async fn drop_database(repo: &MySqlSchoolRepo) {
        let pool = repo.database().acquire().await.expect("pool");
        let sql = format!("DROP DATABASE `{}`", repo.database().config().database);
        sqlx::query(&sql).execute(pool).await.expect("drop");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn reads_tables_with_signed_int_ids() {
        let repo = repo();
        let pool = repo.database().acquire().await.expect("pool");
        sqlx::query(
            r#"
            CREATE TABLE schools (
                id INT AUTO_INCREMENT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                address VARCHAR(255) NOT NULL,
                city VARCHAR(100) NOT NULL,
                state VARCHAR(100) NOT NULL,
                contact VARCHAR(20) NOT NULL,
                email VARCHAR(255) NOT NULL,
                imagePath VARCHAR(500) NULL,
                createdAt TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await
        .expect("legacy table");

        let id = repo
            .insert(&candidate("9444444444", "hps@example.com"), None)
            .await
            .expect("insert");
        assert_eq!(id, 1);

        let rows = repo.list().await.expect("list");
        assert_eq!(rows[0].id, 1);
        assert!(repo.contact_exists("9444444444").await.expect("query"));
        assert_eq!(repo.set_image(id, "/schoolImages/a.webp").await.expect("update"), 1);

        drop_database(&repo).await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn insert_reports_missing_table() {
        let repo = repo();
        let err = repo
            .insert(&candidate("9444444444", "hps@example.com"), None)
            .await
            .unwrap_err();
        assert!(err.is_missing_table());
        drop_database(&repo).await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn insert_then_list_newest_first() {
        let repo = repo();
        repo.ensure_schema().await.expect("schema");

        let first = repo
            .insert(&candidate("9444444444", "hps@example.com"), None)
            .await
            .expect("insert");
        let second = repo
            .insert(&candidate("9333333333", "bfa@example.com"), Some("/schoolImages/a.webp"))
            .await
            .expect("insert");
        assert_eq!(first, 1);
        assert!(second > first);

        let rows = repo.list().await.expect("list");
        assert_eq!(rows.iter().map(|s| s.id).collect::<Vec<_>>(), vec![second, first]);
        assert_eq!(rows[0].image_path.as_deref(), Some("/schoolImages/a.webp"));
        assert!(repo.contact_exists("9444444444").await.expect("query"));
        assert!(!repo.email_exists("nobody@example.com").await.expect("query"));

        drop_database(&repo).await;
    }
}
