//! Schema guard for the `schools` table

use sqlx::MySqlPool;

pub const SCHOOLS_TABLE: &str = "schools";

/// Fixed schema of the `schools` table
pub const CREATE_SCHOOLS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS schools (
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
"#;

/// Create the `schools` table if it doesn't exist yet
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    tracing::info!(table = SCHOOLS_TABLE, "Ensuring schema");
    sqlx::query(CREATE_SCHOOLS_TABLE).execute(pool).await?;
    Ok(())
}
