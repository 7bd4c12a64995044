use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::User;
use crate::storage::connection::DbConnection;

const USER_COLUMNS: &str = "id, email, full_name, greeting_name, admin, active, language, \
     phone_number, timezone, organization, created_at, updated_at";

/// Repository for user operations
#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

impl UserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a user. Users are provisioned by the authentication service;
    /// the API never creates them.
    pub async fn store_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, full_name, greeting_name, admin, active, language,
                               phone_number, timezone, organization, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.greeting_name)
        .bind(user.admin)
        .bind(user.active)
        .bind(&user.language)
        .bind(&user.phone_number)
        .bind(&user.timezone)
        .bind(&user.organization)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Get a user by ID
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// List all users ordered by greeting name
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM users ORDER BY greeting_name ASC, id ASC",
            USER_COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_user).collect()
    }

    /// List users owning at least one live business
    pub async fn list_users_with_businesses(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM users
            WHERE EXISTS (
                SELECT 1 FROM businesses b
                WHERE b.user_id = users.id AND b.deleted_at IS NULL
            )
            ORDER BY greeting_name ASC, id ASC
            "#,
            USER_COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_user).collect()
    }
}

fn row_to_user(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        full_name: row.try_get("full_name")?,
        greeting_name: row.try_get("greeting_name")?,
        admin: row.try_get("admin")?,
        active: row.try_get("active")?,
        language: row.try_get("language")?,
        phone_number: row.try_get("phone_number")?,
        timezone: row.try_get("timezone")?,
        organization: row.try_get("organization")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
