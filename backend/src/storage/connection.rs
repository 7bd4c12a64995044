use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// DbConnection manages the SQLite pool and schema
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and set up the schema
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;
        info!("Database ready at {}", url);

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a private in-memory database for tests.
    ///
    /// A single connection that never expires, so the database lives as long
    /// as the pool does.
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                full_name TEXT NOT NULL,
                greeting_name TEXT NOT NULL,
                admin BOOLEAN NOT NULL DEFAULT FALSE,
                active BOOLEAN NOT NULL DEFAULT TRUE,
                language TEXT NOT NULL DEFAULT 'en',
                phone_number TEXT,
                timezone TEXT NOT NULL DEFAULT 'Central Time (US & Canada)',
                organization TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS businesses (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                license_type TEXT NOT NULL,
                state TEXT NOT NULL CHECK (state IN ('IL', 'NE')),
                zipcode TEXT,
                county TEXT,
                active BOOLEAN NOT NULL DEFAULT TRUE,
                qris_rating TEXT,
                accredited BOOLEAN,
                deleted_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users (id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_businesses_user_id ON businesses(user_id);")
            .execute(pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS children (
                id TEXT PRIMARY KEY,
                business_id TEXT NOT NULL,
                full_name TEXT NOT NULL,
                date_of_birth TEXT NOT NULL,
                dhs_id TEXT,
                active BOOLEAN NOT NULL DEFAULT TRUE,
                last_active_date TEXT,
                inactive_reason TEXT,
                deleted_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (business_id) REFERENCES businesses (id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_children_business_id ON children(business_id);")
            .execute(pool)
            .await?;

        // One live enrollment per child and business
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_children_live_identity \
             ON children(business_id, full_name, date_of_birth) WHERE deleted_at IS NULL;",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cases (
                id TEXT PRIMARY KEY,
                case_number TEXT,
                copay_cents INTEGER,
                copay_frequency TEXT,
                effective_on TEXT NOT NULL,
                expires_on TEXT,
                deleted_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS illinois_rates (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                county TEXT,
                license_type TEXT NOT NULL,
                full_day_rate REAL NOT NULL,
                part_day_rate REAL NOT NULL,
                effective_on TEXT NOT NULL,
                expires_on TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS nebraska_rates (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                region TEXT,
                license_type TEXT NOT NULL,
                daily_rate REAL NOT NULL,
                hourly_rate REAL NOT NULL,
                accredited_rate BOOLEAN NOT NULL DEFAULT FALSE,
                effective_on TEXT NOT NULL,
                expires_on TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS child_approvals (
                id TEXT PRIMARY KEY,
                child_id TEXT NOT NULL,
                case_id TEXT NOT NULL,
                rate_type TEXT,
                rate_id TEXT,
                authorized_weekly_hours REAL,
                full_days INTEGER,
                hours REAL,
                enrolled_in_school BOOLEAN,
                special_needs_rate BOOLEAN,
                special_needs_daily_rate REAL,
                special_needs_hourly_rate REAL,
                deleted_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (child_id) REFERENCES children (id),
                FOREIGN KEY (case_id) REFERENCES cases (id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_child_approvals_child_id ON child_approvals(child_id);")
            .execute(pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_child_approvals_case_id ON child_approvals(case_id);")
            .execute(pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_child_approvals_rate ON child_approvals(rate_type, rate_id);")
            .execute(pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS illinois_approval_amounts (
                id TEXT PRIMARY KEY,
                child_approval_id TEXT NOT NULL,
                month TEXT NOT NULL,
                part_days_approved_per_week INTEGER NOT NULL DEFAULT 0,
                full_days_approved_per_week INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (child_approval_id) REFERENCES child_approvals (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS nebraska_approval_amounts (
                id TEXT PRIMARY KEY,
                child_approval_id TEXT NOT NULL,
                effective_on TEXT NOT NULL,
                expires_on TEXT NOT NULL,
                family_fee REAL NOT NULL,
                allocated_family_fee REAL,
                FOREIGN KEY (child_approval_id) REFERENCES child_approvals (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS attendances (
                id TEXT PRIMARY KEY,
                child_approval_id TEXT NOT NULL,
                check_in TEXT NOT NULL,
                check_out TEXT,
                time_in_care INTEGER NOT NULL DEFAULT 0,
                absence TEXT,
                deleted_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (child_approval_id) REFERENCES child_approvals (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_attendances_child_approval_id ON attendances(child_approval_id);")
            .execute(pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_attendances_check_in ON attendances(check_in);")
            .execute(pool)
            .await?;

        Ok(())
    }
}
