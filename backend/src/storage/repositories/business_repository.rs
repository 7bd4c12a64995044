use anyhow::Result;
use chrono::NaiveDate;
use shared::{Jurisdiction, LicenseType, QrisRating};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{parse_enum, parse_optional_enum};
use crate::domain::models::Business;
use crate::storage::connection::DbConnection;

const BUSINESS_COLUMNS: &str = "id, user_id, name, license_type, state, zipcode, county, active, \
     qris_rating, accredited, deleted_at, created_at, updated_at";

/// Repository for business operations
#[derive(Clone)]
pub struct BusinessRepository {
    db: DbConnection,
}

impl BusinessRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn store_business(&self, business: &Business) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO businesses (id, user_id, name, license_type, state, zipcode, county, active,
                                    qris_rating, accredited, deleted_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&business.id)
        .bind(&business.user_id)
        .bind(&business.name)
        .bind(business.license_type.as_str())
        .bind(business.state.code())
        .bind(&business.zipcode)
        .bind(&business.county)
        .bind(business.active)
        .bind(business.qris_rating.map(|q| q.as_str()))
        .bind(business.accredited)
        .bind(business.deleted_at)
        .bind(business.created_at)
        .bind(business.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Get a live business by ID, restricted to `owner_id` when given
    pub async fn get_business(&self, business_id: &str, owner_id: Option<&str>) -> Result<Option<Business>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {} FROM businesses
            WHERE id = ? AND deleted_at IS NULL AND (? IS NULL OR user_id = ?)
            "#,
            BUSINESS_COLUMNS
        ))
        .bind(business_id)
        .bind(owner_id)
        .bind(owner_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(row_to_business).transpose()
    }

    /// List live businesses ordered by name
    pub async fn list_businesses(&self, owner_id: Option<&str>) -> Result<Vec<Business>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM businesses
            WHERE deleted_at IS NULL AND (? IS NULL OR user_id = ?)
            ORDER BY name ASC, id ASC
            "#,
            BUSINESS_COLUMNS
        ))
        .bind(owner_id)
        .bind(owner_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_business).collect()
    }

    pub async fn update_business(&self, business: &Business) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE businesses
            SET name = ?, license_type = ?, zipcode = ?, county = ?, active = ?,
                qris_rating = ?, accredited = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&business.name)
        .bind(business.license_type.as_str())
        .bind(&business.zipcode)
        .bind(&business.county)
        .bind(business.active)
        .bind(business.qris_rating.map(|q| q.as_str()))
        .bind(business.accredited)
        .bind(business.updated_at)
        .bind(&business.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Soft-delete a business along with its children and their approvals
    pub async fn soft_delete_business(&self, business_id: &str, deleted_on: NaiveDate) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query(
            r#"
            UPDATE child_approvals SET deleted_at = ?
            WHERE deleted_at IS NULL
              AND child_id IN (SELECT id FROM children WHERE business_id = ?)
            "#,
        )
        .bind(deleted_on)
        .bind(business_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE children SET deleted_at = ? WHERE business_id = ? AND deleted_at IS NULL")
            .bind(deleted_on)
            .bind(business_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("UPDATE businesses SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
            .bind(deleted_on)
            .bind(business_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_business(row: &SqliteRow) -> Result<Business> {
    let license_type: String = row.try_get("license_type")?;
    let state: String = row.try_get("state")?;

    Ok(Business {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        license_type: parse_enum("license_type", &license_type, LicenseType::parse)?,
        state: parse_enum("state", &state, Jurisdiction::from_code)?,
        zipcode: row.try_get("zipcode")?,
        county: row.try_get("county")?,
        active: row.try_get("active")?,
        qris_rating: parse_optional_enum("qris_rating", row.try_get("qris_rating")?, QrisRating::parse)?,
        accredited: row.try_get("accredited")?,
        deleted_at: row.try_get("deleted_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
