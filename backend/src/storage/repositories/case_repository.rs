use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::parse_optional_enum;
use crate::domain::models::Case;
use crate::storage::connection::DbConnection;
use shared::CopayFrequency;

pub(crate) const CASE_COLUMNS: &str = "cs.id AS case_row_id, cs.case_number, cs.copay_cents, cs.copay_frequency, \
     cs.effective_on AS case_effective_on, cs.expires_on AS case_expires_on, \
     cs.deleted_at AS case_deleted_at, cs.created_at AS case_created_at, cs.updated_at AS case_updated_at";

/// Repository for case operations
#[derive(Clone)]
pub struct CaseRepository {
    db: DbConnection,
}

impl CaseRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn get_case(&self, case_id: &str) -> Result<Option<Case>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM cases cs WHERE cs.id = ? AND cs.deleted_at IS NULL",
            CASE_COLUMNS
        ))
        .bind(case_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(row_to_case).transpose()
    }

    /// Get a case only if one of `owner_id`'s children is already on it.
    /// Without an owner any live case is visible.
    pub async fn get_visible_case(&self, case_id: &str, owner_id: Option<&str>) -> Result<Option<Case>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {} FROM cases cs
            WHERE cs.id = ? AND cs.deleted_at IS NULL
              AND (? IS NULL OR EXISTS (
                  SELECT 1 FROM child_approvals ca
                  JOIN children c ON c.id = ca.child_id
                  JOIN businesses b ON b.id = c.business_id
                  WHERE ca.case_id = cs.id AND ca.deleted_at IS NULL AND b.user_id = ?
              ))
            "#,
            CASE_COLUMNS
        ))
        .bind(case_id)
        .bind(owner_id)
        .bind(owner_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(row_to_case).transpose()
    }
}

/// Map the aliased case columns of [`CASE_COLUMNS`]
pub(crate) fn row_to_case(row: &SqliteRow) -> Result<Case> {
    Ok(Case {
        id: row.try_get("case_row_id")?,
        case_number: row.try_get("case_number")?,
        copay_cents: row.try_get("copay_cents")?,
        copay_frequency: parse_optional_enum("copay_frequency", row.try_get("copay_frequency")?, CopayFrequency::parse)?,
        effective_on: row.try_get("case_effective_on")?,
        expires_on: row.try_get("case_expires_on")?,
        deleted_at: row.try_get("case_deleted_at")?,
        created_at: row.try_get("case_created_at")?,
        updated_at: row.try_get("case_updated_at")?,
    })
}
