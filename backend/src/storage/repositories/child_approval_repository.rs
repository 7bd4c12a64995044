use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::case_repository::{row_to_case, CASE_COLUMNS};
use crate::domain::models::{ApprovalWithCase, ChildApproval, RateRef};
use crate::storage::connection::DbConnection;

const APPROVAL_COLUMNS: &str = "ca.id, ca.child_id, ca.case_id, ca.rate_type, ca.rate_id, \
     ca.authorized_weekly_hours, ca.full_days, ca.hours, ca.enrolled_in_school, ca.special_needs_rate, \
     ca.special_needs_daily_rate, ca.special_needs_hourly_rate, ca.deleted_at, ca.created_at, ca.updated_at";

/// Repository for child approvals, always loaded with their case
#[derive(Clone)]
pub struct ChildApprovalRepository {
    db: DbConnection,
}

impl ChildApprovalRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Live approvals for a child, newest case first
    pub async fn list_for_child(&self, child_id: &str) -> Result<Vec<ApprovalWithCase>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}, {} FROM child_approvals ca
            JOIN cases cs ON cs.id = ca.case_id
            WHERE ca.child_id = ? AND ca.deleted_at IS NULL AND cs.deleted_at IS NULL
            ORDER BY cs.effective_on DESC, ca.created_at DESC
            "#,
            APPROVAL_COLUMNS, CASE_COLUMNS
        ))
        .bind(child_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_approval_with_case).collect()
    }

    /// The approval whose case window contains `date`, if any. When windows
    /// overlap the most recently effective case wins.
    pub async fn find_covering(&self, child_id: &str, date: NaiveDate) -> Result<Option<ApprovalWithCase>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {}, {} FROM child_approvals ca
            JOIN cases cs ON cs.id = ca.case_id
            WHERE ca.child_id = ? AND ca.deleted_at IS NULL AND cs.deleted_at IS NULL
              AND cs.effective_on <= ? AND (cs.expires_on IS NULL OR cs.expires_on >= ?)
            ORDER BY cs.effective_on DESC, ca.created_at DESC
            LIMIT 1
            "#,
            APPROVAL_COLUMNS, CASE_COLUMNS
        ))
        .bind(child_id)
        .bind(date)
        .bind(date)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(row_to_approval_with_case).transpose()
    }
}

fn row_to_approval_with_case(row: &SqliteRow) -> Result<ApprovalWithCase> {
    let rate_type: Option<String> = row.try_get("rate_type")?;
    let rate_id: Option<String> = row.try_get("rate_id")?;
    let rate = RateRef::from_parts(rate_type.as_deref(), rate_id.as_deref()).map_err(|e| anyhow!(e))?;

    let approval = ChildApproval {
        id: row.try_get("id")?,
        child_id: row.try_get("child_id")?,
        case_id: row.try_get("case_id")?,
        rate,
        authorized_weekly_hours: row.try_get("authorized_weekly_hours")?,
        full_days: row.try_get("full_days")?,
        hours: row.try_get("hours")?,
        enrolled_in_school: row.try_get("enrolled_in_school")?,
        special_needs_rate: row.try_get("special_needs_rate")?,
        special_needs_daily_rate: row.try_get("special_needs_daily_rate")?,
        special_needs_hourly_rate: row.try_get("special_needs_hourly_rate")?,
        deleted_at: row.try_get("deleted_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    };

    Ok(ApprovalWithCase {
        approval,
        case: row_to_case(row)?,
    })
}
