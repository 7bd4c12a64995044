use anyhow::Result;
use chrono::NaiveDate;
use sqlx::Row;

use crate::domain::date_service::first_day_of_month;
use crate::domain::models::{IllinoisApprovalAmount, NebraskaApprovalAmount};
use crate::storage::connection::DbConnection;

/// Repository for the per-jurisdiction approval amounts
#[derive(Clone)]
pub struct ApprovalAmountRepository {
    db: DbConnection,
}

impl ApprovalAmountRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// The Illinois amount for the month containing `date`
    pub async fn illinois_for_month(
        &self,
        child_approval_id: &str,
        date: NaiveDate,
    ) -> Result<Option<IllinoisApprovalAmount>> {
        let row = sqlx::query(
            r#"
            SELECT id, child_approval_id, month, part_days_approved_per_week, full_days_approved_per_week
            FROM illinois_approval_amounts
            WHERE child_approval_id = ? AND month = ?
            LIMIT 1
            "#,
        )
        .bind(child_approval_id)
        .bind(first_day_of_month(date))
        .fetch_optional(self.db.pool())
        .await?;

        row.map(|row| -> Result<IllinoisApprovalAmount> {
            Ok(IllinoisApprovalAmount {
                id: row.try_get("id")?,
                child_approval_id: row.try_get("child_approval_id")?,
                month: row.try_get("month")?,
                part_days_approved_per_week: row.try_get("part_days_approved_per_week")?,
                full_days_approved_per_week: row.try_get("full_days_approved_per_week")?,
            })
        })
        .transpose()
    }

    /// Every Nebraska amount on an approval, oldest first
    pub async fn nebraska_for_approval(&self, child_approval_id: &str) -> Result<Vec<NebraskaApprovalAmount>> {
        let rows = sqlx::query(
            r#"
            SELECT id, child_approval_id, effective_on, expires_on, family_fee, allocated_family_fee
            FROM nebraska_approval_amounts
            WHERE child_approval_id = ?
            ORDER BY effective_on ASC
            "#,
        )
        .bind(child_approval_id)
        .fetch_all(self.db.pool())
        .await?;

        let mut amounts = Vec::with_capacity(rows.len());
        for row in rows {
            amounts.push(NebraskaApprovalAmount {
                id: row.try_get("id")?,
                child_approval_id: row.try_get("child_approval_id")?,
                effective_on: row.try_get("effective_on")?,
                expires_on: row.try_get("expires_on")?,
                family_fee: row.try_get("family_fee")?,
                allocated_family_fee: row.try_get("allocated_family_fee")?,
            });
        }
        Ok(amounts)
    }
}
