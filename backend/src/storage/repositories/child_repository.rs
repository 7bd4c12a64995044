use anyhow::Result;
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::{Case, Child, ChildApproval, IllinoisApprovalAmount, NebraskaApprovalAmount};
use crate::storage::connection::DbConnection;

const CHILD_COLUMNS: &str = "c.id, c.business_id, c.full_name, c.date_of_birth, c.dhs_id, c.active, \
     c.last_active_date, c.inactive_reason, c.deleted_at, c.created_at, c.updated_at";

/// Everything written for one approval when a child is created
#[derive(Debug, Clone)]
pub struct NewChildApproval {
    /// A case to insert first; `None` when attaching to an existing case
    pub new_case: Option<Case>,
    pub approval: ChildApproval,
    pub illinois_amounts: Vec<IllinoisApprovalAmount>,
    pub nebraska_amounts: Vec<NebraskaApprovalAmount>,
}

/// Repository for child operations
#[derive(Clone)]
pub struct ChildRepository {
    db: DbConnection,
}

impl ChildRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a child together with its cases, approvals and approval amounts
    /// in one transaction
    pub async fn store_child_with_approvals(&self, child: &Child, approvals: &[NewChildApproval]) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO children (id, business_id, full_name, date_of_birth, dhs_id, active,
                                  last_active_date, inactive_reason, deleted_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&child.id)
        .bind(&child.business_id)
        .bind(&child.full_name)
        .bind(child.date_of_birth)
        .bind(&child.dhs_id)
        .bind(child.active)
        .bind(child.last_active_date)
        .bind(&child.inactive_reason)
        .bind(child.deleted_at)
        .bind(child.created_at)
        .bind(child.updated_at)
        .execute(&mut *tx)
        .await?;

        for entry in approvals {
            if let Some(case) = &entry.new_case {
                sqlx::query(
                    r#"
                    INSERT INTO cases (id, case_number, copay_cents, copay_frequency, effective_on,
                                       expires_on, deleted_at, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&case.id)
                .bind(&case.case_number)
                .bind(case.copay_cents)
                .bind(case.copay_frequency.map(|f| f.as_str()))
                .bind(case.effective_on)
                .bind(case.expires_on)
                .bind(case.deleted_at)
                .bind(case.created_at)
                .bind(case.updated_at)
                .execute(&mut *tx)
                .await?;
            }

            let approval = &entry.approval;
            sqlx::query(
                r#"
                INSERT INTO child_approvals (id, child_id, case_id, rate_type, rate_id,
                                             authorized_weekly_hours, full_days, hours,
                                             enrolled_in_school, special_needs_rate,
                                             special_needs_daily_rate, special_needs_hourly_rate,
                                             deleted_at, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&approval.id)
            .bind(&approval.child_id)
            .bind(&approval.case_id)
            .bind(approval.rate.as_ref().map(|r| r.rate_type()))
            .bind(approval.rate.as_ref().map(|r| r.id().to_string()))
            .bind(approval.authorized_weekly_hours)
            .bind(approval.full_days)
            .bind(approval.hours)
            .bind(approval.enrolled_in_school)
            .bind(approval.special_needs_rate)
            .bind(approval.special_needs_daily_rate)
            .bind(approval.special_needs_hourly_rate)
            .bind(approval.deleted_at)
            .bind(approval.created_at)
            .bind(approval.updated_at)
            .execute(&mut *tx)
            .await?;

            for amount in &entry.illinois_amounts {
                sqlx::query(
                    r#"
                    INSERT INTO illinois_approval_amounts (id, child_approval_id, month,
                                                           part_days_approved_per_week,
                                                           full_days_approved_per_week)
                    VALUES (?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&amount.id)
                .bind(&amount.child_approval_id)
                .bind(amount.month)
                .bind(amount.part_days_approved_per_week)
                .bind(amount.full_days_approved_per_week)
                .execute(&mut *tx)
                .await?;
            }

            for amount in &entry.nebraska_amounts {
                sqlx::query(
                    r#"
                    INSERT INTO nebraska_approval_amounts (id, child_approval_id, effective_on,
                                                           expires_on, family_fee, allocated_family_fee)
                    VALUES (?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&amount.id)
                .bind(&amount.child_approval_id)
                .bind(amount.effective_on)
                .bind(amount.expires_on)
                .bind(amount.family_fee)
                .bind(amount.allocated_family_fee)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Get a live child by ID, restricted to businesses of `owner_id` when given
    pub async fn get_child(&self, child_id: &str, owner_id: Option<&str>) -> Result<Option<Child>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {} FROM children c
            JOIN businesses b ON b.id = c.business_id
            WHERE c.id = ? AND c.deleted_at IS NULL AND b.deleted_at IS NULL
              AND (? IS NULL OR b.user_id = ?)
            "#,
            CHILD_COLUMNS
        ))
        .bind(child_id)
        .bind(owner_id)
        .bind(owner_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(row_to_child).transpose()
    }

    /// List live children ordered by name
    pub async fn list_children(&self, owner_id: Option<&str>) -> Result<Vec<Child>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM children c
            JOIN businesses b ON b.id = c.business_id
            WHERE c.deleted_at IS NULL AND b.deleted_at IS NULL
              AND (? IS NULL OR b.user_id = ?)
            ORDER BY c.full_name ASC, c.id ASC
            "#,
            CHILD_COLUMNS
        ))
        .bind(owner_id)
        .bind(owner_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_child).collect()
    }

    /// List live children of one business ordered by name
    pub async fn list_children_for_business(&self, business_id: &str) -> Result<Vec<Child>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM children c
            WHERE c.business_id = ? AND c.deleted_at IS NULL
            ORDER BY c.full_name ASC, c.id ASC
            "#,
            CHILD_COLUMNS
        ))
        .bind(business_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_child).collect()
    }

    /// Whether another live child at the business has this name and birthday
    pub async fn duplicate_exists(
        &self,
        business_id: &str,
        full_name: &str,
        date_of_birth: NaiveDate,
        except_id: Option<&str>,
    ) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT 1 FROM children
            WHERE business_id = ? AND full_name = ? AND date_of_birth = ?
              AND deleted_at IS NULL AND (? IS NULL OR id != ?)
            LIMIT 1
            "#,
        )
        .bind(business_id)
        .bind(full_name)
        .bind(date_of_birth)
        .bind(except_id)
        .bind(except_id)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(row.is_some())
    }

    pub async fn update_child(&self, child: &Child) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE children
            SET full_name = ?, date_of_birth = ?, dhs_id = ?, active = ?, last_active_date = ?,
                inactive_reason = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&child.full_name)
        .bind(child.date_of_birth)
        .bind(&child.dhs_id)
        .bind(child.active)
        .bind(child.last_active_date)
        .bind(&child.inactive_reason)
        .bind(child.updated_at)
        .bind(&child.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Soft-delete a child and its approvals. Cases may be shared with
    /// siblings and are left alone.
    pub async fn soft_delete_child(&self, child_id: &str, deleted_on: NaiveDate) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("UPDATE child_approvals SET deleted_at = ? WHERE child_id = ? AND deleted_at IS NULL")
            .bind(deleted_on)
            .bind(child_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("UPDATE children SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
            .bind(deleted_on)
            .bind(child_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_child(row: &SqliteRow) -> Result<Child> {
    Ok(Child {
        id: row.try_get("id")?,
        business_id: row.try_get("business_id")?,
        full_name: row.try_get("full_name")?,
        date_of_birth: row.try_get("date_of_birth")?,
        dhs_id: row.try_get("dhs_id")?,
        active: row.try_get("active")?,
        last_active_date: row.try_get("last_active_date")?,
        inactive_reason: row.try_get("inactive_reason")?,
        deleted_at: row.try_get("deleted_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
