use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::parse_optional_enum;
use crate::domain::models::Attendance;
use crate::storage::connection::DbConnection;
use shared::AbsenceType;

const ATTENDANCE_COLUMNS: &str = "a.id, a.child_approval_id, a.check_in, a.check_out, a.time_in_care, \
     a.absence, a.deleted_at, a.created_at, a.updated_at";

/// Repository for attendance records
#[derive(Clone)]
pub struct AttendanceRepository {
    db: DbConnection,
}

impl AttendanceRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn store_attendance(&self, attendance: &Attendance) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO attendances (id, child_approval_id, check_in, check_out, time_in_care, absence,
                                     deleted_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&attendance.id)
        .bind(&attendance.child_approval_id)
        .bind(attendance.check_in)
        .bind(attendance.check_out)
        .bind(attendance.time_in_care)
        .bind(attendance.absence.map(|a| a.as_str()))
        .bind(attendance.deleted_at)
        .bind(attendance.created_at)
        .bind(attendance.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Live attendances on one approval ordered by check in
    pub async fn list_for_approval(&self, child_approval_id: &str) -> Result<Vec<Attendance>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM attendances a
            WHERE a.child_approval_id = ? AND a.deleted_at IS NULL
            ORDER BY a.check_in ASC
            "#,
            ATTENDANCE_COLUMNS
        ))
        .bind(child_approval_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_attendance).collect()
    }

    /// Live attendances checked in between `from` and `to` inclusive, paired
    /// with the child they belong to. Restricted to `owner_id`'s businesses
    /// when given.
    pub async fn list_in_range(
        &self,
        owner_id: Option<&str>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<(String, Attendance)>> {
        let start: DateTime<Utc> = from.and_time(chrono::NaiveTime::MIN).and_utc();
        let end: DateTime<Utc> = to
            .succ_opt()
            .unwrap_or(to)
            .and_time(chrono::NaiveTime::MIN)
            .and_utc();

        let rows = sqlx::query(&format!(
            r#"
            SELECT {}, c.id AS owning_child_id FROM attendances a
            JOIN child_approvals ca ON ca.id = a.child_approval_id
            JOIN children c ON c.id = ca.child_id
            JOIN businesses b ON b.id = c.business_id
            WHERE a.deleted_at IS NULL AND c.deleted_at IS NULL AND b.deleted_at IS NULL
              AND a.check_in >= ? AND a.check_in < ?
              AND (? IS NULL OR b.user_id = ?)
            ORDER BY a.check_in ASC
            "#,
            ATTENDANCE_COLUMNS
        ))
        .bind(start)
        .bind(end)
        .bind(owner_id)
        .bind(owner_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(|row| Ok((row.try_get("owning_child_id")?, row_to_attendance(row)?)))
            .collect()
    }
}

fn row_to_attendance(row: &SqliteRow) -> Result<Attendance> {
    Ok(Attendance {
        id: row.try_get("id")?,
        child_approval_id: row.try_get("child_approval_id")?,
        check_in: row.try_get("check_in")?,
        check_out: row.try_get("check_out")?,
        time_in_care: row.try_get("time_in_care")?,
        absence: parse_optional_enum("absence", row.try_get("absence")?, AbsenceType::parse)?,
        deleted_at: row.try_get("deleted_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
