use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use super::commands::attendance::{
    AttendanceBatchResult, RecordAttendanceCommand, RecordedAttendance, RejectedAttendance,
};
use super::date_service::week_bounds;
use super::errors::{ServiceError, ServiceResult};
use super::models::{generate_id, Attendance, User};
use super::policy::Scope;
use crate::storage::{AttendanceRepository, ChildApprovalRepository, ChildRepository, DbConnection};

/// Service for recording and listing attendances
#[derive(Clone)]
pub struct AttendanceService {
    attendance_repository: AttendanceRepository,
    child_repository: ChildRepository,
    child_approval_repository: ChildApprovalRepository,
}

impl AttendanceService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            attendance_repository: AttendanceRepository::new(db.clone()),
            child_repository: ChildRepository::new(db.clone()),
            child_approval_repository: ChildApprovalRepository::new(db),
        }
    }

    /// Record a batch of attendances.
    ///
    /// Each item is billed to the child's approval whose case covers the
    /// check-in date. Items that cannot be recorded are reported back with
    /// their position instead of failing the whole batch.
    pub async fn record_batch(
        &self,
        current: &User,
        commands: Vec<RecordAttendanceCommand>,
    ) -> ServiceResult<AttendanceBatchResult> {
        info!("Recording batch of {} attendances for user {}", commands.len(), current.id);
        let mut result = AttendanceBatchResult::default();

        for (index, command) in commands.into_iter().enumerate() {
            let child_id = command.child_id.clone();
            match self.record_one(current, command).await {
                Ok(attendance) => result.recorded.push(RecordedAttendance { child_id, attendance }),
                Err(ServiceError::Storage(err)) => return Err(ServiceError::Storage(err)),
                Err(err) => {
                    warn!("Rejected attendance {} for child {}: {}", index, child_id, err);
                    result.rejected.push(RejectedAttendance {
                        index,
                        child_id,
                        message: err.to_string(),
                    });
                }
            }
        }

        info!(
            "Recorded {} attendances, rejected {}",
            result.recorded.len(),
            result.rejected.len()
        );
        Ok(result)
    }

    /// Attendances checked in during the Sunday to Saturday week containing `date`
    pub async fn list_for_week(&self, current: &User, date: NaiveDate) -> ServiceResult<Vec<RecordedAttendance>> {
        let scope = Scope::for_user(current);
        let (from, to) = week_bounds(date);
        let rows = self.attendance_repository.list_in_range(scope.owner_id(), from, to).await?;
        info!("Found {} attendances between {} and {}", rows.len(), from, to);

        Ok(rows
            .into_iter()
            .map(|(child_id, attendance)| RecordedAttendance { child_id, attendance })
            .collect())
    }

    async fn record_one(&self, current: &User, command: RecordAttendanceCommand) -> ServiceResult<Attendance> {
        let scope = Scope::for_user(current);
        let child = self
            .child_repository
            .get_child(&command.child_id, scope.owner_id())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Child {}", command.child_id)))?;

        if let Some(check_out) = command.check_out {
            if check_out < command.check_in {
                return Err(ServiceError::Validation("Check out cannot be before check in".to_string()));
            }
        }

        let check_in_date = command.check_in.date_naive();
        let approval = self
            .child_approval_repository
            .find_covering(&child.id, check_in_date)
            .await?
            .ok_or_else(|| {
                ServiceError::Validation(format!("{} has no approval covering {}", child.full_name, check_in_date))
            })?;

        let now = Utc::now();
        let attendance = Attendance {
            id: generate_id(),
            child_approval_id: approval.approval.id,
            check_in: command.check_in,
            check_out: command.check_out,
            time_in_care: Attendance::compute_time_in_care(command.check_in, command.check_out),
            absence: command.absence,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        self.attendance_repository.store_attendance(&attendance).await?;
        Ok(attendance)
    }
}
