use crate::domain::commands::attendance::{
    AttendanceBatchResult, RecordAttendanceCommand, RecordedAttendance, RejectedAttendance,
};
use shared::{
    Attendance as SharedAttendance, AttendanceBatchError, AttendanceBatchItem, AttendanceBatchMeta,
    AttendanceBatchResponse,
};

pub struct AttendanceMapper;

impl AttendanceMapper {
    pub fn to_dto(recorded: RecordedAttendance) -> SharedAttendance {
        let attendance = recorded.attendance;
        SharedAttendance {
            id: attendance.id,
            child_approval_id: attendance.child_approval_id,
            child_id: recorded.child_id,
            check_in: attendance.check_in,
            check_out: attendance.check_out,
            time_in_care: attendance.time_in_care,
            absence: attendance.absence,
        }
    }

    pub fn to_commands(items: Vec<AttendanceBatchItem>) -> Vec<RecordAttendanceCommand> {
        items
            .into_iter()
            .map(|item| RecordAttendanceCommand {
                child_id: item.child_id,
                check_in: item.check_in,
                check_out: item.check_out,
                absence: item.absence,
            })
            .collect()
    }

    pub fn to_batch_response(result: AttendanceBatchResult) -> AttendanceBatchResponse {
        AttendanceBatchResponse {
            attendances: result.recorded.into_iter().map(Self::to_dto).collect(),
            meta: AttendanceBatchMeta {
                errors: result.rejected.into_iter().map(Self::to_error_dto).collect(),
            },
        }
    }

    fn to_error_dto(rejected: RejectedAttendance) -> AttendanceBatchError {
        AttendanceBatchError {
            index: rejected.index,
            child_id: rejected.child_id,
            message: rejected.message,
        }
    }
}
