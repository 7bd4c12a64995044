use crate::domain::commands::child::{
    ApprovalDetails, CaseSource, CreateChildCommand, NewApproval, NewCase, NewIllinoisAmount, NewNebraskaAmount,
    UpdateChildCommand,
};
use crate::domain::errors::{ServiceError, ServiceResult};
use crate::domain::models::{ApprovalWithCase, RateRef};
use crate::domain::ChildWithCases;
use shared::{ApprovalAttributes, Child as SharedChild, ChildCase, CreateChildRequest, UpdateChildRequest};

/// Mapper between child DTOs and the domain's children, cases and approvals
pub struct ChildMapper;

impl ChildMapper {
    pub fn to_dto(domain: ChildWithCases) -> SharedChild {
        let child = domain.child;
        SharedChild {
            id: child.id,
            business_id: child.business_id,
            full_name: child.full_name,
            date_of_birth: child.date_of_birth,
            dhs_id: child.dhs_id,
            active: child.active,
            last_active_date: child.last_active_date,
            inactive_reason: child.inactive_reason,
            cases: domain.approvals.into_iter().map(Self::to_case_dto).collect(),
            created_at: child.created_at,
            updated_at: child.updated_at,
        }
    }

    fn to_case_dto(domain: ApprovalWithCase) -> ChildCase {
        let ApprovalWithCase { approval, case } = domain;
        ChildCase {
            id: approval.id,
            case_id: case.id,
            case_number: case.case_number,
            effective_on: case.effective_on,
            expires_on: case.expires_on,
            copay_cents: case.copay_cents,
            copay_frequency: case.copay_frequency,
            authorized_weekly_hours: approval.authorized_weekly_hours,
            full_days: approval.full_days,
            hours: approval.hours,
            enrolled_in_school: approval.enrolled_in_school,
            special_needs_rate: approval.special_needs_rate,
            special_needs_daily_rate: approval.special_needs_daily_rate,
            special_needs_hourly_rate: approval.special_needs_hourly_rate,
            rate_type: approval.rate.as_ref().map(|r| r.rate_type().to_string()),
            rate_id: approval.rate.map(|r| r.id().to_string()),
        }
    }

    pub fn to_create_command(request: CreateChildRequest) -> ServiceResult<CreateChildCommand> {
        let approvals = request
            .approvals
            .into_iter()
            .map(Self::to_new_approval)
            .collect::<ServiceResult<Vec<_>>>()?;

        Ok(CreateChildCommand {
            business_id: request.business_id,
            full_name: request.full_name,
            date_of_birth: request.date_of_birth,
            dhs_id: request.dhs_id,
            approvals,
        })
    }

    /// An approval names an existing case by `case_id`, or describes a new
    /// one starting at `effective_on`
    fn to_new_approval(attributes: ApprovalAttributes) -> ServiceResult<NewApproval> {
        let case = match (attributes.case_id, attributes.effective_on) {
            (Some(case_id), _) => CaseSource::Existing(case_id),
            (None, Some(effective_on)) => CaseSource::New(NewCase {
                case_number: attributes.case_number,
                effective_on,
                expires_on: attributes.expires_on,
                copay_cents: attributes.copay_cents,
                copay_frequency: attributes.copay_frequency,
            }),
            (None, None) => {
                return Err(ServiceError::Validation(
                    "Each approval needs a case_id or an effective_on date".to_string(),
                ))
            }
        };

        let rate = RateRef::from_parts(attributes.rate_type.as_deref(), attributes.rate_id.as_deref())
            .map_err(ServiceError::Validation)?;

        Ok(NewApproval {
            case,
            details: ApprovalDetails {
                rate,
                authorized_weekly_hours: attributes.authorized_weekly_hours,
                full_days: attributes.full_days,
                hours: attributes.hours,
                enrolled_in_school: attributes.enrolled_in_school,
                special_needs_rate: attributes.special_needs_rate,
                special_needs_daily_rate: attributes.special_needs_daily_rate,
                special_needs_hourly_rate: attributes.special_needs_hourly_rate,
            },
            illinois_amounts: attributes
                .illinois_approval_amounts
                .into_iter()
                .map(|a| NewIllinoisAmount {
                    month: a.month,
                    part_days_approved_per_week: a.part_days_approved_per_week,
                    full_days_approved_per_week: a.full_days_approved_per_week,
                })
                .collect(),
            nebraska_amounts: attributes
                .nebraska_approval_amounts
                .into_iter()
                .map(|a| NewNebraskaAmount {
                    effective_on: a.effective_on,
                    expires_on: a.expires_on,
                    family_fee: a.family_fee,
                    allocated_family_fee: a.allocated_family_fee,
                })
                .collect(),
        })
    }

    pub fn to_update_command(request: UpdateChildRequest) -> UpdateChildCommand {
        UpdateChildCommand {
            full_name: request.full_name,
            date_of_birth: request.date_of_birth,
            dhs_id: request.dhs_id,
            active: request.active,
            last_active_date: request.last_active_date,
            inactive_reason: request.inactive_reason,
        }
    }
}
