use crate::domain::dashboard_service::{DashboardBusiness, DashboardCase, DashboardUser};
use crate::domain::usage::{DayCount, HourCount, UsageBreakdown};
use shared::{
    CaseSummary, DashboardBusiness as SharedBusiness, DashboardUser as SharedUser, DayUsage, HourUsage,
    JurisdictionUsage,
};

pub struct DashboardMapper;

impl DashboardMapper {
    pub fn to_dto(users: Vec<DashboardUser>) -> Vec<SharedUser> {
        users.into_iter().map(Self::to_user_dto).collect()
    }

    fn to_user_dto(user: DashboardUser) -> SharedUser {
        SharedUser {
            id: user.user.id,
            greeting_name: user.user.greeting_name,
            businesses: user.businesses.into_iter().map(Self::to_business_dto).collect(),
        }
    }

    fn to_business_dto(business: DashboardBusiness) -> SharedBusiness {
        SharedBusiness {
            id: business.business.id,
            name: business.business.name,
            state: business.business.state,
            license_type: business.business.license_type,
            cases: business.cases.into_iter().map(Self::to_case_summary).collect(),
        }
    }

    fn to_case_summary(row: DashboardCase) -> CaseSummary {
        let usage = match row.usage.breakdown {
            UsageBreakdown::Illinois { part_days, full_days } => JurisdictionUsage::Illinois {
                part_days: day_usage(part_days),
                full_days: day_usage(full_days),
            },
            UsageBreakdown::Nebraska {
                full_days,
                hours,
                family_fee,
            } => JurisdictionUsage::Nebraska {
                full_days: day_usage(full_days),
                hours: hour_usage(hours),
                family_fee,
            },
        };

        CaseSummary {
            id: row.approval.approval.id,
            child_id: row.child.id,
            full_name: row.child.full_name,
            case_number: row.approval.case.case_number,
            effective_on: row.approval.case.effective_on,
            expires_on: row.approval.case.expires_on,
            attendance_risk: row.usage.attendance_risk,
            absences: row.usage.absences,
            earned_revenue: row.usage.earned_revenue,
            usage,
        }
    }
}

fn day_usage(count: DayCount) -> DayUsage {
    DayUsage {
        approved: count.approved,
        used: count.used,
        remaining: count.remaining(),
    }
}

fn hour_usage(count: HourCount) -> HourUsage {
    HourUsage {
        approved: count.approved,
        used: count.used,
        remaining: count.remaining(),
    }
}
