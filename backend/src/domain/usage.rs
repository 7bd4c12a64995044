//! Per-jurisdiction rules for turning attendances into used days and hours.
//!
//! Illinois bills by part days and full days. Nebraska bills full days plus
//! hourly care. Both compare what was used this month against what the
//! child's approval authorizes, and project whether the child will land
//! inside that authorization by the end of the month.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use shared::AttendanceRisk;

use super::date_service::{first_day_of_month, remaining_days_in_month_including_today, weeks_in_month};
use super::models::{
    ApprovalWithCase, Attendance, IllinoisApprovalAmount, IllinoisRate, NebraskaApprovalAmount,
    NebraskaRate,
};

const HOUR: i64 = 3600;

/// Below this many hours an Illinois attendance is a part day
const ILLINOIS_FULL_DAY_MIN_HOURS: i64 = 5;
/// Above this many hours an Illinois attendance is a full day plus a part day
const ILLINOIS_FULL_DAY_MAX_HOURS: i64 = 12;
/// Below this many hours a Nebraska attendance is billed hourly
const NEBRASKA_FULL_DAY_MIN_HOURS: i64 = 6;
/// Hours past this are billed hourly on top of the full day
const NEBRASKA_FULL_DAY_MAX_HOURS: i64 = 10;

/// Projected usage under this share of the authorization is at risk
const AT_RISK_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayCount {
    pub approved: i64,
    pub used: i64,
}

impl DayCount {
    pub fn remaining(&self) -> i64 {
        (self.approved - self.used).max(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HourCount {
    pub approved: f64,
    pub used: f64,
}

impl HourCount {
    pub fn remaining(&self) -> f64 {
        round_cents(self.approved - self.used).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UsageBreakdown {
    Illinois {
        part_days: DayCount,
        full_days: DayCount,
    },
    Nebraska {
        full_days: DayCount,
        hours: HourCount,
        family_fee: Option<f64>,
    },
}

/// Month-to-date usage of one child approval
#[derive(Debug, Clone, PartialEq)]
pub struct CaseUsage {
    pub breakdown: UsageBreakdown,
    pub absences: i64,
    pub attendance_risk: AttendanceRisk,
    pub earned_revenue: Option<f64>,
}

/// Split an Illinois attendance into (full days, part days)
pub fn classify_illinois(time_in_care: i64) -> (i64, i64) {
    if time_in_care < ILLINOIS_FULL_DAY_MIN_HOURS * HOUR {
        (0, 1)
    } else if time_in_care <= ILLINOIS_FULL_DAY_MAX_HOURS * HOUR {
        (1, 0)
    } else {
        (1, 1)
    }
}

/// Split a Nebraska attendance into (full days, hourly hours)
pub fn classify_nebraska(time_in_care: i64) -> (i64, f64) {
    if time_in_care < NEBRASKA_FULL_DAY_MIN_HOURS * HOUR {
        (0, time_in_care as f64 / HOUR as f64)
    } else if time_in_care <= NEBRASKA_FULL_DAY_MAX_HOURS * HOUR {
        (1, 0.0)
    } else {
        let extra = time_in_care - NEBRASKA_FULL_DAY_MAX_HOURS * HOUR;
        (1, extra as f64 / HOUR as f64)
    }
}

/// Attendances from the first of `as_of`'s month through `as_of`
pub fn month_to_date(attendances: &[Attendance], as_of: NaiveDate) -> Vec<&Attendance> {
    let start = first_day_of_month(as_of);
    attendances
        .iter()
        .filter(|a| {
            let day = a.check_in_date();
            start <= day && day <= as_of
        })
        .collect()
}

/// Project month-end usage from the weekdays the child has attended so far.
///
/// Each weekday seen this month is assumed to recur on every remaining
/// occurrence after `as_of`.
pub fn attendance_risk(
    used_days: i64,
    approved_days: i64,
    attended_weekdays: &HashSet<Weekday>,
    as_of: NaiveDate,
) -> AttendanceRisk {
    if as_of.day() <= 7 || approved_days <= 0 {
        return AttendanceRisk::NotEnoughInfo;
    }

    let today = as_of.weekday();
    let upcoming: i64 = attended_weekdays
        .iter()
        .map(|&weekday| {
            let remaining = remaining_days_in_month_including_today(as_of, weekday) as i64;
            if weekday == today {
                remaining - 1
            } else {
                remaining
            }
        })
        .sum();
    let projected = used_days + upcoming;

    if projected > approved_days {
        AttendanceRisk::ExceededLimit
    } else if (projected as f64) < approved_days as f64 * AT_RISK_RATIO {
        AttendanceRisk::AtRisk
    } else {
        AttendanceRisk::OnTrack
    }
}

pub fn illinois_usage(
    approval: &ApprovalWithCase,
    amount: Option<&IllinoisApprovalAmount>,
    rate: Option<&IllinoisRate>,
    attendances: &[Attendance],
    as_of: NaiveDate,
) -> CaseUsage {
    let weeks = weeks_in_month(as_of) as i64;
    let (part_per_week, full_per_week) = amount
        .map(|a| (a.part_days_approved_per_week, a.full_days_approved_per_week))
        .unwrap_or((0, 0));

    let mut part_days = DayCount { approved: part_per_week * weeks, used: 0 };
    let mut full_days = DayCount { approved: full_per_week * weeks, used: 0 };
    let mut absences = 0;
    let mut attended_days = 0;
    let mut weekdays = HashSet::new();

    for attendance in month_to_date(attendances, as_of) {
        if attendance.is_absence() {
            absences += 1;
            continue;
        }
        let (full, part) = classify_illinois(attendance.time_in_care);
        full_days.used += full;
        part_days.used += part;
        attended_days += 1;
        weekdays.insert(attendance.check_in.weekday());
    }

    let attendance_risk = attendance_risk(
        attended_days,
        part_days.approved + full_days.approved,
        &weekdays,
        as_of,
    );

    let earned_revenue = rate.map(|rate| {
        let full_day_rate = if approval.has_special_needs_rate() {
            approval.approval.special_needs_daily_rate.unwrap_or(rate.full_day_rate)
        } else {
            rate.full_day_rate
        };
        round_cents(full_days.used as f64 * full_day_rate + part_days.used as f64 * rate.part_day_rate)
    });

    CaseUsage {
        breakdown: UsageBreakdown::Illinois { part_days, full_days },
        absences,
        attendance_risk,
        earned_revenue,
    }
}

pub fn nebraska_usage(
    approval: &ApprovalWithCase,
    amounts: &[NebraskaApprovalAmount],
    rate: Option<&NebraskaRate>,
    attendances: &[Attendance],
    as_of: NaiveDate,
) -> CaseUsage {
    let weeks = weeks_in_month(as_of) as f64;
    let approved_hours = approval
        .approval
        .hours
        .or_else(|| approval.approval.authorized_weekly_hours.map(|h| h * weeks))
        .unwrap_or(0.0);

    let mut full_days = DayCount { approved: approval.approval.full_days.unwrap_or(0), used: 0 };
    let mut hours = HourCount { approved: approved_hours, used: 0.0 };
    let mut absences = 0;
    let mut weekdays = HashSet::new();

    for attendance in month_to_date(attendances, as_of) {
        if attendance.is_absence() {
            absences += 1;
            continue;
        }
        let (full, extra_hours) = classify_nebraska(attendance.time_in_care);
        full_days.used += full;
        hours.used += extra_hours;
        if full > 0 {
            weekdays.insert(attendance.check_in.weekday());
        }
    }
    hours.used = round_cents(hours.used);

    let family_fee = amounts.iter().find(|a| a.covers(as_of)).map(|a| a.family_fee);
    let attendance_risk = attendance_risk(full_days.used, full_days.approved, &weekdays, as_of);

    let earned_revenue = rate.map(|rate| {
        let (daily_rate, hourly_rate) = if approval.has_special_needs_rate() {
            (
                approval.approval.special_needs_daily_rate.unwrap_or(rate.daily_rate),
                approval.approval.special_needs_hourly_rate.unwrap_or(rate.hourly_rate),
            )
        } else {
            (rate.daily_rate, rate.hourly_rate)
        };
        round_cents(full_days.used as f64 * daily_rate + hours.used * hourly_rate)
    });

    CaseUsage {
        breakdown: UsageBreakdown::Nebraska { full_days, hours, family_fee },
        absences,
        attendance_risk,
        earned_revenue,
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Case, ChildApproval};
    use chrono::{TimeZone, Utc};

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn approval() -> ApprovalWithCase {
        ApprovalWithCase {
            approval: ChildApproval {
                id: "ca-1".to_string(),
                child_id: "child-1".to_string(),
                case_id: "case-1".to_string(),
                rate: None,
                authorized_weekly_hours: None,
                full_days: None,
                hours: None,
                enrolled_in_school: None,
                special_needs_rate: None,
                special_needs_daily_rate: None,
                special_needs_hourly_rate: None,
                deleted_at: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            case: Case {
                id: "case-1".to_string(),
                case_number: Some("1234".to_string()),
                copay_cents: None,
                copay_frequency: None,
                effective_on: d("2021-01-01"),
                expires_on: Some(d("2021-12-31")),
                deleted_at: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        }
    }

    fn attendance(day: &str, hours: f64) -> Attendance {
        let date = d(day);
        let check_in = Utc
            .with_ymd_and_hms(date.year(), date.month(), date.day(), 8, 0, 0)
            .unwrap();
        let check_out = check_in + chrono::Duration::seconds((hours * 3600.0) as i64);
        Attendance {
            id: format!("att-{}", day),
            child_approval_id: "ca-1".to_string(),
            check_in,
            check_out: Some(check_out),
            time_in_care: (hours * 3600.0) as i64,
            absence: None,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn absence(day: &str) -> Attendance {
        let mut a = attendance(day, 0.0);
        a.check_out = None;
        a.absence = Some(shared::AbsenceType::Absence);
        a
    }

    #[test]
    fn test_classify_illinois_boundaries() {
        assert_eq!(classify_illinois(4 * HOUR + 59 * 60), (0, 1));
        assert_eq!(classify_illinois(5 * HOUR), (1, 0));
        assert_eq!(classify_illinois(12 * HOUR), (1, 0));
        assert_eq!(classify_illinois(12 * HOUR + 1), (1, 1));
    }

    #[test]
    fn test_classify_nebraska_boundaries() {
        assert_eq!(classify_nebraska(3 * HOUR), (0, 3.0));
        assert_eq!(classify_nebraska(6 * HOUR), (1, 0.0));
        assert_eq!(classify_nebraska(10 * HOUR), (1, 0.0));
        assert_eq!(classify_nebraska(11 * HOUR + 1800), (1, 1.5));
    }

    #[test]
    fn test_illinois_usage_counts_month_to_date_only() {
        let amount = IllinoisApprovalAmount {
            id: "amt-1".to_string(),
            child_approval_id: "ca-1".to_string(),
            month: d("2021-03-01"),
            part_days_approved_per_week: 2,
            full_days_approved_per_week: 3,
        };
        let attendances = vec![
            attendance("2021-02-26", 8.0), // previous month
            attendance("2021-03-01", 8.0),
            attendance("2021-03-02", 3.0),
            attendance("2021-03-03", 13.0),
            absence("2021-03-04"),
            attendance("2021-03-20", 8.0), // after as_of
        ];

        let usage = illinois_usage(&approval(), Some(&amount), None, &attendances, d("2021-03-10"));

        // March 2021 has 31 days -> 5 weeks
        assert_eq!(
            usage.breakdown,
            UsageBreakdown::Illinois {
                part_days: DayCount { approved: 10, used: 2 },
                full_days: DayCount { approved: 15, used: 2 },
            }
        );
        assert_eq!(usage.absences, 1);
        assert_eq!(usage.earned_revenue, None);
    }

    #[test]
    fn test_illinois_revenue_prefers_special_needs_daily_rate() {
        let mut approval = approval();
        approval.approval.special_needs_rate = Some(true);
        approval.approval.special_needs_daily_rate = Some(50.0);
        let rate = IllinoisRate {
            id: "rate-1".to_string(),
            name: "Cook county center".to_string(),
            county: Some("Cook".to_string()),
            license_type: shared::LicenseType::LicensedCenter,
            full_day_rate: 40.0,
            part_day_rate: 20.0,
            effective_on: d("2020-01-01"),
            expires_on: None,
        };
        let attendances = vec![attendance("2021-03-01", 8.0), attendance("2021-03-02", 2.0)];

        let usage = illinois_usage(&approval, None, Some(&rate), &attendances, d("2021-03-10"));
        assert_eq!(usage.earned_revenue, Some(70.0));
    }

    #[test]
    fn test_nebraska_usage_derives_hours_from_weekly_authorization() {
        let mut approval = approval();
        approval.approval.full_days = Some(20);
        approval.approval.authorized_weekly_hours = Some(10.0);
        let amounts = vec![NebraskaApprovalAmount {
            id: "amt-1".to_string(),
            child_approval_id: "ca-1".to_string(),
            effective_on: d("2021-01-01"),
            expires_on: d("2021-06-30"),
            family_fee: 80.0,
            allocated_family_fee: None,
        }];
        let rate = NebraskaRate {
            id: "rate-1".to_string(),
            name: "Lancaster family home".to_string(),
            region: Some("Lancaster".to_string()),
            license_type: shared::LicenseType::FamilyChildCareHomeI,
            daily_rate: 30.0,
            hourly_rate: 5.0,
            accredited_rate: false,
            effective_on: d("2020-01-01"),
            expires_on: None,
        };
        let attendances = vec![
            attendance("2021-02-01", 8.0),
            attendance("2021-02-02", 2.5),
            attendance("2021-02-03", 11.0),
        ];

        let usage = nebraska_usage(&approval, &amounts, Some(&rate), &attendances, d("2021-02-05"));

        match usage.breakdown {
            UsageBreakdown::Nebraska { full_days, hours, family_fee } => {
                assert_eq!(full_days, DayCount { approved: 20, used: 2 });
                // February 2021 has 28 days -> 4 weeks
                assert_eq!(hours.approved, 40.0);
                assert_eq!(hours.used, 3.5);
                assert_eq!(hours.remaining(), 36.5);
                assert_eq!(family_fee, Some(80.0));
            }
            other => panic!("expected Nebraska usage, got {:?}", other),
        }
        assert_eq!(usage.earned_revenue, Some(77.5));
        assert_eq!(usage.attendance_risk, AttendanceRisk::NotEnoughInfo);
    }

    #[test]
    fn test_attendance_risk_first_week_is_not_enough_info() {
        let weekdays = HashSet::from([Weekday::Mon]);
        assert_eq!(attendance_risk(1, 10, &weekdays, d("2021-03-07")), AttendanceRisk::NotEnoughInfo);
        assert_eq!(attendance_risk(5, 0, &weekdays, d("2021-03-20")), AttendanceRisk::NotEnoughInfo);
    }

    #[test]
    fn test_attendance_risk_projects_remaining_weekdays() {
        // 2021-03-15 is a Monday. Mondays left after today: 22, 29.
        let mondays = HashSet::from([Weekday::Mon]);
        // 3 used + 2 projected = 5
        assert_eq!(attendance_risk(3, 5, &mondays, d("2021-03-15")), AttendanceRisk::OnTrack);
        assert_eq!(attendance_risk(3, 4, &mondays, d("2021-03-15")), AttendanceRisk::ExceededLimit);
        assert_eq!(attendance_risk(3, 10, &mondays, d("2021-03-15")), AttendanceRisk::AtRisk);

        // Mondays and Wednesdays: Wed 17, 24, 31 plus Mon 22, 29
        let mon_wed = HashSet::from([Weekday::Mon, Weekday::Wed]);
        assert_eq!(attendance_risk(5, 10, &mon_wed, d("2021-03-15")), AttendanceRisk::OnTrack);
    }

    #[test]
    fn test_day_count_remaining_never_negative() {
        let count = DayCount { approved: 3, used: 5 };
        assert_eq!(count.remaining(), 0);
        let hours = HourCount { approved: 2.0, used: 2.5 };
        assert_eq!(hours.remaining(), 0.0);
    }
}
