//! Normalized shapes exchanged with POS and delivery adapters.
//!
//! Adapters translate vendor payloads into these records before the platform
//! stores them, and receive [`ScheduleForPublish`] when a schedule is pushed
//! back to a POS. Money is carried as exact decimals here; the engine converts
//! to `f64` only when it enters the calculation functions.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::financial::ActualDayRow;
use super::schedule::ScheduleWeek;
use super::time::ClockTime;

/// Daily sales aggregate from a POS system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDailySales {
    /// Business date.
    pub date: NaiveDate,
    /// Tenant-local location code.
    pub location_code: String,
    /// Transaction count.
    pub transactions: u32,
    /// Gross revenue.
    pub revenue: Decimal,
    /// Labor cost.
    pub store_labor_cost: Decimal,
}

impl NormalizedDailySales {
    /// Converts the aggregate into the actuals row the engine consumes.
    pub fn to_actual_day(&self) -> ActualDayRow {
        ActualDayRow {
            date: self.date,
            revenue: self.revenue.to_f64().unwrap_or_default(),
            store_labor: self.store_labor_cost.to_f64().unwrap_or_default(),
            location: Some(self.location_code.clone()),
        }
    }
}

/// Whether an employee is still on staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    /// Currently employed.
    Active,
    /// No longer scheduled.
    Inactive,
}

/// Employee record from a POS system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEmployee {
    /// POS-specific employee ID.
    pub external_id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email, if known.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone, if known.
    #[serde(default)]
    pub phone: Option<String>,
    /// POS job titles.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Hourly rate, if the POS exposes it.
    #[serde(default)]
    pub pay_rate: Option<Decimal>,
    /// Locations the employee works at.
    #[serde(default)]
    pub location_codes: Vec<String>,
    /// Employment status.
    pub status: EmployeeStatus,
}

impl NormalizedEmployee {
    /// Name as it appears in schedule assignments.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Daily aggregate from a delivery marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDeliveryDay {
    /// Business date.
    pub date: NaiveDate,
    /// Tenant-local location code.
    pub location_code: String,
    /// Adapter name, e.g. "doordash".
    pub source: String,
    /// Order count.
    pub order_count: u32,
    /// Revenue before commission and fees.
    pub gross_revenue: Decimal,
    /// Marketplace commission.
    pub commission: Decimal,
    /// Other marketplace fees.
    pub fees: Decimal,
    /// Revenue after commission and fees.
    pub net_revenue: Decimal,
}

impl NormalizedDeliveryDay {
    /// Gross revenue less commission and fees.
    pub fn computed_net_revenue(&self) -> Decimal {
        self.gross_revenue - self.commission - self.fees
    }

    /// Whether the reported net matches the computed net.
    pub fn is_consistent(&self) -> bool {
        self.computed_net_revenue() == self.net_revenue
    }
}

/// A single shift to publish to a POS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftForPublish {
    /// Shift date.
    pub date: NaiveDate,
    /// Start time.
    pub start_time: ClockTime,
    /// End time.
    pub end_time: ClockTime,
    /// Position name.
    pub role: String,
    /// Assigned employee name, for fuzzy matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    /// POS employee ID, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_external_id: Option<String>,
}

/// A week of shifts to publish for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleForPublish {
    /// Tenant-local location code.
    pub location_code: String,
    /// POS location ID.
    pub location_external_id: String,
    /// First day of the week.
    pub week_start: NaiveDate,
    /// Shifts, one per position.
    pub shifts: Vec<ShiftForPublish>,
}

impl ScheduleForPublish {
    /// Flattens a planned week into one shift per position.
    ///
    /// Open positions are published without an employee so the POS can show
    /// them as unfilled.
    pub fn from_week(
        week: &ScheduleWeek,
        location_code: impl Into<String>,
        location_external_id: impl Into<String>,
    ) -> Self {
        let shifts = week
            .days
            .iter()
            .flat_map(|day| {
                day.slots.iter().flat_map(move |slot| {
                    (0..slot.effective_headcount() as usize).map(move |idx| {
                        let employee_name = slot
                            .assignments
                            .get(idx)
                            .map(|name| name.trim())
                            .filter(|name| !name.is_empty())
                            .map(str::to_string);
                        ShiftForPublish {
                            date: day.date,
                            start_time: slot.start,
                            end_time: slot.end,
                            role: slot.role.clone(),
                            employee_name,
                            employee_external_id: None,
                        }
                    })
                })
            })
            .collect();

        Self {
            location_code: location_code.into(),
            location_external_id: location_external_id.into(),
            week_start: week.week_start,
            shifts,
        }
    }
}

/// Outcome of publishing one shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishShiftResult {
    /// The shift.
    pub shift: ShiftForPublish,
    /// Whether the POS accepted it.
    pub success: bool,
    /// POS-assigned shift ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_shift_id: Option<String>,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate outcome of publishing a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResult {
    /// Location code.
    pub location_code: String,
    /// Shifts attempted plus skipped.
    pub total_shifts: usize,
    /// Shifts accepted.
    pub published: usize,
    /// Shifts rejected.
    pub failed: usize,
    /// Shifts skipped, e.g. duplicates.
    pub skipped: usize,
    /// Per-shift outcomes.
    pub results: Vec<PublishShiftResult>,
}

impl PublishResult {
    /// Tallies per-shift outcomes.
    pub fn from_results(
        location_code: impl Into<String>,
        results: Vec<PublishShiftResult>,
        skipped: usize,
    ) -> Self {
        let published = results.iter().filter(|r| r.success).count();
        Self {
            location_code: location_code.into(),
            total_shifts: results.len() + skipped,
            published,
            failed: results.len() - published,
            skipped,
            results,
        }
    }
}

/// Connection settings for a POS adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosConnectionConfig {
    /// Adapter name, e.g. "square".
    pub adapter: String,
    /// POS location ID.
    pub location_external_id: String,
    /// Adapter-specific credentials.
    #[serde(default)]
    pub credentials: BTreeMap<String, String>,
}

/// Connection settings for a delivery adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryConnectionConfig {
    /// Adapter name, e.g. "doordash".
    pub adapter: String,
    /// Tenant-local location code.
    pub location_code: String,
    /// Adapter-specific credentials.
    #[serde(default)]
    pub credentials: BTreeMap<String, String>,
}

/// Final state of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// Finished.
    Completed,
    /// Aborted.
    Failed,
}

/// Audit record of a sync run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    /// Adapter name.
    pub adapter: String,
    /// Location code.
    pub location_code: String,
    /// First day synced.
    pub period_start: NaiveDate,
    /// Last day synced.
    pub period_end: NaiveDate,
    /// Records written.
    pub records_synced: u32,
    /// Records skipped.
    pub records_skipped: u32,
    /// Final state.
    pub status: SyncStatus,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScheduleDay, ScheduleSlot};
    use serde_json::json;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_daily_sales_converts_to_actual_row() {
        let sales: NormalizedDailySales = serde_json::from_value(json!({
            "date": "2025-06-14",
            "locationCode": "EP",
            "transactions": 412,
            "revenue": "4210.55",
            "storeLaborCost": "812.40"
        }))
        .unwrap();
        let row = sales.to_actual_day();
        assert_eq!(row.revenue, 4210.55);
        assert_eq!(row.store_labor, 812.40);
        assert_eq!(row.location.as_deref(), Some("EP"));
    }

    #[test]
    fn test_delivery_net_revenue_consistency() {
        let day = NormalizedDeliveryDay {
            date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
            location_code: "NL".to_string(),
            source: "doordash".to_string(),
            order_count: 31,
            gross_revenue: dec("620.00"),
            commission: dec("124.00"),
            fees: dec("18.60"),
            net_revenue: dec("477.40"),
        };
        assert_eq!(day.computed_net_revenue(), dec("477.40"));
        assert!(day.is_consistent());
    }

    #[test]
    fn test_schedule_for_publish_emits_one_shift_per_position() {
        let mut slot = ScheduleSlot::new(
            "slot_sat_0",
            "15:00".parse().unwrap(),
            "23:00".parse().unwrap(),
            "Closer Scooper",
            2,
        )
        .unwrap();
        slot.assignments[0] = " Maya ".to_string();
        let date = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        let week = ScheduleWeek {
            week_start: NaiveDate::from_ymd_opt(2025, 6, 9).unwrap(),
            days: vec![ScheduleDay::new(date, vec![slot])],
        };

        let payload = ScheduleForPublish::from_week(&week, "EP", "sq_loc_1");
        assert_eq!(payload.shifts.len(), 2);
        assert_eq!(payload.shifts[0].employee_name.as_deref(), Some("Maya"));
        assert_eq!(payload.shifts[1].employee_name, None);
        assert_eq!(payload.shifts[0].start_time.to_string(), "15:00");
    }

    #[test]
    fn test_publish_result_tallies_outcomes() {
        let shift = ShiftForPublish {
            date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
            start_time: "12:00".parse().unwrap(),
            end_time: "18:00".parse().unwrap(),
            role: "Support".to_string(),
            employee_name: None,
            employee_external_id: None,
        };
        let results = vec![
            PublishShiftResult {
                shift: shift.clone(),
                success: true,
                external_shift_id: Some("ext_1".to_string()),
                error: None,
            },
            PublishShiftResult {
                shift,
                success: false,
                external_shift_id: None,
                error: Some("team member not found".to_string()),
            },
        ];
        let summary = PublishResult::from_results("EP", results, 1);
        assert_eq!(summary.total_shifts, 3);
        assert_eq!(summary.published, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_sync_result_wire_shape() {
        let result: SyncResult = serde_json::from_value(json!({
            "adapter": "square",
            "locationCode": "EP",
            "periodStart": "2025-06-01",
            "periodEnd": "2025-06-07",
            "recordsSynced": 7,
            "recordsSkipped": 0,
            "status": "completed"
        }))
        .unwrap();
        assert_eq!(result.status, SyncStatus::Completed);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_employee_display_name() {
        let employee: NormalizedEmployee = serde_json::from_value(json!({
            "externalId": "tm_9",
            "firstName": "Ana ",
            "lastName": "Ruiz",
            "roles": ["Key Lead"],
            "payRate": "17.00",
            "locationCodes": ["EP"],
            "status": "active"
        }))
        .unwrap();
        assert_eq!(employee.display_name(), "Ana Ruiz");
        assert_eq!(employee.pay_rate, Some(dec("17.00")));
    }
}
