//! Time-off request models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Approval state of a time-off request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PtoStatus {
    /// Approved by a manager.
    Approved,
    /// Awaiting a decision.
    Pending,
    /// Denied.
    Denied,
    /// Withdrawn by the employee.
    Cancelled,
}

/// A time-off request covering an inclusive date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PtoRequest {
    /// Request identifier.
    #[serde(default)]
    pub id: String,
    /// Employee name as it appears on schedule assignments.
    #[serde(alias = "employeeId")]
    pub employee: String,
    /// First day off.
    pub start_date: NaiveDate,
    /// Last day off.
    pub end_date: NaiveDate,
    /// Location code, or `BOTH` for every location.
    #[serde(default, alias = "locationCode")]
    pub location: String,
    /// Approval state.
    pub status: PtoStatus,
}

/// Time-off picture for one schedule day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PtoSummary {
    /// Requests overlapping the day in scope.
    pub total: usize,
    /// Approved requests.
    pub approved_count: usize,
    /// Pending requests.
    pub pending_count: usize,
    /// Approved requests whose employee is assigned that day.
    pub conflicts: Vec<PtoRequest>,
    /// Pending requests whose employee is assigned that day.
    pub pending_conflicts: Vec<PtoRequest>,
}
