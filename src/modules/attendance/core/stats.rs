// Monthly statistics derived from attendance cells.
//
// Purpose
// - Per employee: count every status occurrence in the month. A date with two statuses
//   counts once for each of them.
// - Collective: total `late` and `absent` occurrences across employees. Custom status types
//   only show up in the per-employee breakdown.
//
// Boundaries
// - Pure functions over borrowed data. No input or output.

use crate::modules::attendance::core::{
    attendance::AttendanceMap,
    calendar::MonthKey,
    status_type::{ABSENT, LATE},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectiveStats {
    pub late: u32,
    pub absent: u32,
}

pub fn month_status_counts(attendance: &AttendanceMap, month: &MonthKey) -> BTreeMap<String, u32> {
    let prefix = month.prefix();
    let mut counts = BTreeMap::new();
    for (_, cell) in attendance.iter().filter(|(date, _)| date.starts_with(&prefix)) {
        for status_id in cell.statuses() {
            *counts.entry(status_id.clone()).or_insert(0) += 1;
        }
    }
    counts
}

pub fn collective_stats<'a>(
    attendances: impl IntoIterator<Item = &'a AttendanceMap>,
    month: &MonthKey,
) -> CollectiveStats {
    let prefix = month.prefix();
    let mut stats = CollectiveStats::default();
    for attendance in attendances {
        for (_, cell) in attendance.iter().filter(|(date, _)| date.starts_with(&prefix)) {
            if cell.contains(LATE) {
                stats.late += 1;
            }
            if cell.contains(ABSENT) {
                stats.absent += 1;
            }
        }
    }
    stats
}
