// Attendance cells: the status set recorded for one (employee, date) pair.
//
// Purpose
// - Hold the canonical cell shape `{statuses: [...]}` used by every piece of logic.
// - Accept the deprecated `{status: "..."}` shape at the parse boundary only.
//
// Invariants
// - A cell never holds the same status id twice. Order is insertion order.
// - An empty cell is never stored: callers prune it (see `toggle_status`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-employee attendance: date key -> cell.
pub type AttendanceMap = BTreeMap<String, AttendanceCell>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredCell")]
pub struct AttendanceCell {
    statuses: Vec<String>,
}

/// Cell as found on disk: either shape, or neither.
#[derive(Deserialize)]
struct StoredCell {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    statuses: Option<Vec<String>>,
}

impl From<StoredCell> for AttendanceCell {
    fn from(stored: StoredCell) -> Self {
        match stored.status {
            Some(status) if !status.is_empty() => Self::single(status),
            _ => Self::from_statuses(stored.statuses.unwrap_or_default()),
        }
    }
}

/// Outcome of a toggle on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

impl AttendanceCell {
    pub fn single(status_id: impl Into<String>) -> Self {
        Self {
            statuses: vec![status_id.into()],
        }
    }

    /// Builds a cell from any sequence, dropping repeated ids (first occurrence wins).
    pub fn from_statuses<I, S>(statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cell = Self::default();
        for status in statuses {
            let status = status.into();
            if !cell.contains(&status) {
                cell.statuses.push(status);
            }
        }
        cell
    }

    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    pub fn contains(&self, status_id: &str) -> bool {
        self.statuses.iter().any(|s| s == status_id)
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn toggle(&mut self, status_id: &str) -> Toggled {
        if self.contains(status_id) {
            self.statuses.retain(|s| s != status_id);
            Toggled::Removed
        } else {
            self.statuses.push(status_id.to_string());
            Toggled::Added
        }
    }
}

/// Toggles `status_id` in the cell at `date`, creating the cell on demand and pruning it
/// when the toggle leaves it empty.
pub fn toggle_status(attendance: &mut AttendanceMap, date: &str, status_id: &str) -> Toggled {
    let cell = attendance.entry(date.to_string()).or_default();
    let toggled = cell.toggle(status_id);
    if cell.is_empty() {
        attendance.remove(date);
    }
    toggled
}

/// Replaces the whole cell at `date` with exactly one status.
pub fn set_exclusive_status(attendance: &mut AttendanceMap, date: &str, status_id: &str) {
    attendance.insert(date.to_string(), AttendanceCell::single(status_id));
}

/// Removes empty cells. Returns how many were dropped.
pub fn prune_empty_cells(attendance: &mut AttendanceMap) -> usize {
    let before = attendance.len();
    attendance.retain(|_, cell| !cell.is_empty());
    before - attendance.len()
}
