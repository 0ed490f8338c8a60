// The single persisted document and its structural migration.
//
// Purpose
// - Own every record family: employees, attendance, status types, cylinders, rules.
// - Bring any readable document, old or new, into the canonical in-memory shape.
//
// Migration (runs on every deserialization, load and restore alike)
// - Seed the status catalog when the field is missing.
// - Re-insert any missing protected default and drop repeated catalog ids (first wins).
// - Upgrade legacy cells (done by `AttendanceCell`) and prune cells left empty.
// - Leave `cylinders` and `rules` absent when the document predates them.
// - Keep unknown top-level fields as they are.

use crate::modules::attendance::core::{
    attendance::{AttendanceMap, prune_empty_cells},
    cylinder::Cylinder,
    employee::Employee,
    rule::Rule,
    status_type::{StatusType, default_status_types},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredDocument")]
pub struct Document {
    pub employees: Vec<Employee>,
    pub attendance: BTreeMap<String, AttendanceMap>,
    pub status_types: Vec<StatusType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cylinders: Option<Vec<Cylinder>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<Rule>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDocument {
    #[serde(default)]
    employees: Vec<Employee>,
    #[serde(default)]
    attendance: BTreeMap<String, AttendanceMap>,
    #[serde(default)]
    status_types: Option<Vec<StatusType>>,
    #[serde(default)]
    cylinders: Option<Vec<Cylinder>>,
    #[serde(default)]
    rules: Option<Vec<Rule>>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            employees: Vec::new(),
            attendance: BTreeMap::new(),
            status_types: default_status_types(),
            cylinders: None,
            rules: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl From<StoredDocument> for Document {
    fn from(stored: StoredDocument) -> Self {
        let status_types = match stored.status_types {
            Some(status_types) => repair_catalog(status_types),
            None => {
                tracing::info!("status type catalog missing, seeding defaults");
                default_status_types()
            }
        };

        let mut attendance = stored.attendance;
        let mut pruned = 0;
        for cells in attendance.values_mut() {
            pruned += prune_empty_cells(cells);
        }
        attendance.retain(|_, cells| !cells.is_empty());
        if pruned > 0 {
            tracing::info!(pruned, "dropped empty attendance cells");
        }

        Self {
            employees: stored.employees,
            attendance,
            status_types,
            cylinders: stored.cylinders,
            rules: stored.rules,
            extra: stored.extra,
        }
    }
}

fn repair_catalog(status_types: Vec<StatusType>) -> Vec<StatusType> {
    let mut seen = HashSet::new();
    let mut catalog: Vec<StatusType> = status_types
        .into_iter()
        .filter(|s| seen.insert(s.id.clone()))
        .collect();
    for (position, default) in default_status_types().into_iter().enumerate() {
        if !seen.contains(&default.id) {
            tracing::info!(id = %default.id, "restoring protected status type");
            catalog.insert(position.min(catalog.len()), default);
        }
    }
    catalog
}

impl Document {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn has_employee(&self, employee_id: &str) -> bool {
        self.employees.iter().any(|e| e.id == employee_id)
    }

    pub fn attendance_of(&self, employee_id: &str) -> Option<&AttendanceMap> {
        self.attendance.get(employee_id)
    }
}
