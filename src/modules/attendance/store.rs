// The attendance document store.
//
// Purpose
// - Own the one in-memory document and expose the typed read and write operations over it.
//
// Responsibilities
// - Load and migrate the stored document on open; start from the default document if none.
// - Apply every mutation to a copy, persist the copy, then swap it in. A failed write leaves
//   the live document equal to the last durable state and surfaces the storage error.
// - Skip the write when an operation changes nothing.
// - Derive monthly statistics.
//
// Boundaries
// - One instance per document key. Consumers receive it explicitly; there is no global.

use crate::modules::attendance::core::{
    attendance::{AttendanceCell, AttendanceMap, Toggled, set_exclusive_status, toggle_status},
    calendar::{CalendarError, MonthKey, validate_date_key},
    cylinder::{Cylinder, NewCylinder},
    document::Document,
    employee::Employee,
    rule::{Rule, RuleImage},
    stats::{CollectiveStats, collective_stats, month_status_counts},
    status_type::{StatusType, is_protected_status_type},
};
use crate::shared::core::primitives::{new_record_id, now_millis};
use crate::shared::infrastructure::document_storage::{DocumentStorage, StorageError};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;

pub const DOCUMENT_KEY: &str = "attendance_tracker_v1";

static NO_ATTENDANCE: AttendanceMap = AttendanceMap::new();

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("stored document is unreadable: {0}")]
    CorruptDocument(#[source] serde_json::Error),

    #[error("document could not be serialized: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("unknown employee: {0}")]
    UnknownEmployee(String),

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error("status type label must not be blank")]
    BlankLabel,

    #[error("cylinder {0} must be a finite number")]
    NonFiniteMeasurement(&'static str),
}

pub fn backup_file_name(date: NaiveDate) -> String {
    format!("attendance-backup-{}.json", date.format("%Y-%m-%d"))
}

pub struct DataStore<TStorage>
where
    TStorage: DocumentStorage,
{
    storage: TStorage,
    key: String,
    document: Document,
}

impl<TStorage> DataStore<TStorage>
where
    TStorage: DocumentStorage,
{
    pub fn open(storage: TStorage) -> Result<Self, StoreError> {
        Self::open_with_key(storage, DOCUMENT_KEY)
    }

    pub fn open_with_key(storage: TStorage, key: impl Into<String>) -> Result<Self, StoreError> {
        let key = key.into();
        let document = match storage.read(&key)? {
            Some(json) => Document::from_json(&json).map_err(StoreError::CorruptDocument)?,
            None => {
                tracing::info!(key = %key, "no stored document, starting from the default");
                Document::default()
            }
        };
        Ok(Self {
            storage,
            key,
            document,
        })
    }

    fn commit(&mut self, operation: &'static str, next: Document) -> Result<(), StoreError> {
        let json = next.to_json().map_err(StoreError::Serialize)?;
        if let Err(e) = self.storage.write(&self.key, &json) {
            tracing::error!(operation, error = %e, "document write failed");
            return Err(e.into());
        }
        tracing::debug!(operation, bytes = json.len(), "document persisted");
        self.document = next;
        Ok(())
    }

    fn apply(
        &mut self,
        operation: &'static str,
        change: impl FnOnce(&mut Document),
    ) -> Result<(), StoreError> {
        let mut next = self.document.clone();
        change(&mut next);
        self.commit(operation, next)
    }

    fn ensure_employee(&self, employee_id: &str) -> Result<(), StoreError> {
        if self.document.has_employee(employee_id) {
            Ok(())
        } else {
            tracing::warn!(employee_id, "attendance write for unknown employee");
            Err(StoreError::UnknownEmployee(employee_id.to_string()))
        }
    }

    // --- Employees ---

    pub fn employees(&self) -> &[Employee] {
        &self.document.employees
    }

    pub fn add_employee(&mut self, name: &str, role: &str) -> Result<String, StoreError> {
        let employee = Employee::new(new_record_id(), name, role);
        let employee_id = employee.id.clone();
        self.apply("add_employee", |doc| doc.employees.push(employee))?;
        tracing::info!(employee_id = %employee_id, "employee added");
        Ok(employee_id)
    }

    /// Removes the employee and every attendance cell recorded for them.
    pub fn remove_employee(&mut self, employee_id: &str) -> Result<bool, StoreError> {
        let known = self.document.has_employee(employee_id);
        if !known && !self.document.attendance.contains_key(employee_id) {
            return Ok(false);
        }
        self.apply("remove_employee", |doc| {
            doc.employees.retain(|e| e.id != employee_id);
            doc.attendance.remove(employee_id);
        })?;
        tracing::info!(employee_id, "employee removed with attendance");
        Ok(true)
    }

    // --- Attendance ---

    pub fn attendance(&self, employee_id: &str) -> &AttendanceMap {
        self.document
            .attendance_of(employee_id)
            .unwrap_or(&NO_ATTENDANCE)
    }

    pub fn cell(&self, employee_id: &str, date: &str) -> Option<&AttendanceCell> {
        self.attendance(employee_id).get(date)
    }

    pub fn toggle_attendance_status(
        &mut self,
        employee_id: &str,
        date: &str,
        status_id: &str,
    ) -> Result<Toggled, StoreError> {
        validate_date_key(date)?;
        self.ensure_employee(employee_id)?;
        let mut toggled = Toggled::Added;
        self.apply("toggle_attendance_status", |doc| {
            let attendance = doc.attendance.entry(employee_id.to_string()).or_default();
            toggled = toggle_status(attendance, date, status_id);
            if attendance.is_empty() {
                doc.attendance.remove(employee_id);
            }
        })?;
        Ok(toggled)
    }

    /// Deletes the cell. Returns `false` without writing when there was nothing to delete.
    pub fn clear_attendance(&mut self, employee_id: &str, date: &str) -> Result<bool, StoreError> {
        if self.cell(employee_id, date).is_none() {
            return Ok(false);
        }
        self.apply("clear_attendance", |doc| {
            if let Some(attendance) = doc.attendance.get_mut(employee_id) {
                attendance.remove(date);
                if attendance.is_empty() {
                    doc.attendance.remove(employee_id);
                }
            }
        })?;
        Ok(true)
    }

    /// Sets the cell to exactly `status_id`, or clears it when `None` or empty.
    pub fn mark_attendance(
        &mut self,
        employee_id: &str,
        date: &str,
        status_id: Option<&str>,
    ) -> Result<(), StoreError> {
        let Some(status_id) = status_id.filter(|id| !id.is_empty()) else {
            self.clear_attendance(employee_id, date)?;
            return Ok(());
        };
        validate_date_key(date)?;
        self.ensure_employee(employee_id)?;
        self.apply("mark_attendance", |doc| {
            let attendance = doc.attendance.entry(employee_id.to_string()).or_default();
            set_exclusive_status(attendance, date, status_id);
        })
    }

    // --- Status types ---

    pub fn status_types(&self) -> &[StatusType] {
        &self.document.status_types
    }

    /// Catalog lookup. Orphaned ids still referenced by attendance cells resolve to `None`.
    pub fn status_type(&self, status_id: &str) -> Option<&StatusType> {
        self.document.status_types.iter().find(|s| s.id == status_id)
    }

    pub fn add_status_type(&mut self, label: &str, color: &str) -> Result<bool, StoreError> {
        if label.trim().is_empty() {
            return Err(StoreError::BlankLabel);
        }
        let status_type = StatusType::new(label, color);
        if self.status_type(&status_type.id).is_some() {
            tracing::debug!(id = %status_type.id, "status type already exists");
            return Ok(false);
        }
        let id = status_type.id.clone();
        self.apply("add_status_type", |doc| doc.status_types.push(status_type))?;
        tracing::info!(id = %id, "status type added");
        Ok(true)
    }

    pub fn delete_status_type(&mut self, status_id: &str) -> Result<bool, StoreError> {
        if is_protected_status_type(status_id) {
            tracing::debug!(id = status_id, "ignoring delete of a protected status type");
            return Ok(false);
        }
        if self.status_type(status_id).is_none() {
            return Ok(false);
        }
        self.apply("delete_status_type", |doc| {
            doc.status_types.retain(|s| s.id != status_id)
        })?;
        tracing::info!(id = status_id, "status type deleted");
        Ok(true)
    }

    // --- Cylinders ---

    pub fn cylinders(&self) -> &[Cylinder] {
        self.document.cylinders.as_deref().unwrap_or(&[])
    }

    /// Cylinders of one brand ordered by the numeric part of their T-number.
    pub fn cylinders_by_brand(&self, brand: &str) -> Vec<&Cylinder> {
        let mut cylinders: Vec<&Cylinder> =
            self.cylinders().iter().filter(|c| c.brand == brand).collect();
        cylinders.sort_by_key(|c| c.t_number());
        cylinders
    }

    pub fn add_cylinder(&mut self, cylinder: NewCylinder) -> Result<(), StoreError> {
        if let Some(field) = cylinder.non_finite_field() {
            return Err(StoreError::NonFiniteMeasurement(field));
        }
        let cylinder = Cylinder::from_new(new_record_id(), cylinder);
        self.apply("add_cylinder", |doc| {
            doc.cylinders.get_or_insert_with(Vec::new).push(cylinder)
        })
    }

    pub fn remove_cylinder(&mut self, cylinder_id: &str) -> Result<bool, StoreError> {
        if !self.cylinders().iter().any(|c| c.id == cylinder_id) {
            return Ok(false);
        }
        self.apply("remove_cylinder", |doc| {
            if let Some(cylinders) = doc.cylinders.as_mut() {
                cylinders.retain(|c| c.id != cylinder_id);
            }
        })?;
        Ok(true)
    }

    // --- Rules ---

    pub fn rules(&self) -> &[Rule] {
        self.document.rules.as_deref().unwrap_or(&[])
    }

    pub fn rule(&self, rule_id: &str) -> Option<&Rule> {
        self.rules().iter().find(|r| r.id == rule_id)
    }

    pub fn add_rule(
        &mut self,
        title: &str,
        description: &str,
        image: Option<RuleImage>,
    ) -> Result<(), StoreError> {
        let rule = Rule {
            id: new_record_id(),
            title: title.to_string(),
            description: description.to_string(),
            image,
            created_at: now_millis(),
        };
        self.apply("add_rule", |doc| {
            doc.rules.get_or_insert_with(Vec::new).push(rule)
        })
    }

    pub fn remove_rule(&mut self, rule_id: &str) -> Result<bool, StoreError> {
        if self.rule(rule_id).is_none() {
            return Ok(false);
        }
        self.apply("remove_rule", |doc| {
            if let Some(rules) = doc.rules.as_mut() {
                rules.retain(|r| r.id != rule_id);
            }
        })?;
        Ok(true)
    }

    // --- Statistics ---

    pub fn employee_month_stats(
        &self,
        employee_id: &str,
        month: &MonthKey,
    ) -> BTreeMap<String, u32> {
        month_status_counts(self.attendance(employee_id), month)
    }

    pub fn collective_month_stats(&self, month: &MonthKey) -> CollectiveStats {
        let attendances = self
            .document
            .employees
            .iter()
            .filter_map(|e| self.document.attendance_of(&e.id));
        collective_stats(attendances, month)
    }

    // --- Backup and restore ---

    pub fn export_data(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(&self.document).map_err(StoreError::Serialize)
    }

    /// Replaces the whole document with `json`.
    ///
    /// Returns `Ok(false)` and leaves the document untouched when `json` is not a readable
    /// document. The replacement goes through the same migration as a load.
    pub fn import_data(&mut self, json: &str) -> Result<bool, StoreError> {
        let document = match Document::from_json(json) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(error = %e, "rejected restore input");
                return Ok(false);
            }
        };
        self.commit("import_data", document)?;
        tracing::info!(
            employees = self.document.employees.len(),
            "document restored from backup"
        );
        Ok(true)
    }
}
