// Status type catalog entries and the label -> id normalization.
//
// Purpose
// - A status type is a named, colored category that can be attached to an attendance cell.
//
// Responsibilities
// - Derive ids deterministically from labels so two labels that normalize alike collide.
// - Provide the four built-in types and the set of ids that can never be deleted.

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatusType {
    pub id: String,
    pub label: String,
    pub color: String,
}

pub const LATE: &str = "late";
pub const ABSENT: &str = "absent";
pub const SHORT_LEAVE: &str = "short_leave";
pub const NIGHT_SHIFT: &str = "night_shift";

pub const PROTECTED_STATUS_TYPE_IDS: [&str; 4] = [LATE, ABSENT, SHORT_LEAVE, NIGHT_SHIFT];

impl StatusType {
    pub fn new(label: impl Into<String>, color: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id: status_type_id(&label),
            label,
            color: color.into(),
        }
    }

    pub fn is_protected(&self) -> bool {
        is_protected_status_type(&self.id)
    }
}

pub fn is_protected_status_type(id: &str) -> bool {
    PROTECTED_STATUS_TYPE_IDS.contains(&id)
}

/// Lower-cases the label and folds every run of whitespace into a single `_`.
///
/// Leading and trailing whitespace is folded too, so `" Late"` becomes `"_late"`.
pub fn status_type_id(label: &str) -> String {
    let mut id = String::with_capacity(label.len());
    let mut in_whitespace = false;
    for c in label.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                id.push('_');
            }
            in_whitespace = true;
        } else {
            id.push(c);
            in_whitespace = false;
        }
    }
    id
}

pub fn default_status_types() -> Vec<StatusType> {
    vec![
        StatusType {
            id: LATE.to_string(),
            label: "Late Arrival".to_string(),
            color: "var(--status-late)".to_string(),
        },
        StatusType {
            id: ABSENT.to_string(),
            label: "Absent".to_string(),
            color: "var(--status-absent)".to_string(),
        },
        StatusType {
            id: SHORT_LEAVE.to_string(),
            label: "Short Leave".to_string(),
            color: "var(--status-short-leave)".to_string(),
        },
        StatusType {
            id: NIGHT_SHIFT.to_string(),
            label: "Night Shift".to_string(),
            color: "var(--status-night-shift)".to_string(),
        },
    ]
}
