// Employee record.

pub const DEFAULT_DEPARTMENT: &str = "General";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub role: String,
    pub department: String,
}

impl Employee {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            department: DEFAULT_DEPARTMENT.to_string(),
        }
    }
}
