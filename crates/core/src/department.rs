//! Business verticals that scope activity vocabularies and project boards.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Web,
    Social,
}

impl Department {
    pub const ALL: [Department; 2] = [Department::Web, Department::Social];

    pub fn as_str(self) -> &'static str {
        match self {
            Department::Web => "web",
            Department::Social => "social",
        }
    }

    /// Department selected by a department-prefixed tab id such as
    /// `web-projects` or `social-activities`.
    pub fn from_tab_id(tab_id: &str) -> Option<Self> {
        if tab_id.starts_with("web-") {
            Some(Department::Web)
        } else if tab_id.starts_with("social-") {
            Some(Department::Social)
        } else {
            None
        }
    }
}
