//! Global system configuration singleton.

use serde::{Deserialize, Serialize};

use crate::department::Department;

pub const DEFAULT_WEB_LABEL: &str = "WEBDESIGNER";
pub const DEFAULT_SOCIAL_LABEL: &str = "SOCIAL MIDIA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeFont {
    #[default]
    Sans,
    Serif,
    Mono,
    Rounded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfig {
    pub agency_name: String,
    pub agency_slogan: String,
    #[serde(default)]
    pub agency_logo_url: String,
    pub primary_color: String,
    pub selection_color: String,
    #[serde(default)]
    pub theme_font: ThemeFont,
    pub system_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_label: Option<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            agency_name: "CliqA".to_string(),
            agency_slogan: "Digital Agency".to_string(),
            agency_logo_url: String::new(),
            primary_color: "#2563EB".to_string(),
            selection_color: "#EFF6FF".to_string(),
            theme_font: ThemeFont::Sans,
            system_version: "v5.3 MySQL Cloud".to_string(),
            web_label: Some(DEFAULT_WEB_LABEL.to_string()),
            social_label: Some(DEFAULT_SOCIAL_LABEL.to_string()),
        }
    }
}

impl SystemConfig {
    /// Display label of a department section, falling back to the built-in
    /// label when the stored one is absent or blank.
    pub fn department_label(&self, department: Department) -> &str {
        let (stored, fallback) = match department {
            Department::Web => (self.web_label.as_deref(), DEFAULT_WEB_LABEL),
            Department::Social => (self.social_label.as_deref(), DEFAULT_SOCIAL_LABEL),
        };
        match stored {
            Some(label) if !label.trim().is_empty() => label,
            _ => fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_labels() {
        let config = SystemConfig::default();
        assert_eq!(config.department_label(Department::Web), "WEBDESIGNER");
        assert_eq!(config.department_label(Department::Social), "SOCIAL MIDIA");
    }

    #[test]
    fn blank_label_falls_back() {
        let config = SystemConfig {
            web_label: Some("  ".into()),
            social_label: None,
            ..SystemConfig::default()
        };
        assert_eq!(config.department_label(Department::Web), DEFAULT_WEB_LABEL);
        assert_eq!(config.department_label(Department::Social), DEFAULT_SOCIAL_LABEL);
    }

    #[test]
    fn config_round_trips_wire_shape() {
        let json = serde_json::json!({
            "agencyName": "Studio",
            "agencySlogan": "Sites",
            "agencyLogoUrl": "",
            "primaryColor": "#000000",
            "selectionColor": "#FFFFFF",
            "themeFont": "mono",
            "systemVersion": "v1",
            "webLabel": "WEB"
        });
        let config: SystemConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.theme_font, ThemeFont::Mono);
        assert_eq!(config.department_label(Department::Web), "WEB");
        assert_eq!(config.social_label, None);
    }
}
