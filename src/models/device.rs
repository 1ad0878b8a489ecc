use serde::{Deserialize, Serialize};

use crate::models::null_as_default;

/// Dispositivo del catálogo / ticket de reparación
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Device {
    #[serde(default, deserialize_with = "null_as_default")]
    pub device_id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub make: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub description_of_issue: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub operating_system: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub rental_count: Option<u64>,
}

impl Device {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.make, self.model).trim().to_string()
    }

    pub fn is_available(&self) -> bool {
        self.status == "available"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_columns_decode_as_empty() {
        let list: Vec<Device> = serde_json::from_str(
            r#"[{"device_id":1,"make":"Acme","model":null,"status":null},{"device_id":null,"make":"Dell","status":"available"}]"#,
        )
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].status, "");
        assert_eq!(list[0].display_name(), "Acme");
        assert_eq!(list[1].device_id, 0);
        assert!(list[1].is_available());
    }
}
