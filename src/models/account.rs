use serde::{Deserialize, Deserializer, Serialize};

use crate::models::null_as_default;
use crate::models::user::Role;

/// Cuenta de usuario gestionada desde el panel admin
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserAccount {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: Role,
    #[serde(default, deserialize_with = "flag")]
    pub is_verified: bool,
}

/// El backend manda is_verified como bool, 0/1 o "0"/"1"
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_i64().unwrap_or(0) != 0,
        serde_json::Value::String(s) => matches!(s.as_str(), "1" | "true"),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verified_flag_accepts_numbers_and_strings() {
        let a: UserAccount = serde_json::from_str(r#"{"user_id":1,"is_verified":1}"#).unwrap();
        let b: UserAccount = serde_json::from_str(r#"{"user_id":2,"is_verified":"0"}"#).unwrap();
        let c: UserAccount = serde_json::from_str(r#"{"user_id":3,"is_verified":true}"#).unwrap();
        assert!(a.is_verified);
        assert!(!b.is_verified);
        assert!(c.is_verified);
    }

    #[test]
    fn null_username_and_role_do_not_reject_the_account() {
        let account: UserAccount =
            serde_json::from_str(r#"{"user_id":4,"username":null,"role":null,"is_verified":null}"#).unwrap();
        assert_eq!(account.user_id, 4);
        assert_eq!(account.username, "");
        assert_eq!(account.role, Role::default());
        assert!(!account.is_verified);
    }
}
