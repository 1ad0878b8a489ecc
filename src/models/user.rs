// ============================================================================
// USER / SESSION - Usuario autenticado y sesión persistida
// ============================================================================

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Rol del usuario tal como lo envía el backend
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Staff,
    Customer,
    Other(String),
}

impl Role {
    pub fn parse(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            "staff" => Role::Staff,
            "customer" => Role::Customer,
            other => Role::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Customer => "customer",
            Role::Other(value) => value,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Other(String::new())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Role::parse(&value))
    }
}

/// Usuario de la sesión. Los campos que no modelamos se conservan en `extra`
/// para que guardar y volver a leer el usuario no pierda nada.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Par (token, usuario) que identifica al actor actual del navegador
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

impl Session {
    pub fn role(&self) -> &Role {
        &self.user.role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_is_kept_verbatim() {
        let user: User = serde_json::from_str(r#"{"username":"ana","role":"technician"}"#).unwrap();
        assert_eq!(user.role, Role::Other("technician".to_string()));
        assert_eq!(serde_json::to_value(&user).unwrap()["role"], "technician");
    }

    #[test]
    fn extra_fields_survive_a_storage_round_trip() {
        let json = r#"{"user_id":3,"username":"ana","role":"staff","phone":"555","is_verified":true}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.extra.get("phone").and_then(|v| v.as_str()), Some("555"));

        let again: User = serde_json::from_str(&serde_json::to_string(&user).unwrap()).unwrap();
        assert_eq!(again, user);
    }

    #[test]
    fn role_only_user_deserializes() {
        let user: User = serde_json::from_str(r#"{"role":"staff"}"#).unwrap();
        assert_eq!(user.role, Role::Staff);
        assert_eq!(user.username, "");
    }
}
