use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::user::User;

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Respuesta de /login y /register
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct VerifyOtpRequest {
    pub username: String,
    pub otp_code: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct ResendOtpRequest {
    pub username: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct VerifyResetOtpRequest {
    pub email: String,
    pub otp_code: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp_code: String,
    pub new_password: String,
    pub new_password_confirmation: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Cuerpo de error del API (Laravel): mapa de validación, mensaje, error y,
/// en backends nuevos, un código estructurado
#[derive(Clone, PartialEq, Deserialize, Debug, Default)]
#[serde(default)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
    pub code: Option<String>,
    pub errors: Option<BTreeMap<String, serde_json::Value>>,
}

impl ApiErrorBody {
    /// Errores por campo; cada valor puede ser una lista o un string suelto
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        let Some(errors) = &self.errors else {
            return BTreeMap::new();
        };
        errors
            .iter()
            .map(|(field, value)| {
                let messages = match value {
                    serde_json::Value::Array(items) => items
                        .iter()
                        .filter_map(|item| item.as_str().map(str::to_string))
                        .collect(),
                    serde_json::Value::String(message) => vec![message.clone()],
                    _ => Vec::new(),
                };
                (field.clone(), messages)
            })
            .filter(|(_, messages)| !messages.is_empty())
            .collect()
    }
}
