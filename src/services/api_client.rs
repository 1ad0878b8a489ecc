// ============================================================================
// API CLIENT - Comunicación HTTP con el backend REST
// ============================================================================
// Headers comunes, método spoofing para multipart, normalización de errores
// y handler central de 401. NO tiene lógica de negocio.
// ============================================================================

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::models::ApiErrorBody;
use crate::services::http::{
    FormField, GlooTransport, HttpRequest, HttpResponse, HttpTransport, Method, RequestBody,
};
use crate::utils::constants::GENERIC_ERROR;

/// Header Authorization compartido entre el SessionStore y el ApiClient
#[derive(Clone, Default, Debug)]
pub struct AuthHeader(Rc<RefCell<Option<String>>>);

impl AuthHeader {
    pub fn set(&self, token: Option<&str>) {
        *self.0.borrow_mut() = token.map(str::to_string);
    }

    pub fn token(&self) -> Option<String> {
        self.0.borrow().clone()
    }

    pub fn bearer(&self) -> Option<String> {
        self.token().map(|token| format!("Bearer {}", token))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Mensaje si el servidor no manda nada útil
    pub fallback: Option<String>,
    /// No disparar el handler de sesión expirada (logout, login)
    pub skip_auth_redirect: bool,
}

impl RequestOptions {
    pub fn fallback(message: impl Into<String>) -> Self {
        Self {
            fallback: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn skipping_auth_redirect(mut self) -> Self {
        self.skip_auth_redirect = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },
    #[error("{message}")]
    Unauthenticated { message: String },
    #[error("{message}")]
    Forbidden { message: String, code: Option<String> },
    #[error("{message}")]
    NotFound { message: String },
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("{message}")]
    Network { message: String, detail: String },
    #[error("{message}")]
    Decode { message: String, detail: String },
}

impl ApiError {
    /// Texto que se muestra al usuario
    pub fn user_message(&self) -> &str {
        match self {
            ApiError::Validation { message, .. }
            | ApiError::Unauthenticated { message }
            | ApiError::Forbidden { message, .. }
            | ApiError::NotFound { message }
            | ApiError::Server { message, .. }
            | ApiError::Network { message, .. }
            | ApiError::Decode { message, .. } => message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation { .. } => Some(422),
            ApiError::Unauthenticated { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Network { .. } | ApiError::Decode { .. } => None,
        }
    }
}

/// Convierte una respuesta no-2xx en `ApiError`.
///
/// Preferencia del mensaje: errores por campo (una línea por mensaje, campos
/// en orden alfabético), `message`, `error` y por último `fallback`.
pub fn normalize_error(status: u16, body: &str, fallback: &str) -> ApiError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let fields = parsed.field_errors();

    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
    let message = if fields.is_empty() {
        non_empty(parsed.message)
            .or_else(|| non_empty(parsed.error))
            .unwrap_or_else(|| fallback.to_string())
    } else {
        fields.values().flatten().cloned().collect::<Vec<_>>().join("\n")
    };

    match status {
        422 => ApiError::Validation { message, fields },
        401 => ApiError::Unauthenticated { message },
        403 => ApiError::Forbidden {
            message,
            code: parsed.code,
        },
        404 => ApiError::NotFound { message },
        _ => ApiError::Server { status, message },
    }
}

/// Respuesta 2xx
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let body = if self.body.trim().is_empty() { "null" } else { &self.body };
        serde_json::from_str(body).map_err(|e| ApiError::Decode {
            message: "Unexpected response from server".to_string(),
            detail: e.to_string(),
        })
    }
}

type UnauthenticatedHook = Rc<dyn Fn()>;

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Rc<dyn HttpTransport>,
    auth: AuthHeader,
    on_unauthenticated: Rc<RefCell<Option<UnauthenticatedHook>>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Rc<dyn HttpTransport>, auth: AuthHeader) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            auth,
            on_unauthenticated: Rc::new(RefCell::new(None)),
        }
    }

    /// Cliente del navegador (fetch vía gloo-net)
    pub fn browser(base_url: impl Into<String>, auth: AuthHeader) -> Self {
        Self::new(base_url, Rc::new(GlooTransport), auth)
    }

    /// Handler único para 401 en requests autenticados (se instala al arrancar)
    pub fn on_unauthenticated<F>(&self, hook: F)
    where
        F: Fn() + 'static,
    {
        *self.on_unauthenticated.borrow_mut() = Some(Rc::new(hook));
    }

    pub fn auth(&self) -> &AuthHeader {
        &self.auth
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Arma el request final: headers comunes y, para multipart con un verbo
    /// distinto de POST, envío como POST + campo `_method`
    pub fn build_request(&self, method: Method, path: &str, body: RequestBody) -> HttpRequest {
        let mut headers = vec![
            ("X-Requested-With".to_string(), "XMLHttpRequest".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if let Some(bearer) = self.auth.bearer() {
            headers.push(("Authorization".to_string(), bearer));
        }

        let (method, body) = match body {
            RequestBody::Multipart(mut fields) if method != Method::Post => {
                fields.push(FormField::text("_method", method.as_str()));
                (Method::Post, RequestBody::Multipart(fields))
            }
            other => (method, other),
        };

        HttpRequest {
            method,
            url: self.url(path),
            headers,
            body,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        let request = self.build_request(method, path, body);
        let authenticated = request.header("Authorization").is_some();
        log::debug!("🌐 [API] {} {}", request.method, request.url);

        let response: HttpResponse = self.transport.send(request).await.map_err(|e| {
            log::error!("❌ [API] {} {} falló: {}", method, path, e);
            ApiError::Network {
                message: options.fallback.clone().unwrap_or_else(|| GENERIC_ERROR.to_string()),
                detail: e.to_string(),
            }
        })?;

        if response.ok() {
            return Ok(ApiResponse {
                status: response.status,
                body: response.body,
            });
        }

        let fallback = options.fallback.as_deref().unwrap_or(GENERIC_ERROR);
        let error = normalize_error(response.status, &response.body, fallback);
        log::warn!("⚠️ [API] {} {} → {}: {}", method, path, response.status, error);

        if matches!(error, ApiError::Unauthenticated { .. }) && authenticated && !options.skip_auth_redirect {
            // Clonar el hook antes de llamarlo: puede tocar el propio cliente
            let hook = self.on_unauthenticated.borrow().clone();
            if let Some(hook) = hook {
                log::warn!("🔒 [API] Sesión expirada, ejecutando handler de 401");
                hook();
            }
        }
        Err(error)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, options: &RequestOptions) -> Result<T, ApiError> {
        self.request(Method::Get, path, RequestBody::Empty, options)
            .await?
            .json()
    }

    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B, options: &RequestOptions) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Decode {
            message: options.fallback.clone().unwrap_or_else(|| GENERIC_ERROR.to_string()),
            detail: e.to_string(),
        })?;
        self.request(method, path, RequestBody::Json(value), options)
            .await?
            .json()
    }

    pub async fn delete(&self, path: &str, options: &RequestOptions) -> Result<(), ApiError> {
        self.request(Method::Delete, path, RequestBody::Empty, options)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use futures::executor::block_on;
    use std::cell::Cell;

    fn client(transport: &ScriptedTransport, token: Option<&str>) -> ApiClient {
        let auth = AuthHeader::default();
        auth.set(token);
        ApiClient::new("http://api.test/api/", Rc::new(transport.clone()), auth)
    }

    #[test]
    fn common_headers_and_bearer_are_attached() {
        let transport = ScriptedTransport::new();
        transport.respond(200, "[]");
        let api = client(&transport, Some("abc"));

        block_on(api.get_json::<Vec<serde_json::Value>>("/devices", &RequestOptions::default())).unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url, "http://api.test/api/devices");
        assert_eq!(sent.header("X-Requested-With"), Some("XMLHttpRequest"));
        assert_eq!(sent.header("Accept"), Some("application/json"));
        assert_eq!(sent.header("Authorization"), Some("Bearer abc"));
    }

    #[test]
    fn anonymous_requests_carry_no_authorization() {
        let api = client(&ScriptedTransport::new(), None);
        let request = api.build_request(Method::Get, "devices", RequestBody::Empty);
        assert_eq!(request.header("Authorization"), None);
    }

    #[test]
    fn multipart_put_is_spoofed_as_post() {
        let api = client(&ScriptedTransport::new(), None);
        let request = api.build_request(
            Method::Put,
            "admin/devices/4",
            RequestBody::Multipart(vec![FormField::text("make", "Dell")]),
        );

        assert_eq!(request.method, Method::Post);
        let RequestBody::Multipart(fields) = request.body else {
            panic!("multipart expected");
        };
        let spoof = fields.iter().find(|f| f.name == "_method").unwrap();
        assert_eq!(spoof.text_value(), Some("PUT"));
    }

    #[test]
    fn json_put_keeps_its_verb() {
        let api = client(&ScriptedTransport::new(), None);
        let request = api.build_request(
            Method::Put,
            "bookings/1",
            RequestBody::Json(serde_json::json!({"status": "cancelled"})),
        );
        assert_eq!(request.method, Method::Put);
    }

    #[test]
    fn field_errors_win_over_message() {
        let body = r#"{"message":"The given data was invalid.","errors":{"username":["Taken."],"email":["Bad email.","Too long."]}}"#;
        let error = normalize_error(422, body, GENERIC_ERROR);

        assert_eq!(error.user_message(), "Bad email.\nToo long.\nTaken.");
        let ApiError::Validation { fields, .. } = error else {
            panic!("validation expected");
        };
        assert_eq!(fields["username"], vec!["Taken.".to_string()]);
    }

    #[test]
    fn message_then_error_then_fallback() {
        assert_eq!(normalize_error(500, r#"{"message":"Boom","error":"x"}"#, "f").user_message(), "Boom");
        assert_eq!(normalize_error(500, r#"{"error":"Duplicate entry"}"#, "f").user_message(), "Duplicate entry");
        assert_eq!(normalize_error(502, "<html>bad gateway</html>", "Login failed").user_message(), "Login failed");
    }

    #[test]
    fn forbidden_keeps_structured_code() {
        let error = normalize_error(403, r#"{"message":"Nope","code":"account_not_verified"}"#, "f");
        assert_eq!(
            error,
            ApiError::Forbidden {
                message: "Nope".to_string(),
                code: Some("account_not_verified".to_string())
            }
        );
    }

    #[test]
    fn authenticated_401_fires_the_hook_once() {
        let transport = ScriptedTransport::new();
        transport.respond(401, r#"{"message":"Unauthenticated."}"#);
        let api = client(&transport, Some("stale"));
        let fired = Rc::new(Cell::new(0));
        let fired_clone = fired.clone();
        api.on_unauthenticated(move || fired_clone.set(fired_clone.get() + 1));

        let result = block_on(api.get_json::<serde_json::Value>("bookings", &RequestOptions::default()));

        assert!(matches!(result, Err(ApiError::Unauthenticated { .. })));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn anonymous_or_opted_out_401_does_not_fire_the_hook() {
        let transport = ScriptedTransport::new();
        transport.respond(401, "{}");
        transport.respond(401, "{}");
        let fired = Rc::new(Cell::new(false));

        let anonymous = client(&transport, None);
        let flag = fired.clone();
        anonymous.on_unauthenticated(move || flag.set(true));
        let _ = block_on(anonymous.get_json::<serde_json::Value>("login", &RequestOptions::default()));

        let authed = client(&transport, Some("abc"));
        let flag = fired.clone();
        authed.on_unauthenticated(move || flag.set(true));
        let options = RequestOptions::default().skipping_auth_redirect();
        let _ = block_on(authed.request(Method::Post, "logout", RequestBody::Empty, &options));

        assert!(!fired.get());
    }

    #[test]
    fn transport_failure_maps_to_network_error() {
        let transport = ScriptedTransport::new();
        transport.fail("connection refused");
        let api = client(&transport, None);

        let error = block_on(api.delete("admin/devices/1", &RequestOptions::fallback("Failed to delete"))).unwrap_err();

        assert_eq!(error.user_message(), "Failed to delete");
        assert_eq!(error.status(), None);
    }

    #[test]
    fn malformed_success_body_is_a_decode_error() {
        let transport = ScriptedTransport::new();
        transport.respond(200, "not json");
        let api = client(&transport, None);

        let result = block_on(api.get_json::<Vec<serde_json::Value>>("devices", &RequestOptions::default()));

        assert!(matches!(result, Err(ApiError::Decode { .. })));
    }
}
