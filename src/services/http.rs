// ============================================================================
// HTTP TRANSPORT - Envío de requests (gloo-net en el navegador)
// ============================================================================
// El ApiClient construye HttpRequest ya completos (URL, headers, body); el
// transport solo los envía y devuelve status + texto del body.
// ============================================================================

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use std::fmt;
use wasm_bindgen::JsValue;
use web_sys::{Blob, FormData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contenido de un archivo a subir
#[derive(Debug, Clone)]
pub enum FilePayload {
    /// Archivo elegido en un `<input type="file">`
    Browser(web_sys::File),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct FilePart {
    pub file_name: String,
    pub payload: FilePayload,
}

#[derive(Debug, Clone)]
pub enum FormValue {
    Text(String),
    File(FilePart),
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub value: FormValue,
}

impl FormField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Text(value.into()),
        }
    }

    pub fn file(name: impl Into<String>, file: FilePart) -> Self {
        Self {
            name: name.into(),
            value: FormValue::File(file),
        }
    }

    pub fn text_value(&self) -> Option<&str> {
        match &self.value {
            FormValue::Text(value) => Some(value),
            FormValue::File(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormField>),
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fallo antes de tener respuesta (red caída, CORS, body inválido)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Transport del navegador sobre fetch (gloo-net)
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
            Method::Patch => Request::patch(&request.url),
            Method::Delete => Request::delete(&request.url),
        };
        let builder: RequestBuilder = request
            .headers
            .iter()
            .fold(builder, |builder, (name, value)| builder.header(name, value));

        let prepared = match &request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(fields) => {
                let form = to_form_data(fields).map_err(|e| TransportError(format!("FormData error: {:?}", e)))?;
                builder.body(form)
            }
        }
        .map_err(|e| TransportError(format!("Request build error: {}", e)))?;

        let response = prepared
            .send()
            .await
            .map_err(|e| TransportError(format!("Network error: {}", e)))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok(HttpResponse { status, body })
    }
}

fn to_form_data(fields: &[FormField]) -> Result<FormData, JsValue> {
    let form = FormData::new()?;
    for field in fields {
        match &field.value {
            FormValue::Text(value) => form.append_with_str(&field.name, value)?,
            FormValue::File(part) => {
                let blob: Blob = match &part.payload {
                    FilePayload::Browser(file) => file.clone().into(),
                    FilePayload::Bytes(bytes) => {
                        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes.as_slice()));
                        Blob::new_with_u8_array_sequence(&parts)?
                    }
                };
                form.append_with_blob_and_filename(&field.name, &blob, &part.file_name)?;
            }
        }
    }
    Ok(form)
}
