// ============================================================================
// RESOURCES - CRUD parametrizado por descriptor
// ============================================================================
// Un único servicio para dispositivos, usuarios, reservas y tickets: cada
// recurso solo declara rutas, campos, permisos y si sube archivos.
// ============================================================================

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::services::api_client::{ApiClient, ApiError, RequestOptions};
use crate::services::http::{FilePart, FormField, FormValue, Method, RequestBody};
use crate::utils::constants::GENERIC_ERROR;
use crate::viewmodels::action_dispatcher::ActionKind;
use crate::viewmodels::list_query::{build_query, with_query, Criteria, StatusPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Create,
    Update,
    Delete,
    Cancel,
    Transition,
}

#[derive(Debug)]
pub struct ResourceDescriptor {
    /// Nombre para mensajes ("device", "user"...)
    pub name: &'static str,
    pub list_path: &'static str,
    pub read_path: &'static str,
    pub write_base: &'static str,
    /// Campo que cambia en cancel/transition
    pub status_field: &'static str,
    pub status_policy: StatusPolicy,
    /// Create/update como multipart (subida de imagen)
    pub multipart: bool,
    pub form_fields: &'static [&'static str],
    pub permissions: &'static [Permission],
}

impl ResourceDescriptor {
    pub fn allows(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

const DEVICE_FIELDS: &[&str] = &[
    "make",
    "model",
    "serial_number",
    "description_of_issue",
    "device_type",
    "operating_system",
    "status",
    "user_id",
    "image",
];

const CRUD: &[Permission] = &[Permission::Create, Permission::Update, Permission::Delete];

pub const ADMIN_DEVICES: ResourceDescriptor = ResourceDescriptor {
    name: "device",
    list_path: "devices",
    read_path: "devices",
    write_base: "admin/devices",
    status_field: "status",
    status_policy: StatusPolicy::ShowAllWhenAbsent,
    multipart: true,
    form_fields: DEVICE_FIELDS,
    permissions: CRUD,
};

pub const STAFF_DEVICES: ResourceDescriptor = ResourceDescriptor {
    write_base: "staff/devices",
    ..ADMIN_DEVICES
};

/// Catálogo público: solo lectura
pub const CATALOG_DEVICES: ResourceDescriptor = ResourceDescriptor {
    write_base: "devices",
    form_fields: &[],
    permissions: &[],
    ..ADMIN_DEVICES
};

/// Primeros dispositivos de `/devices` tal cual los da el backend
pub const FEATURED_DEVICES: ResourceDescriptor = ResourceDescriptor {
    status_policy: StatusPolicy::OmitWhenAbsent,
    ..CATALOG_DEVICES
};

pub const POPULAR_DEVICES: ResourceDescriptor = ResourceDescriptor {
    list_path: "devices/popular?limit=3",
    status_policy: StatusPolicy::OmitWhenAbsent,
    ..CATALOG_DEVICES
};

pub const ADMIN_USERS: ResourceDescriptor = ResourceDescriptor {
    name: "user",
    list_path: "admin/users",
    read_path: "admin/users",
    write_base: "admin/users",
    status_field: "status",
    status_policy: StatusPolicy::OmitWhenAbsent,
    multipart: false,
    form_fields: &["username", "full_name", "email", "password", "role", "is_verified"],
    permissions: CRUD,
};

pub const BOOKINGS: ResourceDescriptor = ResourceDescriptor {
    name: "booking",
    list_path: "bookings",
    read_path: "my-bookings",
    write_base: "bookings",
    status_field: "status",
    status_policy: StatusPolicy::OmitWhenAbsent,
    multipart: false,
    form_fields: &[],
    permissions: &[Permission::Cancel],
};

pub const STAFF_RENTALS: ResourceDescriptor = ResourceDescriptor {
    name: "ticket",
    list_path: "rentals",
    read_path: "my-bookings",
    write_base: "staff/rentals",
    status_field: "rental_status",
    status_policy: StatusPolicy::OmitWhenAbsent,
    multipart: false,
    form_fields: &[],
    permissions: &[Permission::Transition],
};

/// Campos de un formulario de alta/edición, en orden
#[derive(Debug, Clone, Default)]
pub struct ResourceForm {
    fields: Vec<FormField>,
}

impl ResourceForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.fields.push(FormField::text(name, value));
        self
    }

    /// Solo se envía si tiene contenido (password en edición, user_id)
    pub fn optional_text(self, name: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self
        } else {
            self.text(name, value.trim())
        }
    }

    pub fn file(mut self, name: &str, file: Option<FilePart>) -> Self {
        if let Some(file) = file {
            self.fields.push(FormField::file(name, file));
        }
        self
    }

    /// Lee los campos del descriptor. `password` y `user_id` vacíos no se
    /// envían (edición sin cambiar contraseña, dispositivo sin dueño).
    pub fn collect(
        descriptor: &ResourceDescriptor,
        value_of: impl Fn(&str) -> String,
        file_of: impl Fn(&str) -> Option<FilePart>,
    ) -> Self {
        descriptor
            .form_fields
            .iter()
            .fold(Self::new(), |form, name| match *name {
                "image" => form.file(name, file_of(name)),
                "password" | "user_id" => form.optional_text(name, &value_of(name)),
                _ => form.text(name, &value_of(name)),
            })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .and_then(FormField::text_value)
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Solo campos de texto (los archivos no viajan en JSON)
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .filter_map(|field| match &field.value {
                FormValue::Text(value) => Some((field.name.clone(), Value::String(value.clone()))),
                FormValue::File(_) => None,
            })
            .collect();
        Value::Object(map)
    }

    fn into_body(self, multipart: bool) -> RequestBody {
        if multipart {
            RequestBody::Multipart(self.fields)
        } else {
            RequestBody::Json(self.to_json())
        }
    }
}

#[derive(Clone)]
pub struct ResourceService {
    api: ApiClient,
    descriptor: &'static ResourceDescriptor,
}

impl ResourceService {
    pub fn new(api: ApiClient, descriptor: &'static ResourceDescriptor) -> Self {
        Self { api, descriptor }
    }

    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        self.descriptor
    }

    pub fn list_url(&self, criteria: &Criteria) -> String {
        with_query(
            self.descriptor.list_path,
            &build_query(criteria, self.descriptor.status_policy),
        )
    }

    pub async fn list<T: DeserializeOwned>(&self, criteria: &Criteria) -> Result<Vec<T>, ApiError> {
        let path = self.list_url(criteria);
        let items: Option<Vec<T>> = self.api.get_json(&path, &RequestOptions::default()).await?;
        Ok(items.unwrap_or_default())
    }

    pub async fn fetch<T: DeserializeOwned>(&self, id: u64) -> Result<T, ApiError> {
        let path = format!("{}/{}", self.descriptor.read_path, id);
        self.api
            .get_json(&path, &RequestOptions::fallback(format!("Failed to load {}", self.descriptor.name)))
            .await
    }

    /// Alta (`id = None`) o edición
    pub async fn save(&self, id: Option<u64>, form: ResourceForm) -> Result<(), ApiError> {
        let (permission, method, path) = match id {
            None => (Permission::Create, Method::Post, self.descriptor.write_base.to_string()),
            Some(id) => (Permission::Update, Method::Put, format!("{}/{}", self.descriptor.write_base, id)),
        };
        self.ensure(permission)?;
        let body = form.into_body(self.descriptor.multipart);
        self.api
            .request(method, &path, body, &RequestOptions::fallback(GENERIC_ERROR))
            .await?;
        log::info!("✅ [{}] {} guardado", self.descriptor.name.to_uppercase(), path);
        Ok(())
    }

    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        self.ensure(Permission::Delete)?;
        let path = format!("{}/{}", self.descriptor.write_base, id);
        self.api.delete(&path, &RequestOptions::fallback(GENERIC_ERROR)).await?;
        log::info!("🗑️ [{}] {} eliminado", self.descriptor.name.to_uppercase(), path);
        Ok(())
    }

    pub async fn set_status(&self, id: u64, status: &str, fallback: &str) -> Result<(), ApiError> {
        let path = format!("{}/{}", self.descriptor.write_base, id);
        let mut body = Map::new();
        body.insert(self.descriptor.status_field.to_string(), Value::String(status.to_string()));
        self.api
            .request(Method::Put, &path, RequestBody::Json(Value::Object(body)), &RequestOptions::fallback(fallback))
            .await?;
        log::info!("🔄 [{}] {} → {}", self.descriptor.name.to_uppercase(), path, status);
        Ok(())
    }

    /// Ejecuta una acción de fila
    pub async fn run(&self, action: &ActionKind, id: u64) -> Result<(), ApiError> {
        match action {
            ActionKind::Delete => self.delete(id).await,
            ActionKind::Cancel => {
                self.ensure(Permission::Cancel)?;
                self.set_status(id, "cancelled", GENERIC_ERROR).await
            }
            ActionKind::Transition(status) => {
                self.ensure(Permission::Transition)?;
                self.set_status(id, status, "Failed to update status").await
            }
        }
    }

    fn ensure(&self, permission: Permission) -> Result<(), ApiError> {
        if self.descriptor.allows(permission) {
            Ok(())
        } else {
            log::warn!("⚠️ [RESOURCES] {:?} no permitido sobre {}", permission, self.descriptor.name);
            Err(ApiError::Forbidden {
                message: "Action not allowed".to_string(),
                code: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Device;
    use crate::services::api_client::AuthHeader;
    use crate::services::http::FilePayload;
    use crate::testing::ScriptedTransport;
    use futures::executor::block_on;
    use std::rc::Rc;

    fn service(transport: &ScriptedTransport, descriptor: &'static ResourceDescriptor) -> ResourceService {
        let api = ApiClient::new("http://api.test/api", Rc::new(transport.clone()), AuthHeader::default());
        ResourceService::new(api, descriptor)
    }

    #[test]
    fn device_list_asks_for_all_without_status() {
        let transport = ScriptedTransport::new();
        transport.respond(200, r#"[{"device_id":1,"make":"HP","model":"X","status":"available"}]"#);
        let devices = service(&transport, &ADMIN_DEVICES);

        let list: Vec<Device> = block_on(devices.list(&Criteria::new().search("hp"))).unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(
            transport.last_request().unwrap().url,
            "http://api.test/api/devices?all=true&search=hp"
        );
    }

    #[test]
    fn popular_list_keeps_its_limit_when_filtered() {
        let transport = ScriptedTransport::new();
        transport.respond(200, "[]");
        transport.respond(200, "[]");
        let popular = service(&transport, &POPULAR_DEVICES);

        let _: Vec<Device> = block_on(popular.list(&Criteria::new())).unwrap();
        let _: Vec<Device> = block_on(popular.list(&Criteria::new().search("mac"))).unwrap();

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls[0], "http://api.test/api/devices/popular?limit=3");
        assert_eq!(urls[1], "http://api.test/api/devices/popular?limit=3&search=mac");
    }

    #[test]
    fn null_list_body_is_empty() {
        let transport = ScriptedTransport::new();
        transport.respond(200, "null");
        let users = service(&transport, &ADMIN_USERS);
        let list: Vec<serde_json::Value> = block_on(users.list(&Criteria::new())).unwrap();
        assert!(list.is_empty());
        assert_eq!(transport.last_request().unwrap().url, "http://api.test/api/admin/users");
    }

    #[test]
    fn device_update_is_multipart_with_spoofed_put() {
        let transport = ScriptedTransport::new();
        transport.respond(200, "{}");
        let devices = service(&transport, &STAFF_DEVICES);
        let form = ResourceForm::new()
            .text("make", "Dell")
            .optional_text("user_id", "  ")
            .file(
                "image",
                Some(FilePart {
                    file_name: "front.png".to_string(),
                    payload: FilePayload::Bytes(vec![1, 2, 3]),
                }),
            );

        block_on(devices.save(Some(8), form)).unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.url, "http://api.test/api/staff/devices/8");
        let RequestBody::Multipart(fields) = sent.body else {
            panic!("multipart expected");
        };
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["make", "image", "_method"]);
    }

    #[test]
    fn collected_form_follows_descriptor_fields() {
        let form = ResourceForm::collect(
            &ADMIN_USERS,
            |name| match name {
                "username" => "kim".to_string(),
                "role" => "staff".to_string(),
                _ => String::new(),
            },
            |_| None,
        );
        let names: Vec<&str> = form.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["username", "full_name", "email", "role", "is_verified"]);
        assert_eq!(form.get("role"), Some("staff"));

        let device = ResourceForm::collect(&ADMIN_DEVICES, |_| "x".to_string(), |_| None);
        assert!(device.get("user_id").is_some());
        assert!(device.fields().iter().all(|f| f.name != "image"));
    }

    #[test]
    fn user_update_omits_empty_password() {
        let transport = ScriptedTransport::new();
        transport.respond(200, "{}");
        let users = service(&transport, &ADMIN_USERS);
        let form = ResourceForm::new()
            .text("username", "kim")
            .optional_text("password", "");

        block_on(users.save(Some(3), form)).unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::Put);
        let RequestBody::Json(body) = sent.body else {
            panic!("json expected");
        };
        assert_eq!(body, serde_json::json!({"username": "kim"}));
    }

    #[test]
    fn transition_writes_the_rental_status_field() {
        let transport = ScriptedTransport::new();
        transport.respond(200, "{}");
        let rentals = service(&transport, &STAFF_RENTALS);

        block_on(rentals.run(&ActionKind::Transition("confirmed".to_string()), 12)).unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url, "http://api.test/api/staff/rentals/12");
        let RequestBody::Json(body) = sent.body else {
            panic!("json expected");
        };
        assert_eq!(body, serde_json::json!({"rental_status": "confirmed"}));
    }

    #[test]
    fn disallowed_action_never_reaches_the_network() {
        let transport = ScriptedTransport::new();
        let catalog = service(&transport, &CATALOG_DEVICES);

        let result = block_on(catalog.run(&ActionKind::Delete, 1));

        assert!(matches!(result, Err(ApiError::Forbidden { .. })));
        assert_eq!(transport.request_count(), 0);
    }
}
