/// Claves de localStorage (compartidas con las páginas existentes)
pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Rango para estados/roles que no están en la tabla de orden
pub const UNRANKED: u32 = 99;

pub const DEFAULT_DEVICE_IMAGE: &str = "images/default-device.svg";
pub const FEATURED_LIMIT: usize = 3;
pub const DEFAULT_TIME_SLOT: &str = "AM";

/// Mensaje genérico cuando el servidor no da nada mejor
pub const GENERIC_ERROR: &str = "An error occurred";
