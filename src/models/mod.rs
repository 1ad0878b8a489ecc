pub mod user;
pub mod device;
pub mod account;
pub mod booking;
pub mod auth;

pub use user::{Role, Session, User};
pub use device::Device;
pub use account::UserAccount;
pub use booking::{Booking, BookingEnvelope, PartyRef};
pub use auth::*;

use serde::{Deserialize, Deserializer};

/// El backend manda `null` en columnas vacías: se trata igual que una clave ausente
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
