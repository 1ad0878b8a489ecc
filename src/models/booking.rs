use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::device::Device;

/// Usuario o técnico embebido en una reserva (puede venir incompleto)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartyRef {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl PartyRef {
    pub fn name(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.username.as_deref().filter(|s| !s.is_empty()))
    }
}

/// Reserva de reparación. `/bookings` y `/rentals` usan nombres distintos para
/// id y estado, por eso ambos están presentes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default)]
    pub booking_id: Option<u64>,
    #[serde(default)]
    pub rental_id: Option<u64>,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rental_status: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub pickup_date: Option<String>,
    #[serde(default)]
    pub time_slot: Option<String>,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub user: Option<PartyRef>,
    #[serde(default)]
    pub staff: Option<PartyRef>,
    #[serde(default, alias = "car")]
    pub device: Option<Device>,
}

impl Booking {
    pub fn key(&self) -> u64 {
        self.booking_id.or(self.rental_id).or(self.id).unwrap_or_default()
    }

    /// Estado efectivo: `status` o, en la API de staff, `rental_status`
    pub fn effective_status(&self) -> &str {
        self.status
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.rental_status.as_deref())
            .unwrap_or("")
    }

    /// Estado de un ticket de staff: `rental_status` manda sobre `status`
    pub fn rental_state(&self) -> &str {
        self.rental_status
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.status.as_deref())
            .unwrap_or("")
    }

    pub fn raw_date(&self) -> Option<&str> {
        self.date.as_deref().or(self.pickup_date.as_deref())
    }

    /// Fecha legible (MM/DD/YYYY); si no se puede parsear se muestra tal cual
    pub fn date_label(&self) -> Option<String> {
        self.raw_date().map(format_date)
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.user.as_ref().and_then(PartyRef::name)
    }

    pub fn staff_name(&self) -> Option<&str> {
        self.staff.as_ref().and_then(PartyRef::name)
    }

    pub fn device_name(&self) -> Option<String> {
        self.device
            .as_ref()
            .map(Device::display_name)
            .filter(|name| !name.is_empty())
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status.as_deref() == Some("paid")
    }
}

pub fn format_date(raw: &str) -> String {
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()));
    match day {
        Some(day) => day.format("%m/%d/%Y").to_string(),
        None => raw.to_string(),
    }
}

/// Detalle de reserva: `/my-bookings/{id}` envuelve el objeto en `repair` o
/// `booking` según la versión del backend
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BookingEnvelope {
    Repair { repair: Booking },
    Wrapped { booking: Booking },
    Bare(Booking),
}

impl BookingEnvelope {
    pub fn into_booking(self) -> Booking {
        match self {
            BookingEnvelope::Repair { repair } => repair,
            BookingEnvelope::Wrapped { booking } => booking,
            BookingEnvelope::Bare(booking) => booking,
        }
    }
}
