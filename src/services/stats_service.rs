// ============================================================================
// STATS SERVICE - Contadores de los dashboards
// ============================================================================
// No hay endpoint de estadísticas: se cuentan los listados. Cada contador
// falla por separado (None → la tarjeta muestra "Error").
// ============================================================================

use serde::Deserialize;

use crate::models::{Booking, Device, UserAccount};
use crate::services::api_client::{ApiClient, ApiError, RequestOptions};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminStats {
    pub total_devices: Option<usize>,
    pub total_users: Option<usize>,
    pub active_bookings: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffStats {
    pub available_devices: Option<usize>,
    pub pending_rentals: Option<usize>,
}

/// Texto de una tarjeta de contador
pub fn counter_label(value: Option<usize>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "Error".to_string())
}

#[derive(Clone)]
pub struct StatsService {
    api: ApiClient,
}

impl StatsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn fetch<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let items: Option<Vec<T>> = self.api.get_json(path, &RequestOptions::default()).await?;
        Ok(items.unwrap_or_default())
    }

    fn count<T>(name: &str, result: Result<Vec<T>, ApiError>, keep: impl Fn(&T) -> bool) -> Option<usize> {
        match result {
            Ok(items) => Some(items.iter().filter(|item| keep(item)).count()),
            Err(e) => {
                log::warn!("⚠️ [STATS] {} no disponible: {}", name, e);
                None
            }
        }
    }

    pub async fn admin(&self) -> AdminStats {
        let (devices, users, bookings) = futures::join!(
            self.fetch::<Device>("devices?all=true"),
            self.fetch::<UserAccount>("admin/users"),
            self.fetch::<Booking>("bookings"),
        );
        AdminStats {
            total_devices: Self::count("devices", devices, |_| true),
            total_users: Self::count("users", users, |_| true),
            active_bookings: Self::count("bookings", bookings, |b| {
                matches!(b.status.as_deref(), Some("pending") | Some("confirmed"))
            }),
        }
    }

    pub async fn staff(&self) -> StaffStats {
        let (devices, rentals) = futures::join!(
            self.fetch::<Device>("devices"),
            self.fetch::<Booking>("rentals"),
        );
        StaffStats {
            available_devices: Self::count("devices", devices, |_| true),
            pending_rentals: Self::count("rentals", rentals, |r| r.rental_status.as_deref() == Some("pending")),
        }
    }
}
