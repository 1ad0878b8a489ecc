pub mod http;
pub mod api_client;
pub mod resources;
pub mod auth_service;
pub mod stats_service;
pub mod booking_service;

pub use api_client::{ApiClient, ApiError, AuthHeader, RequestOptions};
pub use auth_service::AuthService;
pub use booking_service::{BookingService, NewBooking};
pub use resources::{ResourceDescriptor, ResourceForm, ResourceService};
pub use stats_service::StatsService;
