// ============================================================================
// CATALOG - Destacados, populares, catálogo completo y reserva
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::dom::{
    field_value, get_element_by_id, on_submit, reset_form, set_attribute, set_field_value,
    set_inner_html, set_text_by_id,
};
use crate::models::Device;
use crate::services::api_client::ApiError;
use crate::services::booking_service::{min_booking_date_today, BookingService, NewBooking};
use crate::services::resources::{CATALOG_DEVICES, FEATURED_DEVICES, POPULAR_DEVICES};
use crate::utils::constants::{DEFAULT_DEVICE_IMAGE, FEATURED_LIMIT};
use crate::utils::format::{escape_html, or_na, status_label};
use crate::viewmodels::list_query::FilterKey;
use crate::viewmodels::list_renderer::RowCommand;
use crate::viewmodels::navigation::Route;
use crate::viewmodels::presenters::CatalogDevicePresenter;
use crate::viewmodels::{Criteria, NoticeLevel};
use crate::views::list_page::{bind_row_actions, MountedList};
use crate::views::list_view::DomListSink;
use crate::views::modal;
use crate::views::notifications::alert;

const LOGIN_TO_BOOK: &str = "Please login to book a repair slot.";

pub fn mount(ctx: &AppContext) -> Result<(), JsValue> {
    let asset_root = ctx.page.asset_root();

    if get_element_by_id("featured-cars").is_some() {
        let featured = MountedList::limited(
            ctx,
            CatalogDevicePresenter { asset_root, ranked: false },
            &FEATURED_DEVICES,
            DomListSink::grid("featured-cars").with_carousel("featured-cars-carousel"),
            FEATURED_LIMIT,
        );
        featured.load(Criteria::new());
    }

    if get_element_by_id("popular-cars").is_some() {
        let popular = MountedList::new(
            ctx,
            CatalogDevicePresenter { asset_root, ranked: false },
            &POPULAR_DEVICES,
            DomListSink::grid("popular-cars").with_carousel("popular-cars-carousel"),
        );
        popular.load(Criteria::new());
    }

    if get_element_by_id("cars-list").is_some() {
        let catalog = MountedList::new(
            ctx,
            CatalogDevicePresenter { asset_root, ranked: true },
            &CATALOG_DEVICES,
            DomListSink::grid("cars-list"),
        );
        catalog.load(Criteria::new().status("all"));
        catalog.bind_search("car-search-form", || {
            Criteria::new()
                .search(&field_value("search-input"))
                .status(&field_value("status-filter"))
                .filter(FilterKey::DeviceType, &field_value("transmission-filter"))
                .filter(FilterKey::OperatingSystem, &field_value("fuel-filter"))
        })?;
    }

    let ctx_rc = Rc::new(ctx.clone());
    bind_row_actions(
        &["featured-cars", "featured-cars-carousel", "popular-cars", "popular-cars-carousel", "cars-list"],
        move |command, id| match command {
            RowCommand::View => show_device_details(ctx_rc.clone(), id),
            RowCommand::Book => open_booking(ctx_rc.clone(), id),
            other => log::warn!("⚠️ [CATALOG] {:?} no aplica al catálogo", other),
        },
    )?;

    modal::bind_dismiss("carDetailsModal")?;
    modal::bind_dismiss("bookingModal")?;
    bind_booking_form(ctx)
}

fn fill_device_details(device: &Device, asset_root: &str) {
    let name = device.display_name();
    set_text_by_id("details-car-name", &name);
    set_text_by_id("details-make-model", &name);
    set_text_by_id("details-type", &or_na(device.device_type.as_deref()));
    set_text_by_id("details-os", &or_na(device.operating_system.as_deref()));
    set_text_by_id("details-serial", &or_na(device.serial_number.as_deref()));
    set_text_by_id("details-issue", &or_na(device.description_of_issue.as_deref()));

    if let Some(image) = get_element_by_id("details-car-image") {
        let src = device
            .image_url
            .clone()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| format!("{}{}", asset_root, DEFAULT_DEVICE_IMAGE));
        let _ = set_attribute(&image, "src", &src);
    }
    if let Some(status) = get_element_by_id("details-status") {
        let badge = if device.is_available() {
            "<span class=\"badge bg-success\">Accepting Repairs</span>".to_string()
        } else {
            format!(
                "<span class=\"badge bg-secondary\">{}</span>",
                escape_html(&status_label(&device.status))
            )
        };
        set_inner_html(&status, &badge);
    }
}

fn show_device_details(ctx: Rc<AppContext>, id: u64) {
    spawn_local(async move {
        match BookingService::new(ctx.api.clone()).device(id).await {
            Ok(device) => {
                fill_device_details(&device, ctx.page.asset_root());
                let _ = modal::show("carDetailsModal");
            }
            Err(e) => {
                log::error!("❌ [CATALOG] Detalle de {} falló: {}", id, e);
                alert("Failed to load device details");
            }
        }
    });
}

/// Reservar exige sesión; el modal se abre con la fecha mínima de mañana
fn open_booking(ctx: Rc<AppContext>, id: u64) {
    if !ctx.store.is_logged_in() {
        alert(LOGIN_TO_BOOK);
        ctx.go(&Route::Login);
        return;
    }
    spawn_local(async move {
        let name = match BookingService::new(ctx.api.clone()).device(id).await {
            Ok(device) => device.display_name(),
            Err(e) => {
                log::warn!("⚠️ [BOOKING] Sin nombre para {}: {}", id, e);
                String::new()
            }
        };
        set_text_by_id("modal-car-name", &name);
        set_field_value("booking-car-id", &id.to_string());
        set_field_value("pickup-date", "");
        set_field_value("return-date", "");
        if let Some(date) = get_element_by_id("pickup-date") {
            let _ = set_attribute(&date, "min", &min_booking_date_today());
        }
        let _ = modal::show("bookingModal");
    });
}

fn bind_booking_form(ctx: &AppContext) -> Result<(), JsValue> {
    let (Some(form), Some(_)) = (get_element_by_id("booking-form"), get_element_by_id("booking-car-id")) else {
        return Ok(());
    };
    let ctx = ctx.clone();
    on_submit(&form, move || {
        let Some(session) = ctx.store.get_session() else {
            alert(LOGIN_TO_BOOK);
            ctx.go(&Route::Login);
            return;
        };
        let Ok(device_id) = field_value("booking-car-id").trim().parse::<u64>() else {
            alert("Booking failed: no device selected");
            return;
        };
        let booking = NewBooking::new(&session, device_id, &field_value("pickup-date"), &field_value("return-date"));
        let ctx = ctx.clone();
        spawn_local(async move {
            match BookingService::new(ctx.api.clone()).create(&booking).await {
                Ok(_) => {
                    ctx.notifier.notify(NoticeLevel::Success, "Booking successful!");
                    let _ = modal::hide("bookingModal");
                    reset_form("booking-form");
                }
                // el hook de 401 ya limpió la sesión y redirigió
                Err(ApiError::Unauthenticated { .. }) => {}
                Err(e) => alert(&format!("Booking failed: {}", e.user_message())),
            }
        });
    })
}
