// ============================================================================
// STAFF - Dashboard, tickets de reparación y dispositivos
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::dom::{field_value, get_element_by_id, set_text_by_id};
use crate::services::resources::{STAFF_DEVICES, STAFF_RENTALS};
use crate::services::stats_service::{counter_label, StatsService};
use crate::viewmodels::list_renderer::RowCommand;
use crate::viewmodels::presenters::RentalPresenter;
use crate::viewmodels::Criteria;
use crate::views::list_page::{bind_row_actions, MountedList};
use crate::views::list_view::DomListSink;
use crate::views::pages::device_manager::{self, DeviceSection};

pub fn mount(ctx: &AppContext) -> Result<(), JsValue> {
    if get_element_by_id("pending-rentals").is_some() {
        let stats = StatsService::new(ctx.api.clone());
        spawn_local(async move {
            let counters = stats.staff().await;
            set_text_by_id("available-cars", &counter_label(counters.available_devices));
            set_text_by_id("pending-rentals", &counter_label(counters.pending_rentals));
            log::info!("📊 [STAFF] Contadores: {:?}", counters);
        });
    }
    mount_rentals(ctx)?;
    device_manager::mount(
        ctx,
        DeviceSection {
            descriptor: &STAFF_DEVICES,
            table: "staff-cars-table",
            cards: "staff-cars-cards",
            search_form: "staff-car-search-form",
            search_input: "staff-search-input",
            status_filter: "staff-status-filter",
            type_filter: "staff-device-type-filter",
            os_filter: "staff-os-filter",
        },
    )
}

fn mount_rentals(ctx: &AppContext) -> Result<(), JsValue> {
    if get_element_by_id("staff-rentals-table").is_none() {
        return Ok(());
    }
    let list = MountedList::new(
        ctx,
        RentalPresenter,
        &STAFF_RENTALS,
        DomListSink::table("staff-rentals-table").with_cards("staff-rentals-cards"),
    );
    list.load(Criteria::new());
    list.bind_search("staff-rental-search-form", || {
        Criteria::new()
            .search(&field_value("staff-rental-search-input"))
            .status(&field_value("staff-rental-status-filter"))
    })?;

    bind_row_actions(&["staff-rentals-table", "staff-rentals-cards"], move |command, id| match command {
        RowCommand::Run(action) => list.run(action, id),
        other => log::warn!("⚠️ [RENTALS] {:?} no aplica", other),
    })
}
