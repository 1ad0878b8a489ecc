// ============================================================================
// ADMIN - Dashboard, dispositivos, usuarios e historial de reservas
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::config::CONFIG;
use crate::dom::{
    field_value, get_element_by_id, on_click, on_submit, reset_form, set_field_value, set_inner_html,
    set_text_by_id,
};
use crate::models::UserAccount;
use crate::services::booking_service::BookingService;
use crate::services::resources::{ResourceForm, ADMIN_DEVICES, ADMIN_USERS, BOOKINGS};
use crate::services::stats_service::{counter_label, StatsService};
use crate::viewmodels::list_query::FilterKey;
use crate::viewmodels::list_renderer::RowCommand;
use crate::viewmodels::presenters::{BookingHistoryPresenter, UserAccountPresenter};
use crate::viewmodels::{Criteria, NoticeLevel};
use crate::views::list_page::{bind_row_actions, MountedList};
use crate::views::list_view::DomListSink;
use crate::views::markup;
use crate::views::modal;
use crate::views::pages::device_manager::{self, DeviceSection};

const USER_MODAL: &str = "userModal";
const USER_FORM: &str = "user-form";
const DETAILS_MODAL: &str = "bookingDetailsModal";

pub fn mount(ctx: &AppContext) -> Result<(), JsValue> {
    if get_element_by_id("total-cars").is_some() {
        load_stats(ctx);
    }
    device_manager::mount(
        ctx,
        DeviceSection {
            descriptor: &ADMIN_DEVICES,
            table: "admin-cars-table",
            cards: "admin-cars-cards",
            search_form: "admin-car-search-form",
            search_input: "admin-search-input",
            status_filter: "admin-status-filter",
            type_filter: "admin-transmission-filter",
            os_filter: "admin-fuel-filter",
        },
    )?;
    mount_users(ctx)?;
    mount_history(ctx)
}

fn load_stats(ctx: &AppContext) {
    let stats = StatsService::new(ctx.api.clone());
    spawn_local(async move {
        let counters = stats.admin().await;
        set_text_by_id("total-cars", &counter_label(counters.total_devices));
        set_text_by_id("total-users", &counter_label(counters.total_users));
        set_text_by_id("total-rentals", &counter_label(counters.active_bookings));
        log::info!("📊 [ADMIN] Contadores: {:?}", counters);
    });
}

// ============================================================================
// USUARIOS
// ============================================================================

fn mount_users(ctx: &AppContext) -> Result<(), JsValue> {
    if get_element_by_id("admin-users-table").is_none() {
        return Ok(());
    }
    let list = MountedList::new(
        ctx,
        UserAccountPresenter {
            protected_user_id: CONFIG.protected_user_id,
        },
        &ADMIN_USERS,
        DomListSink::table("admin-users-table").with_cards("admin-users-cards"),
    );
    list.load(Criteria::new());
    list.bind_search("admin-user-search-form", || {
        Criteria::new()
            .search(&field_value("admin-user-search-input"))
            .filter(FilterKey::Role, &field_value("admin-role-filter"))
            .filter(FilterKey::IsVerified, &field_value("admin-verified-filter"))
    })?;

    {
        let (ctx, list) = (Rc::new(ctx.clone()), list.clone());
        bind_row_actions(&["admin-users-table", "admin-users-cards"], move |command, id| match command {
            RowCommand::Edit => open_user_edit(ctx.clone(), id),
            RowCommand::Run(action) => list.run(action, id),
            other => log::warn!("⚠️ [USERS] {:?} no aplica", other),
        })?;
    }

    if let Some(button) = get_element_by_id("add-user-btn") {
        on_click(&button, |_| {
            reset_form(USER_FORM);
            set_field_value("user_id", "");
            set_text_by_id("userModalTitle", "Add New User");
            let _ = modal::show(USER_MODAL);
        })?;
    }
    modal::bind_dismiss(USER_MODAL)?;

    let Some(form) = get_element_by_id(USER_FORM) else {
        return Ok(());
    };
    let ctx = ctx.clone();
    on_submit(&form, move || {
        let id = field_value("user_id").trim().parse::<u64>().ok();
        let fields = ResourceForm::collect(&ADMIN_USERS, field_value, |_| None);
        let (ctx, list) = (ctx.clone(), list.clone());
        spawn_local(async move {
            let (done, failed) = if id.is_some() { ("updated", "update") } else { ("created", "create") };
            match ctx.resources(&ADMIN_USERS).save(id, fields).await {
                Ok(()) => {
                    let _ = modal::hide(USER_MODAL);
                    list.refresh();
                    ctx.notifier.notify(NoticeLevel::Success, &format!("User {} successfully", done));
                }
                Err(e) => ctx.notifier.notify(
                    NoticeLevel::Error,
                    &format!("Failed to {} user: {}", failed, e.user_message()),
                ),
            }
        });
    })
}

fn open_user_edit(ctx: Rc<AppContext>, id: u64) {
    spawn_local(async move {
        match ctx.resources(&ADMIN_USERS).fetch::<UserAccount>(id).await {
            Ok(user) => {
                set_field_value("user_id", &user.user_id.to_string());
                set_field_value("username", &user.username);
                set_field_value("full_name", user.full_name.as_deref().unwrap_or(""));
                set_field_value("email", user.email.as_deref().unwrap_or(""));
                set_field_value("password", "");
                set_field_value("role", user.role.as_str());
                set_field_value("is_verified", if user.is_verified { "1" } else { "0" });
                set_text_by_id("userModalTitle", "Edit User");
                let _ = modal::show(USER_MODAL);
            }
            Err(e) => ctx.notifier.notify(NoticeLevel::Error, e.user_message()),
        }
    });
}

// ============================================================================
// HISTORIAL
// ============================================================================

fn mount_history(ctx: &AppContext) -> Result<(), JsValue> {
    if get_element_by_id("admin-history-table").is_none() {
        return Ok(());
    }
    let list = MountedList::new(
        ctx,
        BookingHistoryPresenter,
        &BOOKINGS,
        DomListSink::table("admin-history-table").with_cards("admin-history-cards"),
    );
    list.load(Criteria::new());
    list.bind_search("history-search-form", || {
        Criteria::new()
            .search(&field_value("history-search-input"))
            .status(&field_value("history-status-filter"))
            .filter(FilterKey::PaymentStatus, &field_value("history-payment-filter"))
            .filter(FilterKey::Date, &field_value("history-date-filter"))
    })?;

    modal::bind_dismiss(DETAILS_MODAL)?;
    let ctx = Rc::new(ctx.clone());
    bind_row_actions(&["admin-history-table", "admin-history-cards"], move |command, id| match command {
        RowCommand::View => show_booking_details(ctx.clone(), id),
        RowCommand::Run(action) => list.run(action, id),
        other => log::warn!("⚠️ [HISTORY] {:?} no aplica", other),
    })
}

fn show_booking_details(ctx: Rc<AppContext>, id: u64) {
    spawn_local(async move {
        match BookingService::new(ctx.api.clone()).booking(id).await {
            Ok(booking) => {
                if let Some(body) = get_element_by_id("booking-details-body") {
                    set_inner_html(&body, &markup::booking_details(&booking));
                }
                let _ = modal::show(DETAILS_MODAL);
            }
            Err(e) => ctx.notifier.notify(NoticeLevel::Error, e.user_message()),
        }
    });
}
