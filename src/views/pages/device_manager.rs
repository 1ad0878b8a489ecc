// ============================================================================
// DEVICE MANAGER - Tabla de dispositivos con alta/edición/borrado
// ============================================================================
// Mismo flujo para admin y staff; cambian IDs del DOM y la ruta de escritura.
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::dom::{
    field_value, get_element_by_id, on_click, on_submit, reset_form, selected_file, set_field_value,
    set_inner_html, set_text_by_id,
};
use crate::models::Device;
use crate::services::resources::{ResourceDescriptor, ResourceForm};
use crate::utils::constants::DEFAULT_DEVICE_IMAGE;
use crate::utils::format::escape_html;
use crate::viewmodels::list_query::FilterKey;
use crate::viewmodels::list_renderer::RowCommand;
use crate::viewmodels::presenters::ManagedDevicePresenter;
use crate::viewmodels::{Criteria, NoticeLevel};
use crate::views::list_page::{bind_row_actions, MountedList};
use crate::views::list_view::DomListSink;
use crate::views::modal;

const MODAL: &str = "carModal";
const FORM: &str = "add-car-form";

/// IDs del DOM de una sección de dispositivos
pub struct DeviceSection {
    pub descriptor: &'static ResourceDescriptor,
    pub table: &'static str,
    pub cards: &'static str,
    pub search_form: &'static str,
    pub search_input: &'static str,
    pub status_filter: &'static str,
    pub type_filter: &'static str,
    pub os_filter: &'static str,
}

pub fn mount(ctx: &AppContext, section: DeviceSection) -> Result<(), JsValue> {
    if get_element_by_id(section.table).is_none() {
        return Ok(());
    }
    let list = MountedList::new(
        ctx,
        ManagedDevicePresenter {
            asset_root: ctx.page.asset_root(),
        },
        section.descriptor,
        DomListSink::table(section.table).with_cards(section.cards),
    );
    list.load(Criteria::new());

    let DeviceSection {
        search_input,
        status_filter,
        type_filter,
        os_filter,
        ..
    } = section;
    list.bind_search(section.search_form, move || {
        Criteria::new()
            .search(&field_value(search_input))
            .status(&field_value(status_filter))
            .filter(FilterKey::DeviceType, &field_value(type_filter))
            .filter(FilterKey::OperatingSystem, &field_value(os_filter))
    })?;

    {
        let (ctx, list) = (Rc::new(ctx.clone()), list.clone());
        bind_row_actions(&[section.table, section.cards], move |command, id| match command {
            RowCommand::Edit => open_edit(ctx.clone(), list.clone(), id),
            RowCommand::Run(action) => list.run(action, id),
            other => log::warn!("⚠️ [DEVICES] {:?} no aplica", other),
        })?;
    }

    if let Some(button) = get_element_by_id("add-car-btn") {
        on_click(&button, |_| open_create())?;
    }
    modal::bind_dismiss(MODAL)?;
    bind_save(ctx, list)
}

fn preview(src: &str) {
    if let Some(container) = get_element_by_id("current-image-preview") {
        set_inner_html(
            &container,
            &format!("<img src=\"{}\" style=\"max-height: 100px;\">", escape_html(src)),
        );
    }
}

fn open_create() {
    reset_form(FORM);
    set_field_value("car_id", "");
    if let Some(container) = get_element_by_id("current-image-preview") {
        set_inner_html(&container, "");
    }
    set_text_by_id("modalTitle", "Add New Device");
    let _ = modal::show(MODAL);
}

fn open_edit(ctx: Rc<AppContext>, list: MountedList<ManagedDevicePresenter>, id: u64) {
    spawn_local(async move {
        let resources = ctx.resources(list.descriptor);
        match resources.fetch::<Device>(id).await {
            Ok(device) => {
                set_field_value("car_id", &device.device_id.to_string());
                set_field_value("make", &device.make);
                set_field_value("model", &device.model);
                set_field_value("serial_number", device.serial_number.as_deref().unwrap_or(""));
                set_field_value("device_type", device.device_type.as_deref().unwrap_or(""));
                set_field_value("operating_system", device.operating_system.as_deref().unwrap_or(""));
                set_field_value("description_of_issue", device.description_of_issue.as_deref().unwrap_or(""));
                set_field_value("status", &device.status);
                set_field_value("user_id", &device.user_id.map(|u| u.to_string()).unwrap_or_default());
                let image = device
                    .image_url
                    .clone()
                    .filter(|url| !url.is_empty())
                    .unwrap_or_else(|| format!("{}{}", ctx.page.asset_root(), DEFAULT_DEVICE_IMAGE));
                preview(&image);
                set_text_by_id("modalTitle", "Edit Device");
                let _ = modal::show(MODAL);
            }
            Err(e) => ctx.notifier.notify(NoticeLevel::Error, e.user_message()),
        }
    });
}

fn bind_save(ctx: &AppContext, list: MountedList<ManagedDevicePresenter>) -> Result<(), JsValue> {
    let Some(form) = get_element_by_id(FORM) else {
        return Ok(());
    };
    let ctx = ctx.clone();
    on_submit(&form, move || {
        let id = field_value("car_id").trim().parse::<u64>().ok();
        let fields = ResourceForm::collect(list.descriptor, field_value, selected_file);
        let (ctx, list) = (ctx.clone(), list.clone());
        spawn_local(async move {
            let verb = if id.is_some() { "updated" } else { "created" };
            match ctx.resources(list.descriptor).save(id, fields).await {
                Ok(()) => {
                    let _ = modal::hide(MODAL);
                    list.refresh();
                    ctx.notifier.notify(NoticeLevel::Success, &format!("Device {} successfully", verb));
                }
                Err(e) => {
                    let action = if id.is_some() { "update" } else { "create" };
                    ctx.notifier.notify(
                        NoticeLevel::Error,
                        &format!("Failed to {} device: {}", action, e.user_message()),
                    );
                }
            }
        });
    })
}
