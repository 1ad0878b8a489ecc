// ============================================================================
// PRESENTERS - Cómo se ve cada entidad en cada lista
// ============================================================================

use crate::models::booking::format_date;
use crate::models::{Booking, Device, UserAccount};
use crate::utils::constants::DEFAULT_DEVICE_IMAGE;
use crate::utils::format::{or_na, status_label, title_case};
use crate::viewmodels::action_dispatcher::ActionKind;
use crate::viewmodels::list_renderer::{
    Badge, CellValue, EntityCard, EntityRow, ListPresenter, Presented, RankTable, RowAction,
    RowCommand, Tone, BOOKING_RANKS, DEVICE_RANKS, ROLE_RANKS,
};

fn device_image(asset_root: &str, device: &Device) -> String {
    device
        .image_url
        .clone()
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| format!("{}{}", asset_root, DEFAULT_DEVICE_IMAGE))
}

fn device_status_tone(status: &str) -> Tone {
    match status {
        "available" => Tone::Success,
        "in_service" => Tone::Warning,
        _ => Tone::Secondary,
    }
}

pub fn booking_status_tone(status: &str) -> Tone {
    match status {
        "pending" => Tone::Warning,
        "confirmed" => Tone::Info,
        "completed" => Tone::Success,
        "cancelled" => Tone::Danger,
        _ => Tone::Secondary,
    }
}

/// Transiciones que staff puede aplicar desde cada estado de ticket
pub fn next_transitions(status: &str) -> &'static [(&'static str, &'static str, Tone)] {
    match status {
        "pending" => &[("confirmed", "Confirm", Tone::Success), ("cancelled", "Cancel", Tone::Danger)],
        "confirmed" => &[
            ("completed", "Mark Completed", Tone::Success),
            ("cancelled", "Cancel", Tone::Danger),
        ],
        _ => &[],
    }
}

// ============================================================================
// CATÁLOGO PÚBLICO
// ============================================================================

/// Tarjetas del catálogo (index, devices, populares)
pub struct CatalogDevicePresenter {
    pub asset_root: &'static str,
    /// Destacados y populares conservan el orden del servidor
    pub ranked: bool,
}

impl ListPresenter for CatalogDevicePresenter {
    type Entity = Device;

    fn columns(&self) -> &'static [&'static str] {
        &["Device", "Type", "OS", "Status"]
    }

    fn empty_copy(&self) -> &'static str {
        "No devices found matching criteria."
    }

    fn failure_copy(&self) -> &'static str {
        "Failed to load devices. Is the backend running?"
    }

    fn rank_table(&self) -> Option<RankTable> {
        self.ranked.then_some(DEVICE_RANKS)
    }

    fn rank_key<'e>(&self, device: &'e Device) -> &'e str {
        &device.status
    }

    fn present(&self, device: &Device) -> Presented {
        let name = device.display_name();
        let available = device.is_available();
        let status = Badge::new(
            status_label(&device.status),
            if available { Tone::Success } else { Tone::Danger },
        );
        let book = if available {
            RowAction::new(RowCommand::Book, device.device_id, "Book Service", Tone::Primary)
        } else {
            RowAction::new(RowCommand::Book, device.device_id, title_case(&device.status), Tone::Secondary).disabled()
        };
        let actions = vec![
            RowAction::new(RowCommand::View, device.device_id, "Details", Tone::Primary),
            book,
        ];
        let ribbon = device
            .rental_count
            .filter(|count| *count > 0)
            .map(|count| Badge::new(format!("{} Bookings", count), Tone::Warning));

        Presented {
            row: EntityRow {
                cells: vec![
                    CellValue::text(name.clone()),
                    CellValue::text(or_na(device.device_type.as_deref())),
                    CellValue::text(or_na(device.operating_system.as_deref())),
                    CellValue::Badge(status.clone()),
                ],
                actions: actions.clone(),
            },
            card: EntityCard {
                title: name,
                subtitle: None,
                image: Some(device_image(self.asset_root, device)),
                ribbon,
                fields: vec![
                    ("Type".to_string(), CellValue::Badge(Badge::new(or_na(device.device_type.as_deref()), Tone::Secondary))),
                    ("OS".to_string(), CellValue::Badge(Badge::new(or_na(device.operating_system.as_deref()), Tone::Info))),
                    ("Status".to_string(), CellValue::Badge(status)),
                ],
                actions,
            },
        }
    }
}

// ============================================================================
// DISPOSITIVOS (ADMIN / STAFF)
// ============================================================================

pub struct ManagedDevicePresenter {
    pub asset_root: &'static str,
}

impl ListPresenter for ManagedDevicePresenter {
    type Entity = Device;

    fn columns(&self) -> &'static [&'static str] {
        &["ID", "Device", "Serial Number", "Status", "Type", "Actions"]
    }

    fn empty_copy(&self) -> &'static str {
        "No devices found."
    }

    fn failure_copy(&self) -> &'static str {
        "Failed to load devices."
    }

    fn rank_table(&self) -> Option<RankTable> {
        Some(DEVICE_RANKS)
    }

    fn rank_key<'e>(&self, device: &'e Device) -> &'e str {
        &device.status
    }

    fn present(&self, device: &Device) -> Presented {
        let id = device.device_id;
        let name = device.display_name();
        let image = device_image(self.asset_root, device);
        let status = Badge::new(
            or_na(Some(status_label(&device.status).as_str())),
            device_status_tone(&device.status),
        );
        let serial = or_na(device.serial_number.as_deref());
        let device_type = or_na(device.device_type.as_deref());
        let actions = vec![
            RowAction::new(RowCommand::Edit, id, "Edit", Tone::Info),
            RowAction::new(RowCommand::Run(ActionKind::Delete), id, "Delete", Tone::Danger),
        ];

        Presented {
            row: EntityRow {
                cells: vec![
                    CellValue::text(id.to_string()),
                    CellValue::Thumbnail {
                        src: image.clone(),
                        caption: name.clone(),
                    },
                    CellValue::text(serial.clone()),
                    CellValue::Badge(status.clone()),
                    CellValue::text(device_type.clone()),
                ],
                actions: actions.clone(),
            },
            card: EntityCard {
                title: name,
                subtitle: Some(format!("ID: {}", id)),
                image: Some(image),
                ribbon: None,
                fields: vec![
                    ("Serial Number".to_string(), CellValue::text(serial)),
                    ("Device Type".to_string(), CellValue::Badge(Badge::new(device_type, Tone::Info))),
                    ("Status".to_string(), CellValue::Badge(status)),
                ],
                actions,
            },
        }
    }
}

// ============================================================================
// USUARIOS (ADMIN)
// ============================================================================

pub struct UserAccountPresenter {
    /// Cuenta que nunca muestra "Delete"
    pub protected_user_id: u64,
}

impl ListPresenter for UserAccountPresenter {
    type Entity = UserAccount;

    fn columns(&self) -> &'static [&'static str] {
        &["ID", "Username", "Email", "Role", "Verified", "Actions"]
    }

    fn empty_copy(&self) -> &'static str {
        "No users found."
    }

    fn failure_copy(&self) -> &'static str {
        "Failed to load users."
    }

    fn rank_table(&self) -> Option<RankTable> {
        Some(ROLE_RANKS)
    }

    fn rank_key<'e>(&self, account: &'e UserAccount) -> &'e str {
        account.role.as_str()
    }

    fn present(&self, account: &UserAccount) -> Presented {
        let id = account.user_id;
        let email = or_na(account.email.as_deref());
        let verified = if account.is_verified {
            Badge::new("Yes", Tone::Success)
        } else {
            Badge::new("No", Tone::Danger)
        };
        let mut actions = vec![RowAction::new(RowCommand::Edit, id, "Edit", Tone::Info)];
        if id != self.protected_user_id {
            actions.push(RowAction::new(RowCommand::Run(ActionKind::Delete), id, "Delete", Tone::Danger));
        }

        Presented {
            row: EntityRow {
                cells: vec![
                    CellValue::text(id.to_string()),
                    CellValue::text(account.username.clone()),
                    CellValue::text(email.clone()),
                    CellValue::text(account.role.as_str()),
                    CellValue::Badge(verified.clone()),
                ],
                actions: actions.clone(),
            },
            card: EntityCard {
                title: account.username.clone(),
                subtitle: None,
                image: None,
                ribbon: None,
                fields: vec![
                    ("ID".to_string(), CellValue::text(id.to_string())),
                    ("Email".to_string(), CellValue::text(email)),
                    ("Role".to_string(), CellValue::Badge(Badge::new(account.role.as_str(), Tone::Primary))),
                    ("Verified".to_string(), CellValue::Badge(verified)),
                ],
                actions,
            },
        }
    }
}

// ============================================================================
// HISTORIAL DE RESERVAS (ADMIN)
// ============================================================================

/// Sin orden propio: el backend ya filtra y ordena el historial
pub struct BookingHistoryPresenter;

impl BookingHistoryPresenter {
    fn customer(booking: &Booking) -> String {
        let user = booking.user.as_ref();
        let name = user
            .and_then(|u| u.username.as_deref().filter(|s| !s.is_empty()))
            .or_else(|| user.and_then(|u| u.full_name.as_deref()));
        or_na(name)
    }

    fn schedule(booking: &Booking) -> String {
        match (booking.date.as_deref(), booking.time_slot.as_deref()) {
            (Some(date), Some(slot)) if !slot.is_empty() => format!("{} ({})", format_date(date), slot),
            (Some(date), _) => format_date(date),
            (None, _) => "N/A".to_string(),
        }
    }
}

impl ListPresenter for BookingHistoryPresenter {
    type Entity = Booking;

    fn columns(&self) -> &'static [&'static str] {
        &[
            "ID",
            "Customer",
            "Device",
            "Date & Time",
            "Service Type",
            "Payment",
            "Status",
            "Assigned Staff",
            "Actions",
        ]
    }

    fn empty_copy(&self) -> &'static str {
        "No history available."
    }

    fn failure_copy(&self) -> &'static str {
        "Failed to load history."
    }

    fn present(&self, booking: &Booking) -> Presented {
        let id = booking.key();
        let status = booking.effective_status();
        let customer = Self::customer(booking);
        let device = booking.device_name().unwrap_or_else(|| "Deleted Device".to_string());
        let schedule = Self::schedule(booking);
        let service = or_na(booking.service_type.as_deref());
        let payment = Badge::new(
            booking
                .payment_status
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "unpaid".to_string()),
            if booking.is_paid() { Tone::Success } else { Tone::Warning },
        );
        let status_badge = Badge::new(status, booking_status_tone(status));
        let staff = booking.staff_name().unwrap_or("Not assigned").to_string();

        let mut actions = vec![RowAction::new(RowCommand::View, id, "View", Tone::Info)];
        if status != "cancelled" && status != "completed" {
            actions.push(RowAction::new(RowCommand::Run(ActionKind::Cancel), id, "Cancel", Tone::Warning));
        }

        Presented {
            row: EntityRow {
                cells: vec![
                    CellValue::text(id.to_string()),
                    CellValue::text(customer.clone()),
                    CellValue::text(device.clone()),
                    CellValue::text(schedule.clone()),
                    CellValue::text(service.clone()),
                    CellValue::Badge(payment.clone()),
                    CellValue::Badge(status_badge.clone()),
                    CellValue::text(staff.clone()),
                ],
                actions: actions.clone(),
            },
            card: EntityCard {
                title: format!("Booking #{}", id),
                subtitle: None,
                image: None,
                ribbon: None,
                fields: vec![
                    ("Customer".to_string(), CellValue::text(customer)),
                    ("Device".to_string(), CellValue::text(device)),
                    ("Date & Time".to_string(), CellValue::text(schedule)),
                    ("Service Type".to_string(), CellValue::text(service)),
                    ("Payment Status".to_string(), CellValue::Badge(payment)),
                    ("Status".to_string(), CellValue::Badge(status_badge)),
                    ("Assigned Staff".to_string(), CellValue::text(staff)),
                ],
                actions,
            },
        }
    }
}

// ============================================================================
// TICKETS DE REPARACIÓN (STAFF)
// ============================================================================

pub struct RentalPresenter;

impl ListPresenter for RentalPresenter {
    type Entity = Booking;

    fn columns(&self) -> &'static [&'static str] {
        &[
            "ID",
            "User",
            "Device",
            "Drop-off",
            "Time Slot",
            "Service Type",
            "Status",
            "Actions",
        ]
    }

    fn empty_copy(&self) -> &'static str {
        "No repair tickets found."
    }

    fn failure_copy(&self) -> &'static str {
        "Failed to load repair tickets."
    }

    fn rank_table(&self) -> Option<RankTable> {
        Some(BOOKING_RANKS)
    }

    fn rank_key<'e>(&self, booking: &'e Booking) -> &'e str {
        booking.rental_state()
    }

    fn present(&self, rental: &Booking) -> Presented {
        let id = rental.key();
        let ticket = rental.rental_id.unwrap_or(id);
        let status = rental.rental_state();
        let user = rental
            .user
            .as_ref()
            .and_then(|u| u.username.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        let device = rental.device_name().unwrap_or_else(|| "Unknown device".to_string());
        let drop_off = or_na(rental.date_label().as_deref());
        let slot = or_na(rental.time_slot.as_deref());
        let service = or_na(rental.service_type.as_deref());
        let badge = Badge::new(status_label(status), booking_status_tone(status));

        let actions: Vec<RowAction> = next_transitions(status)
            .iter()
            .map(|(target, label, tone)| {
                RowAction::new(
                    RowCommand::Run(ActionKind::Transition(target.to_string())),
                    id,
                    *label,
                    *tone,
                )
            })
            .collect();

        Presented {
            row: EntityRow {
                cells: vec![
                    CellValue::text(ticket.to_string()),
                    CellValue::text(user.clone()),
                    CellValue::text(device.clone()),
                    CellValue::text(drop_off.clone()),
                    CellValue::text(slot.clone()),
                    CellValue::text(service),
                    CellValue::Badge(badge.clone()),
                ],
                actions: actions.clone(),
            },
            card: EntityCard {
                title: format!("Ticket #{}", ticket),
                subtitle: None,
                image: None,
                ribbon: None,
                fields: vec![
                    ("User".to_string(), CellValue::text(user)),
                    ("Device".to_string(), CellValue::text(device)),
                    ("Drop-off".to_string(), CellValue::text(drop_off)),
                    ("Time Slot".to_string(), CellValue::text(slot)),
                    ("Status".to_string(), CellValue::Badge(badge)),
                ],
                actions,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewmodels::list_renderer::{render, CardItem, TableRow};

    fn devices(json: &str) -> Vec<Device> {
        serde_json::from_str(json).unwrap()
    }

    fn row_actions(view: &crate::viewmodels::list_renderer::ListView, index: usize) -> Vec<RowCommand> {
        match &view.table_rows[index] {
            TableRow::Entity(row) => row.actions.iter().map(|a| a.command.clone()).collect(),
            TableRow::Placeholder(_) => Vec::new(),
        }
    }

    #[test]
    fn managed_devices_sort_available_first() {
        let list = devices(
            r#"[{"device_id":1,"make":"HP","model":"X","status":"maintenance"},
                {"device_id":2,"make":"Dell","model":"Y","status":"available"}]"#,
        );
        let view = render(&ManagedDevicePresenter { asset_root: "../" }, list);
        let TableRow::Entity(first) = &view.table_rows[0] else {
            panic!("entity row expected");
        };
        assert_eq!(first.cells[0], CellValue::text("2"));
        assert_eq!(
            first.cells[1],
            CellValue::Thumbnail {
                src: "../images/default-device.svg".to_string(),
                caption: "Dell Y".to_string()
            }
        );
    }

    #[test]
    fn null_status_row_is_shown_as_not_available() {
        let list = devices(r#"[{"device_id":5,"make":"Acme","model":"Z","status":null,"serial_number":null}]"#);
        let view = render(&ManagedDevicePresenter { asset_root: "" }, list);
        let TableRow::Entity(row) = &view.table_rows[0] else {
            panic!("entity row expected");
        };
        assert_eq!(row.cells[2], CellValue::text("N/A"));
        assert_eq!(row.cells[3], CellValue::Badge(Badge::new("N/A", Tone::Secondary)));
    }

    #[test]
    fn unavailable_catalog_device_cannot_be_booked() {
        let list = devices(r#"[{"device_id":3,"make":"Apple","model":"Mac","status":"in_service","rental_count":4}]"#);
        let view = render(&CatalogDevicePresenter { asset_root: "", ranked: true }, list);
        let CardItem::Entity(card) = &view.cards[0] else {
            panic!("entity card expected");
        };
        let book = card.actions.iter().find(|a| a.command == RowCommand::Book).unwrap();
        assert!(!book.enabled);
        assert_eq!(book.label, "In Service");
        assert_eq!(card.ribbon, Some(Badge::new("4 Bookings", Tone::Warning)));
    }

    #[test]
    fn protected_account_has_no_delete() {
        let accounts: Vec<UserAccount> = serde_json::from_str(
            r#"[{"user_id":6,"username":"root","role":"admin"},{"user_id":7,"username":"kim","role":"customer"}]"#,
        )
        .unwrap();
        let view = render(&UserAccountPresenter { protected_user_id: 6 }, accounts);
        assert_eq!(row_actions(&view, 0), vec![RowCommand::Edit]);
        assert_eq!(
            row_actions(&view, 1),
            vec![RowCommand::Edit, RowCommand::Run(ActionKind::Delete)]
        );
    }

    #[test]
    fn finished_bookings_cannot_be_cancelled() {
        let bookings: Vec<Booking> = serde_json::from_str(
            r#"[{"booking_id":1,"status":"completed","date":"2024-05-01","time_slot":"PM"},
                {"booking_id":2,"status":"pending"}]"#,
        )
        .unwrap();
        let view = render(&BookingHistoryPresenter, bookings);
        assert_eq!(row_actions(&view, 0), vec![RowCommand::View]);
        assert_eq!(
            row_actions(&view, 1),
            vec![RowCommand::View, RowCommand::Run(ActionKind::Cancel)]
        );
        let TableRow::Entity(row) = &view.table_rows[0] else {
            panic!("entity row expected");
        };
        assert_eq!(row.cells[2], CellValue::text("Deleted Device"));
        assert_eq!(row.cells[3], CellValue::text("05/01/2024 (PM)"));
        assert_eq!(row.cells[7], CellValue::text("Not assigned"));
    }

    #[test]
    fn rental_actions_follow_the_ticket_state_machine() {
        let rentals: Vec<Booking> = serde_json::from_str(
            r#"[{"rental_id":10,"rental_status":"completed"},
                {"rental_id":11,"rental_status":"confirmed"},
                {"rental_id":12,"rental_status":"pending"}]"#,
        )
        .unwrap();
        let view = render(&RentalPresenter, rentals);
        let transition = |s: &str| RowCommand::Run(ActionKind::Transition(s.to_string()));

        assert_eq!(row_actions(&view, 0), vec![transition("confirmed"), transition("cancelled")]);
        assert_eq!(row_actions(&view, 1), vec![transition("completed"), transition("cancelled")]);
        assert!(row_actions(&view, 2).is_empty());
    }

    #[test]
    fn rental_is_sorted_and_labelled_by_the_same_status() {
        let rentals: Vec<Booking> = serde_json::from_str(
            r#"[{"rental_id":20,"status":"pending","rental_status":"completed"},
                {"rental_id":21,"rental_status":"confirmed"}]"#,
        )
        .unwrap();
        let view = render(&RentalPresenter, rentals);
        let TableRow::Entity(first) = &view.table_rows[0] else {
            panic!("entity row expected");
        };
        assert_eq!(first.cells[0], CellValue::text("21"));
        let TableRow::Entity(second) = &view.table_rows[1] else {
            panic!("entity row expected");
        };
        assert_eq!(second.cells[0], CellValue::text("20"));
        assert_eq!(second.cells[6], CellValue::Badge(Badge::new("completed", Tone::Success)));
        assert!(row_actions(&view, 1).is_empty());
    }
}
