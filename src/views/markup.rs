// ============================================================================
// MARKUP - ListView → HTML (tabla de escritorio + tarjetas móviles)
// ============================================================================
// Funciones puras: la misma vista produce siempre el mismo HTML. Todo texto
// que viene del servidor pasa por escape_html.
// ============================================================================

use crate::models::Booking;
use crate::utils::format::{escape_html, or_na};
use crate::viewmodels::list_renderer::{
    Badge, CardItem, CellValue, EntityCard, EntityRow, ListView, Notice, NoticeKind, RowAction,
    TableRow, Tone,
};
use crate::viewmodels::presenters::booking_status_tone;

fn badge(badge: &Badge) -> String {
    format!(
        "<span class=\"badge bg-{}\">{}</span>",
        badge.tone.as_str(),
        escape_html(&badge.label)
    )
}

fn cell(value: &CellValue) -> String {
    match value {
        CellValue::Text(text) => escape_html(text),
        CellValue::Badge(b) => badge(b),
        CellValue::Thumbnail { src, caption } => format!(
            "<div class=\"d-flex align-items-center\"><img src=\"{}\" class=\"rounded me-2\" width=\"40\" height=\"40\" alt=\"\"><span>{}</span></div>",
            escape_html(src),
            escape_html(caption)
        ),
    }
}

fn action_button(action: &RowAction) -> String {
    let disabled = if action.enabled { "" } else { " disabled" };
    format!(
        "<button type=\"button\" class=\"btn btn-sm btn-{} me-1\" data-action=\"{}\" data-id=\"{}\"{}>{}</button>",
        action.tone.as_str(),
        escape_html(&action.command.encode()),
        action.entity_id,
        disabled,
        escape_html(&action.label)
    )
}

fn actions(actions: &[RowAction]) -> String {
    actions.iter().map(action_button).collect()
}

fn notice_body(notice: &Notice) -> String {
    match notice.kind {
        NoticeKind::Loading => format!(
            "<div class=\"spinner-border spinner-border-sm me-2\" role=\"status\"></div>{}",
            escape_html(&notice.message)
        ),
        NoticeKind::Error => format!("<span class=\"text-danger\">{}</span>", escape_html(&notice.message)),
        NoticeKind::Empty => escape_html(&notice.message),
    }
}

fn table_row(row: &EntityRow) -> String {
    let mut html = String::from("<tr>");
    for value in &row.cells {
        html.push_str("<td>");
        html.push_str(&cell(value));
        html.push_str("</td>");
    }
    if !row.actions.is_empty() {
        html.push_str("<td>");
        html.push_str(&actions(&row.actions));
        html.push_str("</td>");
    }
    html.push_str("</tr>");
    html
}

/// Contenido del `<tbody>`
pub fn table_body(view: &ListView) -> String {
    view.table_rows
        .iter()
        .map(|row| match row {
            TableRow::Entity(row) => table_row(row),
            TableRow::Placeholder(notice) => format!(
                "<tr><td colspan=\"{}\" class=\"text-center text-muted py-4\">{}</td></tr>",
                view.column_count.max(1),
                notice_body(notice)
            ),
        })
        .collect()
}

fn entity_card(card: &EntityCard) -> String {
    let mut html = String::from("<div class=\"col\"><div class=\"card h-100 shadow-sm\">");

    if let Some(image) = &card.image {
        html.push_str("<div class=\"position-relative\">");
        html.push_str(&format!(
            "<img src=\"{}\" class=\"card-img-top\" alt=\"{}\">",
            escape_html(image),
            escape_html(&card.title)
        ));
        if let Some(ribbon) = &card.ribbon {
            html.push_str(&format!(
                "<span class=\"position-absolute top-0 end-0 m-2 badge bg-{}\">{}</span>",
                ribbon.tone.as_str(),
                escape_html(&ribbon.label)
            ));
        }
        html.push_str("</div>");
    }

    html.push_str("<div class=\"card-body\">");
    html.push_str(&format!("<h5 class=\"card-title\">{}</h5>", escape_html(&card.title)));
    if let Some(subtitle) = &card.subtitle {
        html.push_str(&format!(
            "<h6 class=\"card-subtitle mb-2 text-muted\">{}</h6>",
            escape_html(subtitle)
        ));
    }
    for (label, value) in &card.fields {
        html.push_str(&format!(
            "<div class=\"small mb-1\"><strong>{}:</strong> {}</div>",
            escape_html(label),
            cell(value)
        ));
    }
    html.push_str("</div>");

    if !card.actions.is_empty() {
        html.push_str("<div class=\"card-footer bg-transparent\">");
        html.push_str(&actions(&card.actions));
        html.push_str("</div>");
    }
    html.push_str("</div></div>");
    html
}

/// Contenido del contenedor de tarjetas
pub fn cards(view: &ListView) -> String {
    view.cards
        .iter()
        .map(|item| match item {
            CardItem::Entity(card) => entity_card(card),
            CardItem::Placeholder(notice) => format!(
                "<div class=\"col-12 text-center text-muted py-4\">{}</div>",
                notice_body(notice)
            ),
        })
        .collect()
}

/// Misma lista como slides de carrusel (el primero activo)
pub fn carousel(view: &ListView) -> String {
    view.cards
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let active = if index == 0 { " active" } else { "" };
            let body = match item {
                CardItem::Entity(card) => entity_card(card),
                CardItem::Placeholder(notice) => {
                    format!("<div class=\"text-center p-4\">{}</div>", notice_body(notice))
                }
            };
            format!("<div class=\"carousel-item{}\">{}</div>", active, body)
        })
        .collect()
}

/// Ficha completa de una reserva (modal de detalles del historial)
pub fn booking_details(booking: &Booking) -> String {
    let status = booking.effective_status();
    let user = booking.user.clone().unwrap_or_default();
    let device = booking.device.clone().unwrap_or_default();
    let schedule = match (booking.date_label(), booking.time_slot.as_deref()) {
        (Some(date), Some(slot)) if !slot.is_empty() => format!("{} at {}", date, slot),
        (Some(date), _) => date,
        (None, _) => "N/A".to_string(),
    };
    let payment = Badge::new(
        booking
            .payment_status
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "unpaid".to_string()),
        if booking.is_paid() { Tone::Success } else { Tone::Warning },
    );

    let fields: Vec<(&str, String)> = vec![
        ("Booking ID", booking.key().to_string()),
        ("Status", badge(&Badge::new(status, booking_status_tone(status)))),
        (
            "Customer",
            format!(
                "{}<br><small class=\"text-muted\">{}</small>",
                escape_html(&or_na(booking.customer_name())),
                escape_html(user.email.as_deref().unwrap_or(""))
            ),
        ),
        ("Assigned Staff", escape_html(booking.staff_name().unwrap_or("Not assigned"))),
        (
            "Device",
            format!(
                "{}<br><small class=\"text-muted\">Serial: {}</small>",
                escape_html(&or_na(booking.device_name().as_deref())),
                escape_html(&or_na(device.serial_number.as_deref()))
            ),
        ),
        ("Device Type", escape_html(&or_na(device.device_type.as_deref()))),
        ("OS", escape_html(&or_na(device.operating_system.as_deref()))),
        ("Description of Issue", escape_html(&or_na(device.description_of_issue.as_deref()))),
        ("Date & Time", escape_html(&schedule)),
        ("Service Type", escape_html(&or_na(booking.service_type.as_deref()))),
        ("Payment Status", badge(&payment)),
        ("Payment Method", escape_html(&or_na(booking.payment_method.as_deref()))),
        ("Created", escape_html(&or_na(booking.created_at.as_deref()))),
        ("Last Updated", escape_html(&or_na(booking.updated_at.as_deref()))),
    ];

    let mut html = String::from("<div class=\"row\">");
    for (label, value) in fields {
        html.push_str(&format!(
            "<div class=\"col-md-6 mb-3\"><strong>{}:</strong> {}</div>",
            label, value
        ));
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewmodels::list_renderer::RowCommand;
    use crate::viewmodels::ActionKind;

    fn sample() -> ListView {
        ListView {
            column_count: 3,
            table_rows: vec![TableRow::Entity(EntityRow {
                cells: vec![
                    CellValue::text("<b>iPhone</b>"),
                    CellValue::Badge(Badge::new("available", Tone::Success)),
                ],
                actions: vec![RowAction::new(RowCommand::Run(ActionKind::Delete), 7, "Delete", Tone::Danger)],
            })],
            cards: vec![CardItem::Entity(EntityCard {
                title: "<b>iPhone</b>".to_string(),
                subtitle: None,
                image: Some("images/a.png".to_string()),
                ribbon: Some(Badge::new("2 Bookings", Tone::Warning)),
                fields: vec![("Status".to_string(), CellValue::Badge(Badge::new("available", Tone::Success)))],
                actions: vec![RowAction::new(RowCommand::Book, 7, "Book Service", Tone::Primary).disabled()],
            })],
        }
    }

    #[test]
    fn same_view_renders_identical_markup() {
        let view = sample();
        assert_eq!(table_body(&view), table_body(&view.clone()));
        assert_eq!(cards(&view), cards(&view.clone()));
    }

    #[test]
    fn server_text_is_escaped_and_actions_carry_ids() {
        let html = table_body(&sample());
        assert!(html.contains("&lt;b&gt;iPhone&lt;/b&gt;"));
        assert!(!html.contains("<b>iPhone"));
        assert!(html.contains("data-action=\"delete\" data-id=\"7\""));
        assert!(html.contains("badge bg-success"));

        let html = cards(&sample());
        assert!(html.contains("2 Bookings"));
        assert!(html.contains("data-action=\"book\" data-id=\"7\" disabled"));
    }

    #[test]
    fn placeholder_spans_every_column() {
        let view = ListView::placeholder(9, "No history available.");
        assert_eq!(
            table_body(&view),
            "<tr><td colspan=\"9\" class=\"text-center text-muted py-4\">No history available.</td></tr>"
        );
        assert!(cards(&view).contains("No history available."));
    }

    #[test]
    fn only_first_carousel_slide_is_active() {
        let mut view = sample();
        view.cards.push(view.cards[0].clone());
        let html = carousel(&view);
        assert_eq!(html.matches("carousel-item active").count(), 1);
        assert_eq!(html.matches("class=\"carousel-item").count(), 2);
    }

    #[test]
    fn booking_details_tolerate_missing_relations() {
        let booking: Booking =
            serde_json::from_str(r#"{"booking_id":12,"status":"confirmed","date":"2026-05-01","time_slot":"PM"}"#)
                .unwrap();
        let html = booking_details(&booking);
        assert!(html.contains("<strong>Booking ID:</strong> 12"));
        assert!(html.contains("05/01/2026 at PM"));
        assert!(html.contains("Not assigned"));
        assert!(html.contains("badge bg-warning\">unpaid"));
    }

    #[test]
    fn failed_view_is_marked_as_error() {
        let view = ListView::failed(4, "Failed to load devices.");
        assert!(table_body(&view).contains("text-danger"));
        assert!(table_body(&ListView::loading(4)).contains("spinner-border"));
    }
}
