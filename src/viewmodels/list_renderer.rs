// ============================================================================
// LIST RENDERER - Entidades → filas de tabla + tarjetas móviles
// ============================================================================
// Transformación pura: ordena por tabla de rangos (estable) y deriva fila y
// tarjeta de cada entidad en una sola pasada. El markup vive en views/.
// ============================================================================

use serde::de::DeserializeOwned;

use crate::utils::constants::UNRANKED;
use crate::viewmodels::action_dispatcher::ActionKind;

/// Orden de prioridad por estado/rol; lo que no esté en la tabla va al final
#[derive(Debug, Clone, Copy)]
pub struct RankTable {
    entries: &'static [(&'static str, u32)],
}

impl RankTable {
    pub const fn new(entries: &'static [(&'static str, u32)]) -> Self {
        Self { entries }
    }

    pub fn rank(&self, key: &str) -> u32 {
        self.entries
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, rank)| *rank)
            .unwrap_or(UNRANKED)
    }
}

pub const DEVICE_RANKS: RankTable =
    RankTable::new(&[("available", 1), ("in_service", 2), ("maintenance", 3)]);
pub const ROLE_RANKS: RankTable = RankTable::new(&[("admin", 1), ("staff", 2), ("customer", 3)]);
pub const BOOKING_RANKS: RankTable = RankTable::new(&[
    ("pending", 1),
    ("confirmed", 2),
    ("completed", 3),
    ("cancelled", 4),
]);

/// Color de badge/botón (sufijo de clase bootstrap)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Primary,
    Secondary,
    Success,
    Info,
    Warning,
    Danger,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Primary => "primary",
            Tone::Secondary => "secondary",
            Tone::Success => "success",
            Tone::Info => "info",
            Tone::Warning => "warning",
            Tone::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub tone: Tone,
}

impl Badge {
    pub fn new(label: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.into(),
            tone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Badge(Badge),
    /// Miniatura + texto (columna de dispositivo)
    Thumbnail { src: String, caption: String },
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }
}

/// Qué hace un botón de fila
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowCommand {
    Edit,
    View,
    Book,
    Run(ActionKind),
}

impl RowCommand {
    /// Valor del atributo `data-action`
    pub fn encode(&self) -> String {
        match self {
            RowCommand::Edit => "edit".to_string(),
            RowCommand::View => "view".to_string(),
            RowCommand::Book => "book".to_string(),
            RowCommand::Run(ActionKind::Delete) => "delete".to_string(),
            RowCommand::Run(ActionKind::Cancel) => "cancel".to_string(),
            RowCommand::Run(ActionKind::Transition(status)) => format!("transition:{}", status),
        }
    }

    pub fn decode(value: &str) -> Option<Self> {
        match value {
            "edit" => Some(RowCommand::Edit),
            "view" => Some(RowCommand::View),
            "book" => Some(RowCommand::Book),
            "delete" => Some(RowCommand::Run(ActionKind::Delete)),
            "cancel" => Some(RowCommand::Run(ActionKind::Cancel)),
            other => other
                .strip_prefix("transition:")
                .filter(|status| !status.is_empty())
                .map(|status| RowCommand::Run(ActionKind::Transition(status.to_string()))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAction {
    pub command: RowCommand,
    pub entity_id: u64,
    pub label: String,
    pub tone: Tone,
    pub enabled: bool,
}

impl RowAction {
    pub fn new(command: RowCommand, entity_id: u64, label: impl Into<String>, tone: Tone) -> Self {
        Self {
            command,
            entity_id,
            label: label.into(),
            tone,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRow {
    pub cells: Vec<CellValue>,
    pub actions: Vec<RowAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityCard {
    pub title: String,
    pub subtitle: Option<String>,
    pub image: Option<String>,
    /// Badge superpuesto a la imagen (p. ej. "3 Bookings")
    pub ribbon: Option<Badge>,
    pub fields: Vec<(String, CellValue)>,
    pub actions: Vec<RowAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Empty,
    Error,
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRow {
    Entity(EntityRow),
    Placeholder(Notice),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardItem {
    Entity(EntityCard),
    Placeholder(Notice),
}

/// Lo que pinta una región de lista: tabla de escritorio + tarjetas móviles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub column_count: usize,
    pub table_rows: Vec<TableRow>,
    pub cards: Vec<CardItem>,
}

impl ListView {
    fn notice(column_count: usize, kind: NoticeKind, message: &str) -> Self {
        let notice = Notice {
            kind,
            message: message.to_string(),
        };
        Self {
            column_count,
            table_rows: vec![TableRow::Placeholder(notice.clone())],
            cards: vec![CardItem::Placeholder(notice)],
        }
    }

    /// Sin resultados
    pub fn placeholder(column_count: usize, message: &str) -> Self {
        Self::notice(column_count, NoticeKind::Empty, message)
    }

    /// La carga falló; solo esta región queda degradada
    pub fn failed(column_count: usize, message: &str) -> Self {
        Self::notice(column_count, NoticeKind::Error, message)
    }

    pub fn loading(column_count: usize) -> Self {
        Self::notice(column_count, NoticeKind::Loading, "Loading...")
    }

    pub fn entity_count(&self) -> usize {
        self.table_rows
            .iter()
            .filter(|row| matches!(row, TableRow::Entity(_)))
            .count()
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.table_rows.as_slice(), [TableRow::Placeholder(_)])
    }
}

/// Fila + tarjeta derivadas de una entidad
pub struct Presented {
    pub row: EntityRow,
    pub card: EntityCard,
}

/// Cómo se presenta un tipo de entidad en una lista concreta
pub trait ListPresenter {
    type Entity: DeserializeOwned + Clone + 'static;

    fn columns(&self) -> &'static [&'static str];
    fn empty_copy(&self) -> &'static str;
    fn failure_copy(&self) -> &'static str;

    /// `None` = se respeta el orden del servidor
    fn rank_table(&self) -> Option<RankTable> {
        None
    }

    fn rank_key<'e>(&self, _entity: &'e Self::Entity) -> &'e str {
        ""
    }

    fn present(&self, entity: &Self::Entity) -> Presented;
}

/// Ordena (estable) y deriva la vista completa
pub fn render<P: ListPresenter>(presenter: &P, mut entities: Vec<P::Entity>) -> ListView {
    let column_count = presenter.columns().len();
    if entities.is_empty() {
        return ListView::placeholder(column_count, presenter.empty_copy());
    }

    if let Some(table) = presenter.rank_table() {
        entities.sort_by_key(|entity| table.rank(presenter.rank_key(entity)));
    }

    let (table_rows, cards) = entities
        .iter()
        .map(|entity| presenter.present(entity))
        .map(|presented| (TableRow::Entity(presented.row), CardItem::Entity(presented.card)))
        .unzip();

    ListView {
        column_count,
        table_rows,
        cards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, serde::Deserialize)]
    struct Item {
        id: u64,
        status: String,
    }

    struct ItemPresenter;

    impl ListPresenter for ItemPresenter {
        type Entity = Item;

        fn columns(&self) -> &'static [&'static str] {
            &["ID", "Status"]
        }
        fn empty_copy(&self) -> &'static str {
            "No items found."
        }
        fn failure_copy(&self) -> &'static str {
            "Failed to load items."
        }
        fn rank_table(&self) -> Option<RankTable> {
            Some(DEVICE_RANKS)
        }
        fn rank_key<'e>(&self, entity: &'e Item) -> &'e str {
            &entity.status
        }
        fn present(&self, item: &Item) -> Presented {
            let label = item.status.replace('_', " ");
            Presented {
                row: EntityRow {
                    cells: vec![CellValue::text(item.id.to_string()), CellValue::text(label.clone())],
                    actions: Vec::new(),
                },
                card: EntityCard {
                    title: format!("#{}", item.id),
                    subtitle: None,
                    image: None,
                    ribbon: None,
                    fields: vec![("Status".to_string(), CellValue::text(label))],
                    actions: Vec::new(),
                },
            }
        }
    }

    fn item(id: u64, status: &str) -> Item {
        Item {
            id,
            status: status.to_string(),
        }
    }

    fn ids(view: &ListView) -> Vec<String> {
        view.table_rows
            .iter()
            .filter_map(|row| match row {
                TableRow::Entity(row) => match &row.cells[0] {
                    CellValue::Text(id) => Some(id.clone()),
                    _ => None,
                },
                TableRow::Placeholder(_) => None,
            })
            .collect()
    }

    #[test]
    fn ranks_are_stable_and_unknowns_go_last() {
        let items = vec![
            item(1, "maintenance"),
            item(2, "retired"),
            item(3, "available"),
            item(4, "in_service"),
            item(5, "available"),
            item(6, "lost"),
        ];
        let view = render(&ItemPresenter, items);
        assert_eq!(ids(&view), vec!["3", "5", "4", "1", "2", "6"]);
    }

    #[test]
    fn rows_and_cards_share_derived_labels() {
        let view = render(&ItemPresenter, vec![item(9, "in_service")]);
        let TableRow::Entity(row) = &view.table_rows[0] else {
            panic!("entity row expected");
        };
        let CardItem::Entity(card) = &view.cards[0] else {
            panic!("entity card expected");
        };
        assert_eq!(row.cells[1], CellValue::text("in service"));
        assert_eq!(card.fields[0].1, row.cells[1]);
    }

    #[test]
    fn empty_result_yields_one_placeholder_per_view() {
        let view = render(&ItemPresenter, Vec::new());
        assert_eq!(view.table_rows.len(), 1);
        assert_eq!(view.cards.len(), 1);
        assert!(view.is_placeholder());
        assert!(matches!(&view.cards[0], CardItem::Placeholder(n) if n.message == "No items found."));
    }

    #[test]
    fn row_commands_survive_the_data_attribute() {
        let commands = [
            RowCommand::Edit,
            RowCommand::Run(ActionKind::Delete),
            RowCommand::Run(ActionKind::Transition("completed".to_string())),
        ];
        for command in commands {
            assert_eq!(RowCommand::decode(&command.encode()), Some(command));
        }
        assert_eq!(RowCommand::decode("transition:"), None);
    }
}
