// ============================================================================
// LIST VIEW - Pinta un ListView en su región del DOM
// ============================================================================

use crate::dom::{get_element_by_id, query_selector, set_inner_html};
use crate::viewmodels::list_controller::ListSink;
use crate::viewmodels::list_renderer::ListView;
use crate::views::markup;

/// Región de lista: tbody de tabla, grid de tarjetas y/o carrusel.
/// Las partes que no existan en la página se ignoran.
#[derive(Debug, Clone, Default)]
pub struct DomListSink {
    tbody_selector: Option<String>,
    cards_id: Option<String>,
    carousel_selector: Option<String>,
}

impl DomListSink {
    pub fn table(table_id: &str) -> Self {
        Self {
            tbody_selector: Some(format!("#{} tbody", table_id)),
            ..Self::default()
        }
    }

    pub fn grid(cards_id: &str) -> Self {
        Self {
            cards_id: Some(cards_id.to_string()),
            ..Self::default()
        }
    }

    pub fn with_cards(mut self, cards_id: &str) -> Self {
        self.cards_id = Some(cards_id.to_string());
        self
    }

    pub fn with_carousel(mut self, carousel_id: &str) -> Self {
        self.carousel_selector = Some(format!("#{} .carousel-inner", carousel_id));
        self
    }
}

impl ListSink for DomListSink {
    fn publish(&self, view: &ListView) {
        if let Some(selector) = &self.tbody_selector {
            match query_selector(selector) {
                Ok(Some(tbody)) => set_inner_html(&tbody, &markup::table_body(view)),
                Ok(None) => log::warn!("⚠️ [VIEW] {} no existe en esta página", selector),
                Err(e) => log::error!("❌ [VIEW] Selector {} inválido: {:?}", selector, e),
            }
        }
        if let Some(container) = self.cards_id.as_deref().and_then(get_element_by_id) {
            set_inner_html(&container, &markup::cards(view));
        }
        if let Some(selector) = &self.carousel_selector {
            if let Ok(Some(inner)) = query_selector(selector) {
                set_inner_html(&inner, &markup::carousel(view));
            }
        }
    }
}
