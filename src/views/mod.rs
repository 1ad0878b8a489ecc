// ============================================================================
// VIEWS - Capa fina DOM: markup puro + regiones + páginas
// ============================================================================

pub mod markup;
pub mod list_view;
pub mod list_page;
pub mod modal;
pub mod navigation;
pub mod notifications;
pub mod pages;
