// ============================================================================
// LIST QUERY - Criterios de búsqueda → query string
// ============================================================================

use std::collections::BTreeMap;

/// Filtros secundarios admitidos. El orden de declaración es el orden en la URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey {
    DeviceType,
    OperatingSystem,
    Role,
    IsVerified,
    PaymentStatus,
    Date,
}

impl FilterKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::DeviceType => "device_type",
            FilterKey::OperatingSystem => "operating_system",
            FilterKey::Role => "role",
            FilterKey::IsVerified => "is_verified",
            FilterKey::PaymentStatus => "payment_status",
            FilterKey::Date => "date",
        }
    }
}

/// Qué hacer cuando no hay estado seleccionado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Listas de dispositivos: sin estado se pide `all=true`
    ShowAllWhenAbsent,
    /// Usuarios, reservas, tickets: sin estado no se envía nada
    OmitWhenAbsent,
}

/// Snapshot inmutable de un formulario de búsqueda. Los valores se guardan ya
/// recortados; vacíos y la opción "all" del catálogo cuentan como ausentes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    search: Option<String>,
    status: Option<String>,
    filters: BTreeMap<FilterKey, String>,
}

fn clean(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, value: &str) -> Self {
        self.search = clean(value);
        self
    }

    pub fn status(mut self, value: &str) -> Self {
        self.status = clean(value).filter(|status| !status.eq_ignore_ascii_case("all"));
        self
    }

    pub fn filter(mut self, key: FilterKey, value: &str) -> Self {
        match clean(value) {
            Some(value) => {
                self.filters.insert(key, value);
            }
            None => {
                self.filters.remove(&key);
            }
        }
        self
    }

    pub fn search_value(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn status_value(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn filter_value(&self, key: FilterKey) -> Option<&str> {
        self.filters.get(&key).map(String::as_str)
    }

    /// ¿Hay algún filtro puesto por el usuario? (re-búsqueda → spinner)
    pub fn is_filtered(&self) -> bool {
        self.search.is_some() || self.status.is_some() || !self.filters.is_empty()
    }
}

/// Serializa los criterios (sin `?` inicial). Orden fijo: `status` o `all`,
/// `search` y luego los filtros en orden de declaración.
pub fn build_query(criteria: &Criteria, policy: StatusPolicy) -> String {
    let mut pairs: Vec<(&str, &str)> = Vec::new();

    match (criteria.status_value(), policy) {
        (Some(status), _) => pairs.push(("status", status)),
        (None, StatusPolicy::ShowAllWhenAbsent) => pairs.push(("all", "true")),
        (None, StatusPolicy::OmitWhenAbsent) => {}
    }
    if let Some(search) = criteria.search_value() {
        pairs.push(("search", search));
    }
    for (key, value) in &criteria.filters {
        pairs.push((key.as_str(), value));
    }

    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// `path` + `?query` si la query no está vacía; si el path ya trae sus
/// propios parámetros se añaden con `&`
pub fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else if path.contains('?') {
        format!("{}&{}", path, query)
    } else {
        format!("{}?{}", path, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_omitted() {
        let criteria = Criteria::new()
            .search("   ")
            .status("")
            .filter(FilterKey::DeviceType, " ");
        assert_eq!(build_query(&criteria, StatusPolicy::OmitWhenAbsent), "");
        assert!(!criteria.is_filtered());
    }

    #[test]
    fn missing_status_asks_for_all_and_never_both() {
        let criteria = Criteria::new().search("dell");
        let query = build_query(&criteria, StatusPolicy::ShowAllWhenAbsent);
        assert_eq!(query, "all=true&search=dell");
        assert!(!query.contains("status="));

        let with_status = Criteria::new().status("in_service").search("dell");
        let query = build_query(&with_status, StatusPolicy::ShowAllWhenAbsent);
        assert_eq!(query, "status=in_service&search=dell");
        assert!(!query.contains("all="));
    }

    #[test]
    fn all_option_counts_as_no_status() {
        let criteria = Criteria::new().status("all");
        assert_eq!(build_query(&criteria, StatusPolicy::ShowAllWhenAbsent), "all=true");
        assert_eq!(build_query(&criteria, StatusPolicy::OmitWhenAbsent), "");
    }

    #[test]
    fn order_is_fixed_and_values_are_encoded() {
        let criteria = Criteria::new()
            .filter(FilterKey::Date, "2024-05-01")
            .filter(FilterKey::PaymentStatus, "paid")
            .search("  mac book & co ")
            .status("pending");
        let query = build_query(&criteria, StatusPolicy::OmitWhenAbsent);
        assert_eq!(
            query,
            "status=pending&search=mac%20book%20%26%20co&payment_status=paid&date=2024-05-01"
        );
        assert_eq!(query, build_query(&criteria.clone(), StatusPolicy::OmitWhenAbsent));
    }

    #[test]
    fn with_query_skips_empty_query() {
        assert_eq!(with_query("admin/users", ""), "admin/users");
        assert_eq!(with_query("devices", "all=true"), "devices?all=true");
        assert_eq!(
            with_query("devices/popular?limit=3", "search=dell"),
            "devices/popular?limit=3&search=dell"
        );
    }
}
