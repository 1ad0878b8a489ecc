// ============================================================================
// LIST CONTROLLER - Carga de listas con secuencia de requests
// ============================================================================
// Cada carga toma un ticket; una respuesta solo se pinta si su ticket sigue
// siendo el último emitido. Una respuesta vieja que llega tarde se descarta.
// ============================================================================

use async_trait::async_trait;
use std::rc::Rc;

use crate::services::resources::ResourceService;
use crate::state::list_state::ListState;
use crate::viewmodels::action_dispatcher::Refresh;
use crate::viewmodels::list_query::Criteria;
use crate::viewmodels::list_renderer::{render, ListPresenter, ListView};

/// Destino de una vista de lista (la región del DOM)
pub trait ListSink {
    fn publish(&self, view: &ListView);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// Llegó después de una carga más nueva
    Stale,
}

pub struct ListController<P: ListPresenter> {
    presenter: Rc<P>,
    resources: ResourceService,
    state: ListState,
    limit: Option<usize>,
}

impl<P: ListPresenter> Clone for ListController<P> {
    fn clone(&self) -> Self {
        Self {
            presenter: self.presenter.clone(),
            resources: self.resources.clone(),
            state: self.state.clone(),
            limit: self.limit,
        }
    }
}

impl<P: ListPresenter + 'static> ListController<P> {
    pub fn new(presenter: P, resources: ResourceService, sink: Rc<dyn ListSink>) -> Self {
        let state = ListState::new(ListView::loading(presenter.columns().len()));
        state.view.subscribe(move |view| sink.publish(view));
        Self {
            presenter: Rc::new(presenter),
            resources,
            state,
            limit: None,
        }
    }

    /// Solo los primeros `limit` elementos (destacados)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn current_view(&self) -> ListView {
        self.state.view.get()
    }

    pub async fn load(&self, criteria: Criteria) -> LoadOutcome {
        let ticket = self.state.sequencer.issue();
        *self.state.last_criteria.borrow_mut() = criteria.clone();
        let columns = self.presenter.columns().len();

        if criteria.is_filtered() {
            self.state.view.set(ListView::loading(columns));
        }

        let result = self.resources.list::<P::Entity>(&criteria).await;

        if !self.state.sequencer.is_current(ticket) {
            log::debug!("⏭️ [LIST] Respuesta obsoleta de {} descartada", self.resources.descriptor().list_path);
            return LoadOutcome::Stale;
        }

        let view = match result {
            Ok(mut items) => {
                if let Some(limit) = self.limit {
                    items.truncate(limit);
                }
                log::info!("📋 [LIST] {}: {} elementos", self.resources.descriptor().list_path, items.len());
                render(self.presenter.as_ref(), items)
            }
            Err(e) => {
                log::error!("❌ [LIST] Error cargando {}: {}", self.resources.descriptor().list_path, e);
                ListView::failed(columns, self.presenter.failure_copy())
            }
        };
        self.state.view.set(view);
        LoadOutcome::Applied
    }
}

#[async_trait(?Send)]
impl<P: ListPresenter + 'static> Refresh for ListController<P> {
    async fn refresh(&self) {
        let criteria = self.state.last_criteria.borrow().clone();
        self.load(criteria).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api_client::{ApiClient, AuthHeader};
    use crate::services::http::HttpTransport;
    use crate::services::resources::{ADMIN_DEVICES, FEATURED_DEVICES};
    use crate::testing::{DeferredTransport, RecordingSink, ScriptedTransport};
    use crate::viewmodels::list_renderer::{CardItem, CellValue, NoticeKind, TableRow};
    use crate::viewmodels::presenters::{CatalogDevicePresenter, ManagedDevicePresenter};
    use crate::views::markup;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;

    fn api(transport: Rc<dyn HttpTransport>) -> ApiClient {
        ApiClient::new("http://api.test/api", transport, AuthHeader::default())
    }

    fn managed(transport: Rc<dyn HttpTransport>, sink: Rc<RecordingSink>) -> ListController<ManagedDevicePresenter> {
        ListController::new(
            ManagedDevicePresenter { asset_root: "../" },
            ResourceService::new(api(transport), &ADMIN_DEVICES),
            sink,
        )
    }

    fn first_caption(view: &ListView) -> Option<String> {
        match view.table_rows.first()? {
            TableRow::Entity(row) => match &row.cells[1] {
                CellValue::Thumbnail { caption, .. } => Some(caption.clone()),
                _ => None,
            },
            TableRow::Placeholder(_) => None,
        }
    }

    #[test]
    fn empty_search_shows_one_placeholder_in_both_views() {
        let transport = ScriptedTransport::new();
        transport.respond(200, "[]");
        let sink = Rc::new(RecordingSink::default());
        let list = managed(Rc::new(transport.clone()), sink.clone());

        block_on(list.load(Criteria::new().search("zzz")));

        let views = sink.views();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].table_rows.len(), 1);
        assert!(matches!(&views[0].table_rows[0], TableRow::Placeholder(n) if n.kind == NoticeKind::Loading));
        let last = views.last().unwrap();
        assert!(matches!(&last.table_rows[..], [TableRow::Placeholder(n)] if n.message == "No devices found."));
        assert!(matches!(&last.cards[..], [CardItem::Placeholder(n)] if n.message == "No devices found."));
    }

    #[test]
    fn same_criteria_loaded_twice_paints_identical_markup() {
        let body = r#"[{"device_id":1,"make":"HP","model":"X","status":"maintenance"},
                       {"device_id":2,"make":"Dell","model":"<Y>","status":"available"},
                       {"device_id":3,"make":"Acer","model":"Z","status":null}]"#;
        let transport = ScriptedTransport::new();
        transport.respond(200, body);
        transport.respond(200, body);
        let sink = Rc::new(RecordingSink::default());
        let list = managed(Rc::new(transport.clone()), sink.clone());

        block_on(list.load(Criteria::new().search("a").status("available")));
        let first = sink.last().unwrap();
        block_on(list.load(Criteria::new().search("a").status("available")));
        let second = sink.last().unwrap();

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls[0], urls[1]);
        assert_eq!(first.entity_count(), 3);
        assert_eq!(markup::table_body(&first), markup::table_body(&second));
        assert_eq!(markup::cards(&first), markup::cards(&second));
    }

    #[test]
    fn failed_load_degrades_only_the_list() {
        let transport = ScriptedTransport::new();
        transport.fail("connection refused");
        let sink = Rc::new(RecordingSink::default());
        let list = managed(Rc::new(transport.clone()), sink.clone());

        assert_eq!(block_on(list.load(Criteria::new())), LoadOutcome::Applied);

        let view = sink.last().unwrap();
        assert!(matches!(&view.table_rows[..], [TableRow::Placeholder(n)] if n.kind == NoticeKind::Error));
    }

    #[test]
    fn refresh_reuses_the_last_criteria() {
        let transport = ScriptedTransport::new();
        transport.respond(200, "[]");
        transport.respond(200, "[]");
        let sink = Rc::new(RecordingSink::default());
        let list = managed(Rc::new(transport.clone()), sink);

        block_on(list.load(Criteria::new().status("maintenance")));
        block_on(list.refresh());

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls[0], urls[1]);
        assert!(urls[1].ends_with("devices?status=maintenance"));
    }

    #[test]
    fn featured_list_keeps_server_order_and_limit() {
        let transport = ScriptedTransport::new();
        transport.respond(
            200,
            r#"[{"device_id":1,"status":"maintenance"},{"device_id":2,"status":"available"},
                {"device_id":3,"status":"available"},{"device_id":4,"status":"available"}]"#,
        );
        let sink = Rc::new(RecordingSink::default());
        let list = ListController::new(
            CatalogDevicePresenter { asset_root: "", ranked: false },
            ResourceService::new(api(Rc::new(transport.clone())), &FEATURED_DEVICES),
            sink.clone(),
        )
        .with_limit(3);

        block_on(list.load(Criteria::new()));

        assert_eq!(transport.last_request().unwrap().url, "http://api.test/api/devices");
        assert_eq!(sink.last().unwrap().entity_count(), 3);
    }

    #[test]
    fn late_response_from_an_older_load_is_discarded() {
        let transport = DeferredTransport::new();
        let sink = Rc::new(RecordingSink::default());
        let list = managed(Rc::new(transport.clone()), sink.clone());
        let mut pool = LocalPool::new();
        let spawner = pool.spawner();

        let a = list.clone();
        spawner
            .spawn_local(async move {
                assert_eq!(a.load(Criteria::new().search("old")).await, LoadOutcome::Stale);
            })
            .unwrap();
        pool.run_until_stalled();

        let b = list.clone();
        spawner
            .spawn_local(async move {
                assert_eq!(b.load(Criteria::new().search("new")).await, LoadOutcome::Applied);
            })
            .unwrap();
        pool.run_until_stalled();
        assert_eq!(transport.pending(), 2);

        transport.resolve(1, 200, r#"[{"device_id":2,"make":"New","model":"B","status":"available"}]"#);
        pool.run_until_stalled();
        transport.resolve(0, 200, r#"[{"device_id":1,"make":"Old","model":"A","status":"available"}]"#);
        pool.run();

        assert_eq!(first_caption(&sink.last().unwrap()).as_deref(), Some("New B"));
        assert_eq!(first_caption(&list.current_view()).as_deref(), Some("New B"));
        assert!(sink.views().iter().all(|v| first_caption(v).as_deref() != Some("Old A")));
    }
}
