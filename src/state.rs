use crate::catalog::CatalogBrowser;
use crate::explorer::Explorer;
use crate::loader::{LoadError, Loader};
use crate::models::{CatalogEntry, ValueRecord};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Catalog,
    Explorer,
}

#[derive(Debug, Clone)]
pub enum LoadState<T> {
    Loading,
    Loaded { data: T, fetched_at: DateTime<Local> },
    Failed { message: String },
}

impl<T> LoadState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded { data, .. } => Some(data),
            _ => None,
        }
    }

    fn from_result<R>(result: Result<R, LoadError>, build: impl FnOnce(R) -> T) -> Self {
        match result {
            Ok(raw) => LoadState::Loaded {
                data: build(raw),
                fetched_at: Local::now(),
            },
            Err(err) => LoadState::Failed {
                message: err.to_string(),
            },
        }
    }

    /// Wraps a view of the loaded data for JSON responses.
    pub fn snapshot<S>(&self, view: impl FnOnce(&T) -> S) -> Snapshot<S> {
        match self {
            LoadState::Loading => Snapshot {
                status: LoadStatus::Loading,
                fetched_at: None,
                error: None,
                data: None,
            },
            LoadState::Loaded { data, fetched_at } => Snapshot {
                status: LoadStatus::Loaded,
                fetched_at: Some(fetched_at.to_rfc3339()),
                error: None,
                data: Some(view(data)),
            },
            LoadState::Failed { message } => Snapshot {
                status: LoadStatus::Failed,
                fetched_at: None,
                error: Some(message.clone()),
                data: None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Serialize)]
pub struct Snapshot<S> {
    pub status: LoadStatus,
    pub fetched_at: Option<String>,
    pub error: Option<String>,
    pub data: Option<S>,
}

/// What the browser tab would hold: the active view and the state of the mounted data view.
#[derive(Debug)]
pub struct Dashboard {
    active: View,
    generation: u64,
    pub catalog: LoadState<CatalogBrowser>,
    pub explorer: LoadState<Explorer>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            active: View::Home,
            generation: 0,
            catalog: LoadState::Loading,
            explorer: LoadState::Loading,
        }
    }
}

impl Dashboard {
    pub fn active(&self) -> View {
        self.active
    }

    /// Switches to `view`, discarding the previous view's state.
    ///
    /// Returns the new activation generation, or `None` when `view` was already active.
    pub fn activate(&mut self, view: View) -> Option<u64> {
        if self.active == view {
            return None;
        }
        self.active = view;
        self.generation += 1;
        self.catalog = LoadState::Loading;
        self.explorer = LoadState::Loading;
        Some(self.generation)
    }

    fn is_current(&self, view: View, generation: u64) -> bool {
        self.active == view && self.generation == generation
    }

    pub fn finish_catalog(&mut self, generation: u64, result: Result<Vec<CatalogEntry>, LoadError>) -> bool {
        if !self.is_current(View::Catalog, generation) {
            debug!(generation, "discarding catalog response for an inactive view");
            return false;
        }
        self.catalog = LoadState::from_result(result, CatalogBrowser::new);
        true
    }

    pub fn finish_explorer(&mut self, generation: u64, result: Result<Vec<ValueRecord>, LoadError>) -> bool {
        if !self.is_current(View::Explorer, generation) {
            debug!(generation, "discarding index response for an inactive view");
            return false;
        }
        self.explorer = LoadState::from_result(result, Explorer::from_records);
        true
    }
}

#[derive(Clone)]
pub struct AppState {
    pub loader: Loader,
    pub dashboard: Arc<Mutex<Dashboard>>,
    load_wait: Duration,
}

impl AppState {
    pub fn new(loader: Loader, load_wait: Duration) -> Self {
        Self {
            loader,
            dashboard: Arc::new(Mutex::new(Dashboard::default())),
            load_wait,
        }
    }

    /// Makes `view` active and, on a fresh activation of a data view, starts its single load.
    ///
    /// The load runs in its own task, so it completes even if the caller is dropped. The
    /// caller waits at most `load_wait` for it and otherwise renders the loading state.
    pub async fn activate(&self, view: View) {
        let generation = {
            let mut dashboard = self.dashboard.lock().await;
            match dashboard.activate(view) {
                Some(generation) => generation,
                None => return,
            }
        };
        info!(?view, generation, "view activated");

        let Some(load) = self.spawn_load(view, generation) else {
            return;
        };
        match timeout(self.load_wait, load).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(?view, generation, "load task failed: {err}"),
            Err(_) => debug!(?view, generation, "load still in flight"),
        }
    }

    fn spawn_load(&self, view: View, generation: u64) -> Option<JoinHandle<()>> {
        let loader = self.loader.clone();
        let dashboard = Arc::clone(&self.dashboard);
        let task = match view {
            View::Home => return None,
            View::Catalog => tokio::spawn(async move {
                let result = loader.load_catalog().await;
                if let Err(err) = &result {
                    warn!("failed to load catalog: {err}");
                }
                dashboard.lock().await.finish_catalog(generation, result);
            }),
            View::Explorer => tokio::spawn(async move {
                let result = loader.load_values().await;
                if let Err(err) = &result {
                    warn!("failed to load index values: {err}");
                }
                dashboard.lock().await.finish_explorer(generation, result);
            }),
        };
        Some(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::SubEntry;
    use axum::{Json, Router, routing::get};
    use serde_json::json;
    use tokio::time::{Instant, sleep};

    fn entries() -> Vec<CatalogEntry> {
        vec![CatalogEntry {
            id: "A".to_string(),
            name: "Amostra".to_string(),
            subentries: vec![SubEntry {
                id: "1".to_string(),
                name: "Um".to_string(),
            }],
        }]
    }

    fn decode_failure() -> LoadError {
        LoadError::Decode {
            url: "http://upstream/values".to_string(),
            source: serde_json::from_str::<Vec<ValueRecord>>("{}").unwrap_err(),
        }
    }

    #[test]
    fn reactivating_the_same_view_is_a_no_op() {
        let mut dashboard = Dashboard::default();
        assert_eq!(dashboard.active(), View::Home);
        assert!(dashboard.activate(View::Home).is_none());
        let generation = dashboard.activate(View::Catalog).unwrap();
        assert!(dashboard.activate(View::Catalog).is_none());
        assert!(dashboard.finish_catalog(generation, Ok(entries())));
        assert!(dashboard.catalog.loaded().is_some());
    }

    #[test]
    fn switching_views_discards_state_and_late_responses() {
        let mut dashboard = Dashboard::default();
        let first = dashboard.activate(View::Catalog).unwrap();
        assert!(dashboard.finish_catalog(first, Ok(entries())));

        let explorer = dashboard.activate(View::Explorer).unwrap();
        assert!(matches!(dashboard.catalog, LoadState::Loading));
        assert!(!dashboard.finish_catalog(first, Ok(entries())));

        dashboard.activate(View::Home);
        assert!(!dashboard.finish_explorer(explorer, Ok(Vec::new())));
        assert!(matches!(dashboard.explorer, LoadState::Loading));

        let second = dashboard.activate(View::Catalog).unwrap();
        assert!(second > first);
        assert!(!dashboard.finish_catalog(first, Ok(entries())));
        assert!(dashboard.catalog.loaded().is_none());
    }

    #[test]
    fn failure_is_distinct_from_loading_and_empty() {
        let mut dashboard = Dashboard::default();
        let generation = dashboard.activate(View::Explorer).unwrap();
        assert_eq!(dashboard.explorer.snapshot(|_| ()).status, LoadStatus::Loading);

        dashboard.finish_explorer(generation, Err(decode_failure()));
        let snapshot = dashboard.explorer.snapshot(|explorer| explorer.records().len());
        assert_eq!(snapshot.status, LoadStatus::Failed);
        assert!(snapshot.error.unwrap().contains("http://upstream/values"));
        assert!(snapshot.data.is_none());

        dashboard.activate(View::Home);
        let generation = dashboard.activate(View::Explorer).unwrap();
        dashboard.finish_explorer(generation, Ok(Vec::new()));
        let snapshot = dashboard.explorer.snapshot(|explorer| explorer.records().len());
        assert_eq!(snapshot.status, LoadStatus::Loaded);
        assert_eq!(snapshot.data, Some(0));
        assert!(snapshot.fetched_at.is_some());
    }

    const UPSTREAM_DELAY: Duration = Duration::from_millis(300);

    /// An upstream that answers every request only after `UPSTREAM_DELAY`.
    async fn slow_upstream() -> String {
        let app = Router::new()
            .route(
                "/catalog",
                get(|| async {
                    sleep(UPSTREAM_DELAY).await;
                    Json(json!([{"id": "A", "nome": "Amostra", "agregados": []}]))
                }),
            )
            .route(
                "/values",
                get(|| async {
                    sleep(UPSTREAM_DELAY).await;
                    Json(json!([
                        {"V": "Valor", "D2C": "Variável (Código)", "D2N": "Variável",
                         "D3C": "Mês (Código)", "D3N": "Mês", "D4C": "Geral (Código)", "D4N": "Geral"},
                        {"V": "0,21", "D2C": "63", "D2N": "IPCA - Variação mensal",
                         "D3C": "202001", "D3N": "janeiro 2020", "D4C": "7169", "D4N": "Índice geral"}
                    ]))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn app_state(load_wait: Duration) -> AppState {
        let base = slow_upstream().await;
        let config = Config {
            port: 0,
            catalog_url: format!("{base}/catalog"),
            index_url: format!("{base}/values"),
            fetch_timeout: None,
            load_wait,
        };
        AppState::new(Loader::new(&config).unwrap(), load_wait)
    }

    async fn wait_for_explorer(state: &AppState) -> LoadStatus {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let status = state.dashboard.lock().await.explorer.snapshot(|_| ()).status;
            if status != LoadStatus::Loading || Instant::now() > deadline {
                return status;
            }
            sleep(Duration::from_millis(20)).await;
        }
    }

    #[tokio::test]
    async fn activation_waits_for_a_fast_load() {
        let state = app_state(Duration::from_secs(5)).await;
        state.activate(View::Catalog).await;
        let dashboard = state.dashboard.lock().await;
        assert_eq!(dashboard.catalog.loaded().map(|browser| browser.snapshot().entries.len()), Some(1));
    }

    #[tokio::test]
    async fn slow_load_finishes_after_activation_returns() {
        let state = app_state(Duration::from_millis(20)).await;
        state.activate(View::Explorer).await;
        assert!(matches!(state.dashboard.lock().await.explorer, LoadState::Loading));

        assert_eq!(wait_for_explorer(&state).await, LoadStatus::Loaded);
        let dashboard = state.dashboard.lock().await;
        assert_eq!(dashboard.explorer.loaded().map(|explorer| explorer.records().len()), Some(1));
    }

    #[tokio::test]
    async fn dropped_activation_does_not_cancel_the_load() {
        let state = app_state(Duration::from_secs(5)).await;
        let request = tokio::spawn({
            let state = state.clone();
            async move { state.activate(View::Explorer).await }
        });
        while state.dashboard.lock().await.active() != View::Explorer {
            sleep(Duration::from_millis(5)).await;
        }
        request.abort();
        assert!(request.await.unwrap_err().is_cancelled());

        assert_eq!(wait_for_explorer(&state).await, LoadStatus::Loaded);
    }

    #[tokio::test]
    async fn load_finishing_after_a_view_switch_is_discarded() {
        let state = app_state(Duration::from_millis(20)).await;
        state.activate(View::Explorer).await;
        state.activate(View::Home).await;
        sleep(UPSTREAM_DELAY * 2).await;
        let dashboard = state.dashboard.lock().await;
        assert_eq!(dashboard.active(), View::Home);
        assert!(matches!(dashboard.explorer, LoadState::Loading));
    }
}
