use crate::catalog::{CatalogBrowser, CatalogSnapshot};
use crate::errors::AppError;
use crate::explorer::{Explorer, ExplorerAction, ExplorerSnapshot};
use crate::models::Dimension;
use crate::state::{AppState, Dashboard, LoadState, Snapshot, View};
use crate::ui::{render_catalog, render_explorer, render_home};
use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{Html, Redirect},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub dimension: Dimension,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct PageForm {
    pub page: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    state.activate(View::Home).await;
    Html(render_home())
}

pub async fn catalog(State(state): State<AppState>) -> Html<String> {
    state.activate(View::Catalog).await;
    let dashboard = state.dashboard.lock().await;
    Html(render_catalog(&dashboard.catalog))
}

pub async fn catalog_select(
    State(state): State<AppState>,
    Form(form): Form<SelectRequest>,
) -> Result<Redirect, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    redirect_unless_loaded(select_entry(&mut dashboard, &form.id), "/agregados")
}

pub async fn explorer(State(state): State<AppState>) -> Html<String> {
    state.activate(View::Explorer).await;
    let dashboard = state.dashboard.lock().await;
    Html(render_explorer(&dashboard.explorer))
}

pub async fn explorer_toggle(
    State(state): State<AppState>,
    Form(form): Form<ToggleForm>,
) -> Result<Redirect, AppError> {
    let action = ExplorerAction::Toggle {
        dimension: form.dimension,
        value: form.value,
    };
    let mut dashboard = state.dashboard.lock().await;
    redirect_unless_loaded(apply_action(&mut dashboard, action), "/ipca")
}

pub async fn explorer_clear(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    redirect_unless_loaded(apply_action(&mut dashboard, ExplorerAction::ClearFilters), "/ipca")
}

pub async fn explorer_page(
    State(state): State<AppState>,
    Form(form): Form<PageForm>,
) -> Result<Redirect, AppError> {
    let action = ExplorerAction::GoToPage { page: form.page };
    let mut dashboard = state.dashboard.lock().await;
    redirect_unless_loaded(apply_action(&mut dashboard, action), "/ipca")
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn get_catalog(State(state): State<AppState>) -> Json<Snapshot<CatalogSnapshot>> {
    state.activate(View::Catalog).await;
    let dashboard = state.dashboard.lock().await;
    Json(dashboard.catalog.snapshot(CatalogBrowser::snapshot))
}

pub async fn post_catalog_select(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<Snapshot<CatalogSnapshot>>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    select_entry(&mut dashboard, &request.id)?;
    Ok(Json(dashboard.catalog.snapshot(CatalogBrowser::snapshot)))
}

pub async fn get_explorer(State(state): State<AppState>) -> Json<Snapshot<ExplorerSnapshot>> {
    state.activate(View::Explorer).await;
    let dashboard = state.dashboard.lock().await;
    Json(dashboard.explorer.snapshot(Explorer::snapshot))
}

pub async fn post_explorer_action(
    State(state): State<AppState>,
    Json(action): Json<ExplorerAction>,
) -> Result<Json<Snapshot<ExplorerSnapshot>>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    apply_action(&mut dashboard, action)?;
    Ok(Json(dashboard.explorer.snapshot(Explorer::snapshot)))
}

fn select_entry(dashboard: &mut Dashboard, id: &str) -> Result<(), AppError> {
    let LoadState::Loaded { data, .. } = &mut dashboard.catalog else {
        return Err(AppError::not_loaded("catalog"));
    };
    *data = data.select(id)?;
    Ok(())
}

fn apply_action(dashboard: &mut Dashboard, action: ExplorerAction) -> Result<(), AppError> {
    let LoadState::Loaded { data, .. } = &mut dashboard.explorer else {
        return Err(AppError::not_loaded("index"));
    };
    *data = data.apply(action)?;
    Ok(())
}

/// Form posts against a view that has not loaded just land back on the page.
fn redirect_unless_loaded(result: Result<(), AppError>, to: &str) -> Result<Redirect, AppError> {
    match result {
        Ok(()) => {}
        Err(err) if err.status == StatusCode::CONFLICT => {
            debug!("ignoring form action: {}", err.message);
        }
        Err(err) => return Err(err),
    }
    Ok(Redirect::to(to))
}
