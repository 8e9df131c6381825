use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use log::{error, warn};
use serde::Deserialize;

use crate::board::admin::{self, AdminSecret, Gate, Notice};
use crate::board::pages::{self, DashboardView, PageInfo};
use crate::board::store::Store;
use crate::board::*;

#[derive(Clone)]
pub struct AppState {
    store: Arc<Store>,
    secret: AdminSecret,
    info: Arc<PageInfo>,
}

impl AppState {
    pub fn new(store: Store, config: &BoardConfig) -> AppState {
        AppState {
            store: Arc::new(store),
            secret: config.admin_secret.clone(),
            info: Arc::new(PageInfo {
                title: config.title.clone(),
                subtitle: config.subtitle.clone(),
            }),
        }
    }
}

/// A storage failure while serving a page.
pub struct ServerError(BoardError);

impl From<BoardError> for ServerError {
    fn from(e: BoardError) -> Self {
        ServerError(e)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self.0);
        let mut message = self.0.to_string();
        if let Some(source) = std::error::Error::source(&self.0) {
            message = format!("{}: {}", message, source);
        }
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}

type PageResult = Result<Response, ServerError>;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(user_view))
        .route("/admin", get(admin_login).post(admin_view))
        .route("/admin/update", axum::routing::post(update_standings))
        .route("/admin/add", axum::routing::post(add_event))
        .route("/admin/delete", axum::routing::post(delete_event))
        .route("/api/standings", get(list_standings))
        .with_state(state)
}

// HTML forms send empty strings for untouched fields.
fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SelectForm {
    pub password: String,
    pub category: Option<String>,
    pub event: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateForm {
    pub password: String,
    pub category: Option<String>,
    pub event: String,
    pub first: String,
    pub second: String,
    pub third: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddForm {
    pub password: String,
    pub new_event: String,
    pub new_category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteForm {
    pub password: String,
    pub category: Option<String>,
    pub event: String,
}

async fn user_view(State(state): State<AppState>) -> PageResult {
    let table = state.store.load()?;
    Ok(Html(pages::render_leaderboard(&table, &state.info)).into_response())
}

async fn list_standings(State(state): State<AppState>) -> Result<Json<Vec<Standing>>, ServerError> {
    let table = state.store.load()?;
    Ok(Json(table.rows().to_vec()))
}

async fn admin_login() -> Html<String> {
    Html(pages::render_login(None))
}

/// The page shown when the gate stays closed. None when access is granted.
fn closed_gate(state: &AppState, password: &str) -> Option<Response> {
    match state.secret.check(password) {
        Gate::Granted => None,
        Gate::NotSubmitted => Some(Html(pages::render_login(None)).into_response()),
        Gate::Denied => Some(
            (
                StatusCode::UNAUTHORIZED,
                Html(pages::render_login(Some(&Notice::Error(
                    "Incorrect password!".to_string(),
                )))),
            )
                .into_response(),
        ),
    }
}

fn dashboard(
    state: &AppState,
    password: &str,
    category: Option<&str>,
    event: Option<&str>,
    notices: Vec<Notice>,
) -> PageResult {
    let table = state.store.load()?;
    let selection = table.select(category, event);
    let view = DashboardView {
        password,
        selection,
        notices,
    };
    Ok(Html(pages::render_dashboard(&table, &view)).into_response())
}

async fn admin_view(State(state): State<AppState>, Form(form): Form<SelectForm>) -> PageResult {
    if let Some(page) = closed_gate(&state, &form.password) {
        return Ok(page);
    }
    dashboard(
        &state,
        &form.password,
        non_empty(&form.category),
        non_empty(&form.event),
        vec![],
    )
}

async fn update_standings(
    State(state): State<AppState>,
    Form(form): Form<UpdateForm>,
) -> PageResult {
    if let Some(page) = closed_gate(&state, &form.password) {
        warn!("update_standings: refused");
        return Ok(page);
    }
    let category = non_empty(&form.category);
    let notice = admin::update_standings(
        &state.store,
        category,
        &form.event,
        Placings {
            first: form.first.clone(),
            second: form.second.clone(),
            third: form.third.clone(),
        },
    )?;
    dashboard(
        &state,
        &form.password,
        category,
        Some(form.event.as_str()),
        vec![notice],
    )
}

async fn add_event(State(state): State<AppState>, Form(form): Form<AddForm>) -> PageResult {
    if let Some(page) = closed_gate(&state, &form.password) {
        warn!("add_event: refused");
        return Ok(page);
    }
    let category = non_empty(&form.new_category);
    let notice = admin::add_event(&state.store, &form.new_event, category)?;
    dashboard(&state, &form.password, category, None, vec![notice])
}

async fn delete_event(State(state): State<AppState>, Form(form): Form<DeleteForm>) -> PageResult {
    if let Some(page) = closed_gate(&state, &form.password) {
        warn!("delete_event: refused");
        return Ok(page);
    }
    let category = non_empty(&form.category);
    let notice = admin::delete_event(&state.store, category, &form.event)?;
    dashboard(&state, &form.password, category, None, vec![notice])
}
