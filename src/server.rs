//! HTTP surface: ingestion, elevation proxy and the log viewer.

use std::sync::Arc;

use actix_web::http::header;
use actix_web::{web, HttpResponse};

use crate::config::{AdminCredentials, Config};
use crate::elevation::{ElevationClient, ElevationError};
use crate::error::{Error, StoreError};
use crate::export;
use crate::models::{ElevationQuery, LogEntry, LogRequest, LoginForm};
use crate::store::LogStore;
use crate::views;

/// Shared by every worker; built once from the `Config`.
pub struct AppState {
    pub store: Arc<dyn LogStore>,
    pub admin: AdminCredentials,
    pub elevation: ElevationClient,
}

impl AppState {
    pub fn new(store: Arc<dyn LogStore>, config: &Config) -> AppState {
        AppState {
            store,
            admin: config.admin.clone(),
            elevation: ElevationClient::new(config.elevation_api_url.clone()),
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "unreadable log body");
        Error::Validation("body").into()
    }))
    .app_data(web::FormConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "unreadable login form");
        Error::Auth.into()
    }))
    .route("/elevation", web::get().to(elevation))
    .route("/log", web::post().to(log))
    .service(
        web::resource("/view")
            .route(web::get().to(login_page))
            .route(web::post().to(login)),
    )
    .route("/view/session/{session_id}/export", web::get().to(export_session))
    .route("/view/session/{session_id}", web::get().to(view_session));
}

/// Run a blocking store call on the thread pool.
async fn with_store<T, F>(state: &AppState, f: F) -> Result<T, StoreError>
where
    F: FnOnce(&dyn LogStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    web::block(move || f(store.as_ref()))
        .await
        .map_err(|_| StoreError::Canceled)?
}

async fn load_session(state: &AppState, session_id: &str) -> Result<Vec<LogEntry>, Error> {
    let id = session_id.to_string();
    let entries = with_store(state, move |store| store.get_session(&id)).await?;
    if entries.is_empty() {
        return Err(Error::NotFound(session_id.to_string()));
    }
    Ok(entries)
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

async fn elevation(
    state: web::Data<AppState>,
    query: web::Query<ElevationQuery>,
) -> Result<HttpResponse, ElevationError> {
    let ElevationQuery { lat, lon } = query.into_inner();
    let (lat, lon) = match (non_empty(lat), non_empty(lon)) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(ElevationError::MissingCoordinates),
    };

    let data = state.elevation.lookup(&lat, &lon).await?;
    Ok(HttpResponse::Ok().json(data))
}

async fn log(state: web::Data<AppState>, body: web::Json<LogRequest>) -> Result<HttpResponse, Error> {
    let entry = body.into_inner().validate()?;
    let saved = with_store(&state, move |store| store.append(entry)).await?;
    tracing::debug!(id = saved.id, session_id = %saved.session_id, "logged sample");

    Ok(HttpResponse::Ok().content_type("text/plain").body("OK"))
}

async fn login_page() -> HttpResponse {
    html(views::login_form())
}

async fn login(state: web::Data<AppState>, form: web::Form<LoginForm>) -> Result<HttpResponse, Error> {
    let form = form.into_inner();
    if !state
        .admin
        .matches(form.username.as_deref(), form.password.as_deref())
    {
        return Err(Error::Auth);
    }

    let sessions = with_store(&state, |store| store.list_sessions()).await?;
    Ok(html(views::session_list(&sessions)))
}

async fn export_session(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let session_id = path.into_inner();
    let entries = load_session(&state, &session_id).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", export::filename(&session_id)),
        ))
        .body(export::to_csv(&entries)))
}

async fn view_session(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let session_id = path.into_inner();
    let entries = load_session(&state, &session_id).await?;
    Ok(html(views::session_page(&session_id, &entries)))
}
