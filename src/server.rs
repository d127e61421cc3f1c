use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer};
use log::{info, warn};
use serde_json::json;
use std::sync::Arc;

use crate::api_json::handlers::{
    batches_handler, courses_search_handler, help_handler, session_add_handler, session_clear_handler,
    session_list_handler, session_remove_handler, session_timetable_handler, timetable_get_handler,
    timetable_post_handler,
};
use crate::config::Settings;
use crate::error::SourceError;
use crate::excel::fetch_spreadsheet;
use crate::models::Spreadsheet;
use crate::session::SessionRegistry;

/// De dónde sale la hoja en cada petición.
pub enum SheetSource {
    /// Origen configurado; se resuelve y lee (o se toma del caché) por petición.
    Configured(Settings),
    /// Hoja ya cargada en memoria.
    Fixed(Arc<Spreadsheet>),
}

pub struct AppState {
    pub source: SheetSource,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn from_settings(settings: Settings) -> Self {
        AppState {
            source: SheetSource::Configured(settings),
            sessions: SessionRegistry::new(),
        }
    }

    pub fn with_spreadsheet(book: Spreadsheet) -> Self {
        AppState {
            source: SheetSource::Fixed(Arc::new(book)),
            sessions: SessionRegistry::new(),
        }
    }

    pub fn spreadsheet(&self) -> Result<Arc<Spreadsheet>, SourceError> {
        match &self.source {
            SheetSource::Configured(settings) => fetch_spreadsheet(settings),
            SheetSource::Fixed(book) => Ok(Arc::clone(book)),
        }
    }
}

/// Falla del origen: 503 con el detalle. El motor nunca la interpreta.
pub fn source_error_response(err: &SourceError) -> HttpResponse {
    warn!("timetable source unavailable: {}", err);
    HttpResponse::ServiceUnavailable().json(json!({"error": err.to_string()}))
}

/// Registra las rutas; se comparte con los tests de handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/batches", web::get().to(batches_handler))
        .route("/timetable", web::get().to(timetable_get_handler))
        .route("/timetable", web::post().to(timetable_post_handler))
        .route("/courses", web::get().to(courses_search_handler))
        .route("/sessions/{id}/courses", web::get().to(session_list_handler))
        .route("/sessions/{id}/courses", web::post().to(session_add_handler))
        .route("/sessions/{id}/courses", web::delete().to(session_remove_handler))
        .route("/sessions/{id}/clear", web::post().to(session_clear_handler))
        .route("/sessions/{id}/timetable", web::get().to(session_timetable_handler))
        .route("/help", web::get().to(help_handler));
}

pub async fn run_server(settings: Settings) -> std::io::Result<()> {
    let bind_addr = settings.bind.clone();
    if settings.source.is_none() {
        warn!("TIMETABLE_SOURCE is not set; timetable routes will answer 503");
    }
    let state = web::Data::new(AppState::from_settings(settings));

    info!("listening on http://{}", bind_addr);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind(bind_addr.as_str())?
    .run()
    .await
}
