use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::algorithm::{extract_departments_and_batches, get_timetable, NO_BATCHES_MESSAGE};
use crate::api_json::{parse_timetable_query, ReportResponse, TimetableQuery};
use crate::server::{source_error_response, AppState};

/// GET /batches
/// Lotes y departamentos vistos en la cabecera de las hojas de lunes a viernes.
pub async fn batches_handler(state: web::Data<AppState>) -> impl Responder {
    let book = match state.spreadsheet() {
        Ok(b) => b,
        Err(e) => return source_error_response(&e),
    };
    let (departments, batches) = extract_departments_and_batches(&book);
    if batches.is_empty() {
        return HttpResponse::Ok().json(json!({
            "status": "not_found",
            "text": NO_BATCHES_MESSAGE,
            "batches": [],
            "departments": []
        }));
    }
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "batches": batches,
        "departments": departments
    }))
}

fn run_batch_query(state: &AppState, query: &TimetableQuery) -> HttpResponse {
    if query.batch.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({"error": "batch is required"}));
    }
    let book = match state.spreadsheet() {
        Ok(b) => b,
        Err(e) => return source_error_response(&e),
    };
    let report = get_timetable(&book, &query.batch, &query.section);
    HttpResponse::Ok().json(ReportResponse::from(&report))
}

/// GET /timetable?batch=BS%20CS%20(2024)&section=A
pub async fn timetable_get_handler(state: web::Data<AppState>, query: web::Query<TimetableQuery>) -> impl Responder {
    run_batch_query(&state, &query)
}

/// POST /timetable con body `{"batch": "...", "section": "A"}`
pub async fn timetable_post_handler(state: web::Data<AppState>, body: String) -> impl Responder {
    let query = match parse_timetable_query(&body) {
        Ok(q) => q,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": format!("invalid JSON body: {}", e)})),
    };
    run_batch_query(&state, &query)
}
