use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::algorithm::{get_custom_timetable, TimetableReport};
use crate::api_json::{parse_course_record, ReportResponse};
use crate::models::CourseRecord;
use crate::server::{source_error_response, AppState};

fn course_from_body(body: serde_json::Value) -> Result<CourseRecord, HttpResponse> {
    let json_str = serde_json::to_string(&body)
        .map_err(|e| HttpResponse::BadRequest().json(json!({"error": format!("invalid JSON body: {}", e)})))?;
    parse_course_record(&json_str).map_err(|e| HttpResponse::BadRequest().json(json!({"error": e})))
}

/// GET /sessions/{id}/courses
pub async fn session_list_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let body = state.sessions.with_session(&id, |sel| {
        json!({
            "session": id,
            "courses": sel.list(),
            "summary": sel.summary(),
            "filters": sel.filters(),
            "last_results": sel.last_results().len()
        })
    });
    HttpResponse::Ok().json(body)
}

/// POST /sessions/{id}/courses con un curso del catálogo.
pub async fn session_add_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let course = match course_from_body(body.into_inner()) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let id = path.into_inner();
    let (added, total) = state.sessions.with_session(&id, |sel| {
        let added = sel.add(course);
        (added, sel.list().len())
    });
    HttpResponse::Ok().json(json!({"added": added, "total": total}))
}

/// DELETE /sessions/{id}/courses
pub async fn session_remove_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let course = match course_from_body(body.into_inner()) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let id = path.into_inner();
    let (removed, total) = state.sessions.with_session(&id, |sel| {
        let removed = sel.remove(&course);
        (removed, sel.list().len())
    });
    HttpResponse::Ok().json(json!({"removed": removed, "total": total}))
}

/// POST /sessions/{id}/clear
pub async fn session_clear_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    state.sessions.with_session(&path.into_inner(), |sel| sel.clear());
    HttpResponse::Ok().json(json!({"cleared": true, "total": 0}))
}

/// GET /sessions/{id}/timetable
/// Horario de los cursos elegidos en la sesión. Sin cursos no se lee la hoja.
pub async fn session_timetable_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let selected = state.sessions.with_session(&path.into_inner(), |sel| sel.list().to_vec());
    if selected.is_empty() {
        return HttpResponse::Ok().json(ReportResponse::from(&TimetableReport::NoCoursesSelected));
    }
    let book = match state.spreadsheet() {
        Ok(b) => b,
        Err(e) => return source_error_response(&e),
    };
    let report = get_custom_timetable(&book, &selected);
    HttpResponse::Ok().json(ReportResponse::from(&report))
}
