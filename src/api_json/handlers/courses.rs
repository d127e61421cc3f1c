use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use serde_json::json;

use crate::algorithm::{extract_all_courses, format_course_display, search_courses};
use crate::api_json::CourseSearchQuery;
use crate::models::CourseRecord;
use crate::server::{source_error_response, AppState};

#[derive(Debug, Serialize)]
struct CursoDto<'a> {
    #[serde(flatten)]
    course: &'a CourseRecord,
    display: String,
}

fn to_dto(c: &CourseRecord) -> CursoDto<'_> {
    CursoDto {
        course: c,
        display: format_course_display(c),
    }
}

/// GET /courses?query=net&department=CS&batch=...&session=abc
/// Busca en el catálogo completo. Con `session`, los filtros y resultados
/// quedan guardados en esa sesión.
pub async fn courses_search_handler(state: web::Data<AppState>, query: web::Query<CourseSearchQuery>) -> impl Responder {
    let book = match state.spreadsheet() {
        Ok(b) => b,
        Err(e) => return source_error_response(&e),
    };
    let q = query.into_inner();
    let catalog = extract_all_courses(&book);
    let results = search_courses(&catalog, &q.query, &q.department, &q.batch);

    if let Some(id) = q.session.as_deref().filter(|s| !s.trim().is_empty()) {
        let saved = results.clone();
        state.sessions.with_session(id, |sel| {
            sel.update_filters(&q.query, &q.department, &q.batch);
            sel.save_results(saved);
        });
    }

    let courses: Vec<CursoDto> = results.iter().map(to_dto).collect();
    HttpResponse::Ok().json(json!({
        "total_catalog": catalog.len(),
        "count": courses.len(),
        "courses": courses
    }))
}
