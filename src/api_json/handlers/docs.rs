use actix_web::{HttpResponse, Responder};
use serde_json::json;

use crate::api_json::TimetableQuery;
use crate::models::CourseRecord;

/// GET /help
pub async fn help_handler() -> impl Responder {
    let timetable_example = TimetableQuery {
        batch: "BS CS (2024)".to_string(),
        section: "A".to_string(),
    };
    let course_example = CourseRecord {
        name: "Data Structures".to_string(),
        department: "CS".to_string(),
        section: "A".to_string(),
        batch: "BS CS (2024)".to_string(),
        full_entry: String::new(),
        day: String::new(),
        color_code: String::new(),
    };

    HttpResponse::Ok().json(json!({
        "description": "API de horarios por colores. GET /batches lista los lotes; GET/POST /timetable devuelve el horario de un lote y sección; GET /courses busca en el catálogo; /sessions/{id}/... guarda una selección de cursos y arma su horario.",
        "timetable_post_example": timetable_example,
        "timetable_get_example_query": "/timetable?batch=BS%20CS%20(2024)&section=A",
        "courses_get_example_query": "/courses?query=data&department=CS&session=abc",
        "session_course_example": course_example,
        "routes": [
            "GET /batches",
            "GET /timetable",
            "POST /timetable",
            "GET /courses",
            "GET /sessions/{id}/courses",
            "POST /sessions/{id}/courses",
            "DELETE /sessions/{id}/courses",
            "POST /sessions/{id}/clear",
            "GET /sessions/{id}/timetable",
            "GET /help"
        ],
        "note": "Las respuestas con \"status\": \"not_found\" traen en \"text\" un mensaje que empieza con ⚠️."
    }))
}
