use actix_web::{test, web, App};
use fcs_timetable::api_json::*;
use fcs_timetable::config::Settings;
use fcs_timetable::models::{Cell, CellColor, Sheet, Spreadsheet};
use fcs_timetable::server::{configure, AppState};
use serde_json::{json, Value};

fn book() -> Spreadsheet {
    let green = CellColor::new(0.2, 0.8, 0.2);
    let empty = || Vec::<Cell>::new();
    let rows = vec![
        vec![Cell::plain(""), Cell::colored("BS CS (2024)", green)],
        empty(),
        empty(),
        empty(),
        vec![Cell::plain("Room"), Cell::plain("08:30-09:50"), Cell::plain("10:00-11:20")],
        vec![
            Cell::plain("101"),
            Cell::colored("Networks (CS-A)", green),
            Cell::colored("Data Structures (CS-A)", green),
        ],
        vec![Cell::plain("102"), Cell::colored("Networks (CS-B)", green)],
    ];
    Spreadsheet::new(vec![Sheet::new("Thursday", rows)])
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(App::new().app_data(web::Data::new($state)).configure(configure)).await
    };
}

#[::core::prelude::v1::test]
fn test_parse_timetable_query() {
    let q = parse_timetable_query(r#"{ "batch": "BS CS (2024)", "section": "A" }"#).expect("Debe parsear la consulta");
    assert_eq!(q.batch, "BS CS (2024)");
    assert_eq!(q.section, "A");
}

#[actix_web::test]
async fn test_batches_endpoint() {
    let app = app!(AppState::with_spreadsheet(book()));
    let req = test::TestRequest::get().uri("/batches").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["batches"], json!(["BS CS (2024)"]));
    assert_eq!(body["departments"], json!(["CS"]));
}

#[actix_web::test]
async fn test_batches_endpoint_without_labels() {
    let app = app!(AppState::with_spreadsheet(Spreadsheet::default()));
    let req = test::TestRequest::get().uri("/batches").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "not_found");
    assert_eq!(body["text"], "⚠️ No batches found. Please check the sheet format.");
}

#[actix_web::test]
async fn test_timetable_get_and_post() {
    let app = app!(AppState::with_spreadsheet(book()));

    let req = test::TestRequest::get()
        .uri("/timetable?batch=BS%20CS%20(2024)&section=A")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["columns"], "batch");
    let entries = body["entries"].as_array().expect("Debe haber entradas");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["day"], "Thursday");
    assert_eq!(entries[0]["course"], "Networks");
    assert_eq!(entries[0]["time"], "08:30-09:50");
    assert_eq!(entries[0]["type"], "Class");
    assert_eq!(entries[1]["course"], "Data Structures");

    let req = test::TestRequest::post()
        .uri("/timetable")
        .set_json(json!({"batch": "BS XX (2024)", "section": "A"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "not_found");
    assert!(body["text"].as_str().unwrap_or("").starts_with("⚠️ Batch 'BS XX (2024)' not found!"));
}

#[actix_web::test]
async fn test_timetable_bad_requests() {
    let app = app!(AppState::with_spreadsheet(book()));
    let req = test::TestRequest::post()
        .uri("/timetable")
        .set_json(json!({"section": "A"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let req = test::TestRequest::post()
        .uri("/timetable")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let req = test::TestRequest::get().uri("/timetable?batch=%20&section=A").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_unconfigured_source_is_503() {
    let app = app!(AppState::from_settings(Settings::default()));
    let req = test::TestRequest::get().uri("/timetable?batch=BS%20CS%20(2024)&section=A").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 503);
}

#[actix_web::test]
async fn test_course_search_saves_session_filters() {
    let app = app!(AppState::with_spreadsheet(book()));
    let req = test::TestRequest::get().uri("/courses?query=net&session=s1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_catalog"], 3);
    assert_eq!(body["count"], 2);
    assert_eq!(body["courses"][0]["display"], "Networks CS A 2024");
    assert_eq!(body["courses"][0]["name"], "Networks");

    let req = test::TestRequest::get().uri("/sessions/s1/courses").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["filters"]["query"], "net");
    assert_eq!(body["last_results"], 2);
    assert_eq!(body["summary"]["total_courses"], 0);
}

#[actix_web::test]
async fn test_session_selection_flow() {
    let app = app!(AppState::with_spreadsheet(book()));
    let networks = json!({"name": "Networks", "department": "CS", "section": "A", "batch": "BS CS (2024)"});

    let req = test::TestRequest::get().uri("/sessions/u1/timetable").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["text"], "⚠️ No courses selected");

    let req = test::TestRequest::post().uri("/sessions/u1/courses").set_json(&networks).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["added"], true);
    let req = test::TestRequest::post().uri("/sessions/u1/courses").set_json(&networks).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["added"], false);
    assert_eq!(body["total"], 1);

    // otra sesión no ve la selección
    let req = test::TestRequest::get().uri("/sessions/u2/courses").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["courses"], json!([]));

    let req = test::TestRequest::get().uri("/sessions/u1/timetable").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["columns"], "custom");
    let entries = body["entries"].as_array().expect("Debe haber entradas");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["room"], "101");
    assert_eq!(entries[0]["section"], "A");
    assert!(body["text"].as_str().unwrap_or("").contains("| Networks | A | 2024 |"));

    let req = test::TestRequest::delete().uri("/sessions/u1/courses").set_json(&networks).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["removed"], true);
    assert_eq!(body["total"], 0);

    let req = test::TestRequest::post().uri("/sessions/u1/courses").set_json(json!({"name": ""})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let req = test::TestRequest::post().uri("/sessions/u1/clear").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["cleared"], true);
}

#[actix_web::test]
async fn test_help_lists_routes() {
    let app = app!(AppState::with_spreadsheet(Spreadsheet::default()));
    let req = test::TestRequest::get().uri("/help").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let routes = body["routes"].as_array().expect("Debe listar rutas");
    assert!(routes.iter().any(|r| r == "GET /sessions/{id}/timetable"));
}
