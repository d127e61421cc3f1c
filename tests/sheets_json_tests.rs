use fcs_timetable::algorithm::{extract_batch_colors, get_timetable};
use fcs_timetable::config::Settings;
use fcs_timetable::error::SourceError;
use fcs_timetable::excel::{cache_stats, fetch_spreadsheet, load_spreadsheet, parse_grid_json, resolve_source_path};
use fcs_timetable::models::SessionType;
use std::path::PathBuf;

/// Volcado reducido de `spreadsheets.get?includeGridData=true`: la hora de la
/// columna 2 está en un rango combinado que arranca en la columna 1.
const GRID_JSON: &str = r#"
{
  "sheets": [
    {
      "properties": { "title": "Wednesday" },
      "data": [{
        "rowData": [
          { "values": [
            {},
            { "formattedValue": "BS SE (2022)", "effectiveFormat": { "backgroundColor": { "red": 0.6431373, "green": 0.7607843, "blue": 0.95686275 } } }
          ] },
          {}, {}, {},
          { "values": [
            { "formattedValue": "Venue:" },
            { "formattedValue": "11:30-12:50" },
            {}
          ] },
          { "values": [
            { "formattedValue": "C-301" },
            { "formattedValue": "Software Design (SE-C)", "effectiveFormat": { "backgroundColor": { "red": 0.6431373, "green": 0.7607843, "blue": 0.95686275 } } },
            { "formattedValue": "Requirements-C", "effectiveFormat": { "backgroundColor": { "red": 0.6431373, "green": 0.7607843, "blue": 0.95686275 } } }
          ] }
        ]
      }],
      "merges": [
        { "startRowIndex": 4, "endRowIndex": 5, "startColumnIndex": 1, "endColumnIndex": 3 }
      ]
    },
    {
      "properties": { "title": "Contacts" },
      "data": [{ "rowData": [ { "values": [ { "formattedValue": "BS XX (2000)" } ] } ] }]
    }
  ]
}
"#;

#[test]
fn grid_json_feeds_the_engine() {
    let book = parse_grid_json(GRID_JSON).expect("Debe parsear el volcado de la API");
    assert_eq!(book.sheets.len(), 2);
    assert_eq!(book.weekday_sheets().count(), 1);

    let colors = extract_batch_colors(&book);
    assert_eq!(colors.labels(), vec!["BS SE (2022)".to_string()]);

    let report = get_timetable(&book, "BS SE (2022)", "c");
    let entries = report.entries();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.kind == SessionType::Class && e.room == "C-301"));
    let req = entries.iter().find(|e| e.course == "Requirements").expect("Debe existir Requirements");
    // celda vacía dentro del merge: hora del ancla
    assert_eq!(req.time_slot, "11:30-12:50");
}

#[test]
fn malformed_json_is_an_error() {
    assert!(parse_grid_json("{ not json").is_err());
}

#[test]
fn unconfigured_source_is_reported() {
    let settings = Settings::default();
    assert!(matches!(resolve_source_path(&settings), Err(SourceError::NotConfigured)));

    let missing = Settings {
        source: Some("definitely-missing-timetable.json".to_string()),
        ..Settings::default()
    };
    match fetch_spreadsheet(&missing) {
        Err(SourceError::NotFound(name)) => assert_eq!(name, "definitely-missing-timetable.json"),
        other => panic!("se esperaba NotFound, llegó {:?}", other.map(|b| b.sheets.len())),
    }
}

#[test]
fn json_file_round_trip_through_loader() {
    let dir = std::env::temp_dir().join(format!("fcs-timetable-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("Debe crear el directorio temporal");
    let path: PathBuf = dir.join("timetable.json");
    std::fs::write(&path, GRID_JSON).expect("Debe escribir el fixture");

    let book = load_spreadsheet(&path).expect("Debe leer el JSON desde disco");
    assert_eq!(book.weekday_sheets().count(), 1);

    let settings = Settings {
        source: Some("timetable.json".to_string()),
        data_dir: Some(dir.to_string_lossy().to_string()),
        ..Settings::default()
    };
    assert_eq!(resolve_source_path(&settings).expect("Debe resolver en data_dir"), path);
    let cached = fetch_spreadsheet(&settings).expect("Debe leer vía caché");
    assert_eq!(cached.sheets.len(), 2);
    let (hits_before, _, _) = cache_stats();
    let again = fetch_spreadsheet(&settings).expect("Debe leer vía caché");
    assert!(std::sync::Arc::ptr_eq(&cached, &again));
    let (hits_after, _, entries) = cache_stats();
    assert!(hits_after > hits_before);
    assert!(entries >= 1);

    let bad = dir.join("timetable.csv");
    std::fs::write(&bad, "a,b").expect("Debe escribir el csv");
    assert!(matches!(load_spreadsheet(&bad), Err(SourceError::UnsupportedFormat { .. })));

    let _ = std::fs::remove_dir_all(&dir);
}
