// Motor de extracción y emparejamiento del horario.
//
// Flujo: hoja -> mapa de colores (`color_key`) -> disposición de cada hoja
// (`layout`) -> interpretación de celdas (`entry`) -> registros emparejados
// (`batch`, `custom`) -> tablas (`render`).
//
// Todas las funciones son puras sobre un `Spreadsheet` ya leído: no guardan
// estado entre llamadas, así que consultas concurrentes no necesitan bloqueo.

pub mod color_key;
pub mod layout;
pub mod entry;
pub mod slots;
pub mod catalog;
pub mod batch;
pub mod custom;
pub mod render;

pub use batch::{get_timetable, suggest_batch};
pub use catalog::{build_catalog, extract_all_courses, format_course_display, search_courses};
pub use color_key::{extract_batch_colors, extract_departments_and_batches};
pub use custom::{course_matches_cell, get_custom_timetable, normalize_course_name};
pub use entry::{classify, clean_room, listed_sections, parse_course_entry, ParsedEntry, SectionFilter, SectionMatch};
pub use layout::{RoomColumnSource, SheetLayout};
pub use render::{
    ReportColumns, TimetableReport, NO_BATCHES_MESSAGE, NO_CLASSES_MESSAGE, NO_COURSES_SELECTED_MESSAGE,
    WARNING_MARKER,
};
