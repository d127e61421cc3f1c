// Biblioteca raíz del crate `fcs_timetable`.
// Reexporta los módulos principales: la lectura de la hoja (`excel`), el motor
// de extracción (`algorithm`), la selección por sesión y el servidor HTTP.
pub mod config;
pub mod error;
pub mod models;
pub mod excel;
pub mod algorithm;
pub mod session;
pub mod api_json;
pub mod server;

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
