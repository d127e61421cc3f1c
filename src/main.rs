// --- Horarios por colores - Archivo principal ---

use fcs_timetable::config::Settings;
use fcs_timetable::run_server;
use log::info;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env();
    info!("=== Horarios por colores (API) ===");
    info!("source: {:?}, cache: {}", settings.source, settings.cache_enabled);
    run_server(settings).await
}
