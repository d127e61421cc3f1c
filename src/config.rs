//! Configuración a partir de variables de entorno (acepta un `.env` local).

use std::env;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Ruta o nombre del origen (`.xlsx` o volcado JSON de la API de Sheets).
    pub source: Option<String>,
    pub data_dir: Option<String>,
    pub bind: String,
    pub cache_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            source: None,
            data_dir: None,
            bind: DEFAULT_BIND.to_string(),
            cache_enabled: true,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        // .env es opcional
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Versión parametrizable para pruebas: `lookup` sustituye a `env::var`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let cache_enabled = match non_empty("TIMETABLE_CACHE") {
            Some(v) => !matches!(v.to_lowercase().as_str(), "0" | "false" | "off" | "no"),
            None => true,
        };

        Settings {
            source: non_empty("TIMETABLE_SOURCE"),
            data_dir: non_empty("TIMETABLE_DATA_DIR"),
            bind: non_empty("TIMETABLE_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            cache_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_nothing_is_set() {
        let s = Settings::from_lookup(|_| None);
        assert!(s.source.is_none());
        assert_eq!(s.bind, DEFAULT_BIND);
        assert!(s.cache_enabled);
    }

    #[test]
    fn reads_values_and_disables_cache() {
        let vars: HashMap<&str, &str> = [
            ("TIMETABLE_SOURCE", "timetable.json"),
            ("TIMETABLE_BIND", "0.0.0.0:9000"),
            ("TIMETABLE_CACHE", "false"),
            ("TIMETABLE_DATA_DIR", "  "),
        ]
        .into_iter()
        .collect();
        let s = Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(s.source.as_deref(), Some("timetable.json"));
        assert_eq!(s.bind, "0.0.0.0:9000");
        assert!(!s.cache_enabled);
        assert!(s.data_dir.is_none());
    }
}
