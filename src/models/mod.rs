// Estructuras de datos principales

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Hojas que se consideran parte del horario, en el orden en que se muestran.
pub const WEEKDAY_SHEETS: [(&str, Weekday); 5] = [
    ("Monday", Weekday::Mon),
    ("Tuesday", Weekday::Tue),
    ("Wednesday", Weekday::Wed),
    ("Thursday", Weekday::Thu),
    ("Friday", Weekday::Fri),
];

/// Devuelve el día asociado a un título de hoja, o `None` si la hoja no es de horario.
pub fn weekday_from_title(title: &str) -> Option<Weekday> {
    WEEKDAY_SHEETS
        .iter()
        .find(|(name, _)| *name == title)
        .map(|(_, day)| *day)
}

/// Nombre de hoja (en inglés) para un día de la semana.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Color de fondo efectivo de una celda, cada canal normalizado a 0..1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CellColor {
    #[serde(default)]
    pub red: f64,
    #[serde(default)]
    pub green: f64,
    #[serde(default)]
    pub blue: f64,
}

impl CellColor {
    pub fn new(red: f64, green: f64, blue: f64) -> Self {
        CellColor { red, green, blue }
    }

    /// Huella canónica: los tres canales con 2 decimales, concatenados.
    /// Es un hash con pérdida; dos lotes con colores casi iguales colisionan.
    pub fn fingerprint(&self) -> ColorFingerprint {
        ColorFingerprint(format!("{:.2}{:.2}{:.2}", self.red, self.green, self.blue))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorFingerprint(pub String);

impl ColorFingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColorFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub text: String,
    /// `None` cuando la celda no trae formato efectivo.
    pub background: Option<CellColor>,
}

impl Cell {
    pub fn new(text: impl Into<String>, background: Option<CellColor>) -> Self {
        Cell { text: text.into(), background }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Cell { text: text.into(), background: None }
    }

    pub fn colored(text: impl Into<String>, color: CellColor) -> Self {
        Cell { text: text.into(), background: Some(color) }
    }

    /// Huella de color de una celda con formato; las celdas sin formato no tienen huella.
    pub fn fingerprint(&self) -> Option<ColorFingerprint> {
        self.background.as_ref().map(CellColor::fingerprint)
    }
}

/// Rango combinado, con filas/columnas finales exclusivas (igual que la API de Sheets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRange {
    pub start_row: usize,
    pub end_row: usize,
    pub start_col: usize,
    pub end_col: usize,
}

impl MergeRange {
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start_row && row < self.end_row && col >= self.start_col && col < self.end_col
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub title: String,
    pub rows: Vec<Vec<Cell>>,
    pub merges: Vec<MergeRange>,
}

impl Sheet {
    pub fn new(title: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Sheet { title: title.into(), rows, merges: Vec::new() }
    }

    pub fn with_merges(mut self, merges: Vec<MergeRange>) -> Self {
        self.merges = merges;
        self
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Texto de la celda recortado; cadena vacía si no existe.
    pub fn text(&self, row: usize, col: usize) -> &str {
        self.cell(row, col).map(|c| c.text.trim()).unwrap_or("")
    }

    /// Texto visible en (row, col) teniendo en cuenta rangos combinados: si la
    /// celda está vacía y pertenece a un merge, devuelve el texto del ancla.
    pub fn display_text(&self, row: usize, col: usize) -> &str {
        let own = self.text(row, col);
        if !own.is_empty() {
            return own;
        }
        match self.merges.iter().find(|m| m.contains(row, col)) {
            Some(m) => self.text(m.start_row, m.start_col),
            None => own,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Spreadsheet {
    pub sheets: Vec<Sheet>,
}

impl Spreadsheet {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Spreadsheet { sheets }
    }

    /// Hojas de lunes a viernes, en el orden en que aparecen en el libro.
    /// El resto de hojas se ignora por completo.
    pub fn weekday_sheets(&self) -> impl Iterator<Item = (Weekday, &Sheet)> {
        self.sheets
            .iter()
            .filter_map(|s| weekday_from_title(&s.title).map(|d| (d, s)))
    }
}

/// Mapa huella de color -> etiqueta de lote ("BS CS (2024)").
///
/// Conserva el orden de primera aparición para listar los lotes como aparecen
/// en la hoja. Una huella repetida con otra etiqueta sobrescribe la anterior.
#[derive(Debug, Clone, Default)]
pub struct BatchColorMap {
    labels: HashMap<ColorFingerprint, String>,
    order: Vec<ColorFingerprint>,
}

impl BatchColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta (última escritura gana). Devuelve la etiqueta previa si era distinta.
    pub fn insert(&mut self, fingerprint: ColorFingerprint, label: String) -> Option<String> {
        match self.labels.insert(fingerprint.clone(), label.clone()) {
            Some(prev) if prev != label => Some(prev),
            Some(_) => None,
            None => {
                self.order.push(fingerprint);
                None
            }
        }
    }

    pub fn get(&self, fingerprint: &ColorFingerprint) -> Option<&str> {
        self.labels.get(fingerprint).map(String::as_str)
    }

    pub fn contains(&self, fingerprint: &ColorFingerprint) -> bool {
        self.labels.contains_key(fingerprint)
    }

    /// Huellas (en orden de aparición) cuya etiqueta es exactamente `label`.
    pub fn fingerprints_for(&self, label: &str) -> Vec<&ColorFingerprint> {
        self.iter().filter(|(_, l)| *l == label).map(|(fp, _)| fp).collect()
    }

    /// Etiquetas de lote sin repetir, en orden de aparición.
    pub fn labels(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for fp in &self.order {
            if let Some(label) = self.labels.get(fp) {
                if !out.contains(label) {
                    out.push(label.clone());
                }
            }
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColorFingerprint, &str)> {
        self.order
            .iter()
            .filter_map(|fp| self.labels.get(fp).map(|l| (fp, l.as_str())))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Curso extraído del catálogo. La identidad es (name, department, section, batch):
/// `day`, `full_entry` y `color_code` no participan en igualdad ni hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRecord {
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub section: String,
    pub batch: String,
    #[serde(default)]
    pub full_entry: String,
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub color_code: String,
}

impl CourseRecord {
    pub fn key(&self) -> (&str, &str, &str, &str) {
        (&self.name, &self.department, &self.section, &self.batch)
    }
}

impl PartialEq for CourseRecord {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for CourseRecord {}

impl Hash for CourseRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    Class,
    Lab,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Class => "Class",
            SessionType::Lab => "Lab",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fila de horario producida por una consulta. No se persiste.
#[derive(Debug, Clone, Serialize)]
pub struct TimetableEntry {
    pub day: Weekday,
    pub time_slot: String,
    pub room: String,
    pub kind: SessionType,
    pub course: String,
    /// Posición de la columna entre las columnas con hora de la hoja.
    pub column_rank: usize,
    pub start: Option<NaiveTime>,
    /// Sólo en horarios personalizados.
    pub section: String,
    pub batch: String,
}
