// Localizador de la disposición de una hoja de día: fila de horas de clase,
// fila de horas de laboratorio y columna de sala. Ninguna está en una posición
// fija entre revisiones de la planilla, salvo la fila de horas de clase.

use log::debug;

use crate::algorithm::entry::{clean_room, embedded_time_re};
use crate::models::{SessionType, Sheet};

/// Filas reservadas para las etiquetas de lote.
pub const HEADER_BAND_ROWS: usize = 4;
/// Fila (base 0) con las franjas horarias de clase, justo encima de los datos.
pub const CLASS_TIME_ROW: usize = 4;
/// Primera fila de datos (base 0).
pub const FIRST_DATA_ROW: usize = 5;

const ROOM_SCAN_ROWS: usize = 10;
const ROOM_KEYWORDS: [&str; 6] = ["room", "rooms", "room no", "room number", "location", "venue"];
const LAB_MARKER: &str = "Lab";

/// Cómo se encontró la columna de sala.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomColumnSource {
    /// Rótulo de cabecera ("Room", "Venue", ...)
    Header,
    /// Primera celda numérica o con "room"/"lab"
    Heuristic,
    /// Ninguna pista: columna 0
    Default,
}

#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub class_time_row: usize,
    pub lab_time_row: Option<usize>,
    pub room_column: usize,
    pub room_source: RoomColumnSource,
    /// Columnas cuyo encabezado (clase o lab) contiene una hora, ordenadas.
    time_columns: Vec<usize>,
}

impl SheetLayout {
    pub fn locate(sheet: &Sheet) -> SheetLayout {
        let lab_time_row = find_lab_time_row(sheet);
        let (room_column, room_source) = find_room_column(sheet);

        let width = sheet.rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let header_rows: Vec<usize> = std::iter::once(CLASS_TIME_ROW).chain(lab_time_row).collect();
        let time_columns: Vec<usize> = (0..width)
            .filter(|&col| {
                header_rows
                    .iter()
                    .any(|&row| embedded_time_re().is_match(sheet.display_text(row, col)))
            })
            .collect();

        debug!(
            "sheet '{}': lab header {:?}, room column {} ({:?}), {} time columns",
            sheet.title,
            lab_time_row,
            room_column,
            room_source,
            time_columns.len()
        );

        SheetLayout {
            class_time_row: CLASS_TIME_ROW,
            lab_time_row,
            room_column,
            room_source,
            time_columns,
        }
    }

    /// Las filas posteriores al rótulo "Lab" son siempre laboratorios.
    pub fn row_kind(&self, row: usize) -> SessionType {
        match self.lab_time_row {
            Some(lab) if row > lab => SessionType::Lab,
            _ => SessionType::Class,
        }
    }

    /// Índices de filas de datos; la propia fila de horas de laboratorio se omite.
    pub fn data_rows<'a>(&'a self, sheet: &'a Sheet) -> impl Iterator<Item = usize> + 'a {
        (FIRST_DATA_ROW..sheet.rows.len()).filter(move |&r| Some(r) != self.lab_time_row)
    }

    /// Franja horaria de la cabecera para la columna. Las filas de laboratorio
    /// leen la fila "Lab" y, si está vacía en esa columna, la de clases.
    pub fn header_time(&self, sheet: &Sheet, col: usize, kind: SessionType) -> Option<String> {
        let from_row = |row: usize| {
            let text = sheet.display_text(row, col);
            if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            }
        };
        match (kind, self.lab_time_row) {
            (SessionType::Lab, Some(lab)) => from_row(lab).or_else(|| from_row(self.class_time_row)),
            _ => from_row(self.class_time_row),
        }
    }

    /// Posición de la columna entre las columnas con hora de la hoja.
    pub fn column_rank(&self, col: usize) -> usize {
        self.time_columns.partition_point(|&c| c < col)
    }

    pub fn room_for_row(&self, sheet: &Sheet, row: usize) -> String {
        clean_room(sheet.display_text(row, self.room_column))
    }
}

/// Primera fila cuya columna 0 dice "Lab". Sólo se miran filas de datos: la
/// banda de cabecera puede nombrar lotes o cursos de laboratorio y no marca
/// el inicio del bloque.
fn find_lab_time_row(sheet: &Sheet) -> Option<usize> {
    (FIRST_DATA_ROW..sheet.rows.len()).find(|&r| sheet.text(r, 0).contains(LAB_MARKER))
}

fn is_room_keyword(text: &str) -> bool {
    let norm = text.trim().to_lowercase();
    let norm = norm.trim_end_matches(|c: char| c == '.' || c == ':').trim();
    ROOM_KEYWORDS.contains(&norm)
}

fn looks_like_room(text: &str) -> bool {
    let starts_numeric = text.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) && !text.contains(':');
    let lower = text.to_lowercase();
    starts_numeric || lower.contains("room") || lower.contains("lab")
}

/// Rótulo conocido en las 10 primeras filas, luego heurística, luego columna 0.
fn find_room_column(sheet: &Sheet) -> (usize, RoomColumnSource) {
    let scan = || sheet.rows.iter().take(ROOM_SCAN_ROWS);

    for row in scan() {
        if let Some(col) = row.iter().position(|c| is_room_keyword(&c.text)) {
            return (col, RoomColumnSource::Header);
        }
    }

    for row in scan() {
        if let Some(col) = row.iter().position(|c| looks_like_room(c.text.trim())) {
            return (col, RoomColumnSource::Heuristic);
        }
    }

    (0, RoomColumnSource::Default)
}
