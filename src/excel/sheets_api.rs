//! Lectura del volcado JSON de `spreadsheets.get?includeGridData=true`.
//!
//! Sólo se modela lo que consume el motor: título de hoja, `formattedValue`,
//! `effectiveFormat.backgroundColor` y los rangos combinados.

use serde::Deserialize;
use std::path::Path;

use crate::error::SourceError;
use crate::models::{Cell, CellColor, MergeRange, Sheet, Spreadsheet};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSpreadsheet {
    #[serde(default)]
    sheets: Vec<ApiSheet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSheet {
    #[serde(default)]
    properties: ApiSheetProperties,
    #[serde(default)]
    data: Vec<ApiGridData>,
    #[serde(default)]
    merges: Vec<ApiGridRange>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiSheetProperties {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiGridData {
    #[serde(default)]
    row_data: Vec<ApiRowData>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiRowData {
    #[serde(default)]
    values: Vec<ApiCellData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCellData {
    formatted_value: Option<String>,
    effective_format: Option<ApiCellFormat>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCellFormat {
    background_color: Option<CellColor>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiGridRange {
    #[serde(default)]
    start_row_index: usize,
    #[serde(default)]
    end_row_index: usize,
    #[serde(default)]
    start_column_index: usize,
    #[serde(default)]
    end_column_index: usize,
}

impl From<ApiCellData> for Cell {
    fn from(c: ApiCellData) -> Self {
        // Con formato pero sin backgroundColor: la API omite canales en 0 -> negro
        let background = c
            .effective_format
            .map(|f| f.background_color.unwrap_or_default());
        Cell {
            text: c.formatted_value.unwrap_or_default(),
            background,
        }
    }
}

impl From<ApiSheet> for Sheet {
    fn from(s: ApiSheet) -> Self {
        // Sólo el primer bloque de datos (la petición sin rangos devuelve uno)
        let rows = s
            .data
            .into_iter()
            .next()
            .map(|g| {
                g.row_data
                    .into_iter()
                    .map(|r| r.values.into_iter().map(Cell::from).collect())
                    .collect()
            })
            .unwrap_or_default();
        let merges = s
            .merges
            .into_iter()
            .map(|m| MergeRange {
                start_row: m.start_row_index,
                end_row: m.end_row_index,
                start_col: m.start_column_index,
                end_col: m.end_column_index,
            })
            .collect();
        Sheet {
            title: s.properties.title,
            rows,
            merges,
        }
    }
}

/// Parsea el JSON de la API de Sheets ya en memoria.
pub fn parse_grid_json(json_str: &str) -> Result<Spreadsheet, serde_json::Error> {
    let api: ApiSpreadsheet = serde_json::from_str(json_str)?;
    Ok(Spreadsheet::new(api.sheets.into_iter().map(Sheet::from).collect()))
}

/// Lee un volcado JSON de la API de Sheets desde disco.
pub fn read_grid_json(path: &Path) -> Result<Spreadsheet, SourceError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_grid_json(&contents).map_err(|source| SourceError::Json {
        path: path.to_path_buf(),
        source,
    })
}
