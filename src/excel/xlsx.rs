//! Lectura de libros `.xlsx`.
//!
//! calamine entrega los valores visibles pero no el formato, así que el color
//! de relleno y los rangos combinados se leen aparte con umya-spreadsheet.

use calamine::{open_workbook_auto, Reader};
use log::{debug, warn};
use std::path::Path;

use crate::error::SourceError;
use crate::excel::io::{argb_to_color, data_to_string, parse_a1_range};
use crate::models::{Cell, MergeRange, Sheet, Spreadsheet};

pub fn read_xlsx(path: &Path) -> Result<Spreadsheet, SourceError> {
    let workbook_err = |message: String| SourceError::Workbook {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_err(e.to_string()))?;
    let styles = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| workbook_err(format!("{:?}", e)))?;

    let mut sheets = Vec::new();
    let sheet_names = workbook.sheet_names().to_owned();

    for name in sheet_names.iter() {
        let range = match workbook.worksheet_range(name) {
            Ok(r) => r,
            Err(e) => {
                warn!("skipping sheet '{}' in {}: {}", name, path.display(), e);
                continue;
            }
        };

        // calamine recorta filas/columnas vacías iniciales; reubicar en la grilla absoluta
        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
        for r in range.rows() {
            let mut row: Vec<Cell> = vec![Cell::default(); col_offset];
            row.extend(r.iter().map(|d| Cell::plain(data_to_string(d))));
            rows.push(row);
        }

        let mut merges: Vec<MergeRange> = Vec::new();
        match styles.get_sheet_by_name(name) {
            Some(ws) => {
                for cell in ws.get_cell_collection() {
                    let coord = cell.get_coordinate();
                    let row = coord.get_row_num().to_owned() as usize;
                    let col = coord.get_col_num().to_owned() as usize;
                    if row == 0 || col == 0 {
                        continue;
                    }
                    let color = cell
                        .get_style()
                        .get_background_color()
                        .and_then(|c| argb_to_color(c.get_argb()));
                    if let Some(color) = color {
                        set_background(&mut rows, row - 1, col - 1, color);
                    }
                }
                for m in ws.get_merge_cells() {
                    match parse_a1_range(&m.get_range()) {
                        Some(mr) => merges.push(mr),
                        None => warn!("couldn't parse merge range '{}' in sheet '{}'", m.get_range(), name),
                    }
                }
            }
            None => warn!("no style information for sheet '{}' in {}", name, path.display()),
        }

        debug!("sheet '{}': {} rows, {} merges", name, rows.len(), merges.len());
        sheets.push(Sheet {
            title: name.clone(),
            rows,
            merges,
        });
    }

    Ok(Spreadsheet::new(sheets))
}

fn set_background(rows: &mut Vec<Vec<Cell>>, row: usize, col: usize, color: crate::models::CellColor) {
    if rows.len() <= row {
        rows.resize(row + 1, Vec::new());
    }
    let r = &mut rows[row];
    if r.len() <= col {
        r.resize(col + 1, Cell::default());
    }
    r[col].background = Some(color);
}
