use calamine::Data;

use crate::models::{CellColor, MergeRange};

/// Convierte un `Data` de calamine al texto que mostraría la hoja.
///
/// Las horas guardadas como número de Excel se devuelven como "HH:MM" para que
/// las cabeceras de franja horaria se lean igual que en la API de Sheets.
pub fn data_to_string(d: &Data) -> String {
    match d {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if (f.floor() - f).abs() < f64::EPSILON {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Empty => String::new(),
        Data::Error(_) => String::new(),
        Data::DateTime(dt) => excel_time_to_hhmm(dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Parte horaria de un número de serie de Excel (fracción del día) como "HH:MM".
pub fn excel_time_to_hhmm(serial: f64) -> String {
    let total = (serial.fract() * 1440.0).round() as i64 % 1440;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Convierte letras de columna (ej: "AB") a índice 1-based (A=1)
pub fn column_letters_to_index(s: &str) -> usize {
    let mut acc = 0usize;
    for ch in s.chars() {
        if ch.is_ascii_alphabetic() {
            acc = acc * 26 + ((ch.to_ascii_uppercase() as u8 - b'A') as usize + 1);
        }
    }
    acc
}

/// "BC23" -> (22, 54), ambos 0-based.
pub fn parse_a1_cell(a1: &str) -> Option<(usize, usize)> {
    let a1 = a1.trim().replace('$', "");
    let split = a1.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = a1.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let row: usize = digits.parse().ok()?;
    let col = column_letters_to_index(letters);
    if row == 0 || col == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}

/// "A1:C2" -> rango combinado con finales exclusivos.
pub fn parse_a1_range(range: &str) -> Option<MergeRange> {
    let (start, end) = match range.split_once(':') {
        Some((a, b)) => (a, b),
        None => (range, range),
    };
    let (r0, c0) = parse_a1_cell(start)?;
    let (r1, c1) = parse_a1_cell(end)?;
    Some(MergeRange {
        start_row: r0.min(r1),
        end_row: r0.max(r1) + 1,
        start_col: c0.min(c1),
        end_col: c0.max(c1) + 1,
    })
}

/// "FFD9EAD3" (ARGB) o "D9EAD3" (RGB) -> canales 0..1.
pub fn argb_to_color(argb: &str) -> Option<CellColor> {
    let hex = argb.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let rgb = match hex.len() {
        8 => &hex[2..],
        6 => hex,
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(&rgb[i..i + 2], 16).ok().map(|v| v as f64 / 255.0);
    Some(CellColor::new(channel(0)?, channel(2)?, channel(4)?))
}
