// Parser de celdas de horario: sección, hora embebida, nombre limpio y sala.
//
// Los patrones se prueban en orden de prioridad y el primero que coincide
// decide la sección. La hoja es mantenida a mano, sin esquema fijo.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{BatchColorMap, Cell, ColorFingerprint};

pub(crate) fn regex(slot: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    slot.get_or_init(|| Regex::new(pattern).expect("static regex must compile"))
}

static QUALIFIED: OnceLock<Regex> = OnceLock::new();
static SUFFIX: OnceLock<Regex> = OnceLock::new();
static BARE: OnceLock<Regex> = OnceLock::new();
static SPACED: OnceLock<Regex> = OnceLock::new();
static EMBEDDED_TIME: OnceLock<Regex> = OnceLock::new();
static EMPTY_PARENS: OnceLock<Regex> = OnceLock::new();
static SECTION_LIST: OnceLock<Regex> = OnceLock::new();
static LIST_TOKEN: OnceLock<Regex> = OnceLock::new();
static DEPT_TOKEN: OnceLock<Regex> = OnceLock::new();
static YEAR: OnceLock<Regex> = OnceLock::new();
static ROOM_PREFIX: OnceLock<Regex> = OnceLock::new();

/// "(CS-A)": sección calificada con departamento
fn qualified_re() -> &'static Regex {
    regex(&QUALIFIED, r"\(([A-Z]{2,4})-([A-Z])\)")
}

/// "-A"
fn suffix_re() -> &'static Regex {
    regex(&SUFFIX, r"-([A-Z])\b")
}

/// "(A)"
fn bare_re() -> &'static Regex {
    regex(&BARE, r"\(([A-Z])\)")
}

/// " A "
fn spaced_re() -> &'static Regex {
    regex(&SPACED, r"\s([A-Z])\s")
}

/// "HH:MM" o "HH:MM-HH:MM"
pub(crate) fn embedded_time_re() -> &'static Regex {
    regex(&EMBEDDED_TIME, r"\b(\d{1,2}:\d{2})(?:\s*-\s*(\d{1,2}:\d{2}))?")
}

/// "(CS-A, CS-B)": celda compartida por varias secciones
fn section_list_re() -> &'static Regex {
    regex(
        &SECTION_LIST,
        r"\(\s*[A-Z]{2,4}-[A-Z](?:\s*,\s*[A-Z]{2,4}-[A-Z])+\s*\)",
    )
}

fn list_token_re() -> &'static Regex {
    regex(&LIST_TOKEN, r"([A-Z]{2,4})-([A-Z])")
}

/// Token de departamento "(XX-Y" al abrir paréntesis: "(CS-A)", "(CS-A, G-1)".
/// Un "OOP-A" suelto es nombre más sección, no departamento.
pub(crate) fn department_token_re() -> &'static Regex {
    regex(&DEPT_TOKEN, r"\(\s*([A-Z]{2,4})-([A-Z])\b")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMatch {
    /// Letra de sección, vacía si ningún patrón coincidió.
    pub section: String,
    /// Departamento del patrón "(DEPT-X)" cuando fue ése el que coincidió.
    pub department: Option<String>,
    /// Texto sin el patrón de sección, ya limpio.
    pub cleaned: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub name: String,
    pub section: String,
    pub department: String,
    /// Hora escrita en la propia celda; tiene prioridad sobre la cabecera.
    pub time_slot: Option<String>,
}

/// Elimina todas las apariciones de `re`, repitiendo hasta que no quede
/// ninguna (un reemplazo puede dejar expuesta otra coincidencia).
fn strip_all(re: &Regex, text: &str, replacement: &str) -> String {
    let mut out = text.to_string();
    while re.is_match(&out) {
        out = re.replace_all(&out, replacement).into_owned();
    }
    out
}

/// classify(text) -> {section, cleanedText} con el orden de patrones
/// "(DEPT-X)", "-X", "(X)", " X ".
pub fn classify(text: &str) -> SectionMatch {
    classify_for_department(text, None)
}

/// Igual que `classify`, pero el primer patrón exige el departamento dado
/// ("(CS-X)") cuando se conoce.
pub fn classify_for_department(text: &str, department: Option<&str>) -> SectionMatch {
    let qualified_for_dept = department
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| Regex::new(&format!(r"\(({})-([A-Z])\)", regex::escape(d.trim()))).ok());
    let qualified = qualified_for_dept.as_ref().unwrap_or_else(|| qualified_re());

    if let Some(caps) = qualified.captures(text) {
        return SectionMatch {
            section: caps[2].to_string(),
            department: Some(caps[1].to_string()),
            cleaned: clean_course_name(&strip_all(qualified, text, "")),
        };
    }

    if let Some(list) = section_list_re().find(text) {
        if let Some(first) = list_token_re().captures(list.as_str()) {
            return SectionMatch {
                section: first[2].to_string(),
                department: Some(first[1].to_string()),
                cleaned: clean_course_name(&strip_all(section_list_re(), text, "")),
            };
        }
    }

    let single_letter: [(&Regex, &str); 3] = [(suffix_re(), ""), (bare_re(), ""), (spaced_re(), " ")];
    for (re, replacement) in single_letter {
        if let Some(caps) = re.captures(text) {
            return SectionMatch {
                section: caps[1].to_string(),
                department: None,
                cleaned: clean_course_name(&strip_all(re, text, replacement)),
            };
        }
    }

    SectionMatch {
        section: String::new(),
        department: None,
        cleaned: clean_course_name(text),
    }
}

/// Secciones de una celda compartida "(CS-A, CS-B)", en orden y sin repetir.
/// Vacío si la celda no trae lista.
pub fn listed_sections(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    if let Some(list) = section_list_re().find(text) {
        for caps in list_token_re().captures_iter(list.as_str()) {
            let letter = caps[2].to_string();
            if !out.contains(&letter) {
                out.push(letter);
            }
        }
    }
    out
}

/// Filtro por una sección concreta: acepta la celda si cualquiera de los
/// patrones ("(DEPT-S)", lista "(DEPT-S, DEPT-T)", "-S", "(S)", " S ") la
/// nombra, y devuelve el texto sin el patrón que coincidió.
///
/// Con la sección vacía sólo pasan celdas sin ningún patrón de sección.
#[derive(Debug, Clone)]
pub struct SectionFilter {
    section: String,
    department: Option<String>,
    qualified: Option<Regex>,
    suffix: Option<Regex>,
    bare: Option<Regex>,
    spaced: Option<Regex>,
}

impl SectionFilter {
    pub fn new(section: &str, department: Option<&str>) -> Self {
        let section = section.trim().to_uppercase();
        let department = department.map(str::trim).filter(|d| !d.is_empty()).map(str::to_string);
        if section.is_empty() {
            return SectionFilter {
                section,
                department,
                qualified: None,
                suffix: None,
                bare: None,
                spaced: None,
            };
        }
        let s = regex::escape(&section);
        let dept = department
            .as_deref()
            .map(regex::escape)
            .unwrap_or_else(|| "[A-Z]{2,4}".to_string());
        SectionFilter {
            qualified: Regex::new(&format!(r"\(({})-{}\)", dept, s)).ok(),
            suffix: Regex::new(&format!(r"-{}\b", s)).ok(),
            bare: Regex::new(&format!(r"\({}\)", s)).ok(),
            spaced: Regex::new(&format!(r"\s{}\s", s)).ok(),
            section,
            department,
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    /// Texto limpio si la celda es de esta sección.
    pub fn strip(&self, text: &str) -> Option<String> {
        if self.section.is_empty() {
            let m = classify_for_department(text, self.department.as_deref());
            return if m.section.is_empty() { Some(m.cleaned) } else { None };
        }

        if let Some(re) = self.qualified.as_ref().filter(|re| re.is_match(text)) {
            return Some(clean_course_name(&strip_all(re, text, "")));
        }
        if let Some(list) = section_list_re().find(text) {
            let listed = list_token_re()
                .captures_iter(list.as_str())
                .any(|caps| caps[2] == *self.section);
            if listed {
                let rest = format!("{}{}", &text[..list.start()], &text[list.end()..]);
                return Some(clean_course_name(&rest));
            }
        }
        for (re, replacement) in [(&self.suffix, ""), (&self.bare, "")] {
            if let Some(re) = re.as_ref().filter(|re| re.is_match(text)) {
                return Some(clean_course_name(&strip_all(re, text, replacement)));
            }
        }
        // " S " sólo cuenta si la celda no marca otra sección con un patrón más fuerte
        let marked = qualified_re().is_match(text)
            || section_list_re().is_match(text)
            || suffix_re().is_match(text)
            || bare_re().is_match(text);
        match self.spaced.as_ref() {
            Some(re) if !marked && re.is_match(text) => Some(clean_course_name(&strip_all(re, text, " "))),
            _ => None,
        }
    }
}

/// Busca una hora embebida. Devuelve (texto sin la hora, franja normalizada).
/// La franja conserva el formato escrito sin espacios: "14:00-15:30".
pub fn parse_embedded_time(text: &str) -> (String, Option<String>) {
    let re = embedded_time_re();
    let slot = re.captures(text).map(|caps| match caps.get(2) {
        Some(end) => format!("{}-{}", &caps[1], end.as_str()),
        None => caps[1].to_string(),
    });
    match slot {
        Some(slot) => (strip_all(re, text, " "), Some(slot)),
        None => (text.to_string(), None),
    }
}

/// Limpieza final del nombre: paréntesis vacíos, espacios repetidos y guion final.
pub fn clean_course_name(name: &str) -> String {
    let no_parens = strip_all(regex(&EMPTY_PARENS, r"\(\s*\)"), name, "");
    let mut out = no_parens.split_whitespace().collect::<Vec<_>>().join(" ");
    while out.ends_with('-') {
        out.pop();
        out = out.trim_end().to_string();
    }
    out
}

/// Interpreta el texto de una celda de curso: primero la hora embebida,
/// luego la sección sobre el resto.
pub fn parse_course_entry(text: &str, batch: &str) -> Option<ParsedEntry> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let (without_time, time_slot) = parse_embedded_time(text);
    let m = classify(&without_time);
    Some(ParsedEntry {
        name: m.cleaned,
        section: m.section,
        department: department_from_batch(batch),
        time_slot,
    })
}

/// Una celda es candidata a curso si su color está en el mapa de lotes y su
/// texto no está vacío. Devuelve la etiqueta de lote y la huella.
pub fn course_cell<'a>(cell: &Cell, colors: &'a BatchColorMap) -> Option<(&'a str, ColorFingerprint)> {
    if cell.text.trim().is_empty() {
        return None;
    }
    let fp = cell.fingerprint()?;
    let batch = colors.get(&fp)?;
    Some((batch, fp))
}

/// Departamento a partir de la etiqueta del lote:
/// "BS-CS-1" -> "CS"; "BS CS (2024)" -> "CS".
pub fn department_from_batch(batch: &str) -> String {
    if batch.contains('-') {
        let parts: Vec<&str> = batch.split('-').collect();
        if parts.len() >= 2 {
            return parts[1].trim().to_string();
        }
        return String::new();
    }
    let re = regex(&DEPT_TOKEN_IN_BATCH, r"\b[A-Z]{2,4}\b");
    re.find_iter(batch)
        .map(|m| m.as_str())
        .find(|t| *t != "BS")
        .map(str::to_string)
        .unwrap_or_default()
}

static DEPT_TOKEN_IN_BATCH: OnceLock<Regex> = OnceLock::new();

/// Año del lote ("BS CS (2024)" -> "2024"), si lo hay.
pub fn year_token(batch: &str) -> Option<&str> {
    regex(&YEAR, r"20\d{2}").find(batch).map(|m| m.as_str())
}

/// Limpia el texto de la columna de sala: quita rótulos iniciales
/// ("Room", "Room No.", "Location", "Venue", "No."), puntuación final, y
/// normaliza vacío a "Unknown".
pub fn clean_room(raw: &str) -> String {
    let re = regex(
        &ROOM_PREFIX,
        r"(?i)^\s*(?:room\s*no\.?|room\s*number|rooms?|location|venue|no\.|no\s)\s*[:#]?\s*",
    );
    let stripped = re.replace(raw.trim(), "");
    let cleaned = stripped
        .trim()
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ':' | ';' | '-'))
        .trim();
    if cleaned.is_empty() {
        "Unknown".to_string()
    } else {
        cleaned.to_string()
    }
}
