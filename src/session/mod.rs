// Selección de cursos por sesión.
//
// Cada sesión tiene su propio `Selection`; el registro sólo los guarda por id
// y nunca se comparte una selección entre sesiones.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use crate::models::CourseRecord;

/// Últimos filtros de búsqueda usados en la sesión.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub batch: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    pub total_courses: usize,
    pub departments: BTreeSet<String>,
    pub batches: BTreeSet<String>,
    pub sections: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    courses: Vec<CourseRecord>,
    filters: SearchFilters,
    last_results: Vec<CourseRecord>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega el curso; `false` si ya estaba (misma identidad).
    pub fn add(&mut self, course: CourseRecord) -> bool {
        if self.contains(&course) {
            return false;
        }
        self.courses.push(course);
        true
    }

    /// Quita el curso; `false` si no estaba.
    pub fn remove(&mut self, course: &CourseRecord) -> bool {
        let before = self.courses.len();
        self.courses.retain(|c| c != course);
        self.courses.len() != before
    }

    pub fn contains(&self, course: &CourseRecord) -> bool {
        self.courses.iter().any(|c| c == course)
    }

    /// Cursos en orden de inserción.
    pub fn list(&self) -> &[CourseRecord] {
        &self.courses
    }

    pub fn clear(&mut self) {
        self.courses.clear();
    }

    pub fn summary(&self) -> SelectionSummary {
        SelectionSummary {
            total_courses: self.courses.len(),
            departments: self.courses.iter().map(|c| c.department.clone()).collect(),
            batches: self.courses.iter().map(|c| c.batch.clone()).collect(),
            sections: self.courses.iter().map(|c| c.section.clone()).collect(),
        }
    }

    pub fn update_filters(&mut self, query: &str, department: &str, batch: &str) {
        self.filters = SearchFilters {
            query: query.to_string(),
            department: department.to_string(),
            batch: batch.to_string(),
        };
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn save_results(&mut self, results: Vec<CourseRecord>) {
        self.last_results = results;
    }

    pub fn last_results(&self) -> &[CourseRecord] {
        &self.last_results
    }
}

/// Selecciones por id de sesión.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Selection>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ejecuta `f` sobre la selección de la sesión, creándola si no existe.
    pub fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut Selection) -> R) -> R {
        let mut guard = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        let selection = guard.entry(id.to_string()).or_default();
        f(selection)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(name: &str, section: &str, batch: &str, day: &str) -> CourseRecord {
        CourseRecord {
            name: name.into(),
            department: "CS".into(),
            section: section.into(),
            batch: batch.into(),
            full_entry: String::new(),
            day: day.into(),
            color_code: String::new(),
        }
    }

    #[test]
    fn add_remove_by_identity() {
        let mut sel = Selection::new();
        assert!(sel.add(course("OOP", "A", "BS CS (2024)", "Monday")));
        // otro día, misma identidad
        assert!(!sel.add(course("OOP", "A", "BS CS (2024)", "Friday")));
        assert!(sel.add(course("OOP", "B", "BS CS (2024)", "Monday")));
        assert_eq!(sel.list().len(), 2);

        assert!(sel.remove(&course("OOP", "A", "BS CS (2024)", "")));
        assert!(!sel.remove(&course("OOP", "A", "BS CS (2024)", "")));
        assert_eq!(sel.list()[0].section, "B");
        sel.clear();
        assert!(sel.list().is_empty());
    }

    #[test]
    fn summary_collects_sets() {
        let mut sel = Selection::new();
        assert_eq!(sel.summary(), SelectionSummary::default());
        sel.add(course("OOP", "A", "BS CS (2024)", ""));
        sel.add(course("DS", "A", "BS CS (2023)", ""));
        let s = sel.summary();
        assert_eq!(s.total_courses, 2);
        assert_eq!(s.batches.len(), 2);
        assert_eq!(s.sections.len(), 1);
    }

    #[test]
    fn sessions_are_isolated() {
        let registry = SessionRegistry::new();
        registry.with_session("a", |s| s.add(course("OOP", "A", "BS CS (2024)", "")));
        registry.with_session("b", |s| s.update_filters("net", "CS", ""));
        assert_eq!(registry.with_session("a", |s| s.list().len()), 1);
        assert_eq!(registry.with_session("b", |s| s.list().len()), 0);
        assert_eq!(registry.with_session("b", |s| s.filters().query.clone()), "net");
        assert_eq!(registry.len(), 2);
    }
}
