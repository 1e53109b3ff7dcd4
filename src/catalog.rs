use crate::models::CatalogEntry;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown catalog entry '{0}'")]
    UnknownEntry(String),
}

/// Single-select disclosure over the catalog rows: at most one row is expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<String>,
}

impl Selection {
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected() == Some(id)
    }

    /// Collapses `id` if it is already expanded, otherwise expands it in place of any other row.
    pub fn select(&self, id: &str) -> Self {
        let selected = if self.is_selected(id) {
            None
        } else {
            Some(id.to_string())
        };
        Self { selected }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogBrowser {
    entries: Arc<[CatalogEntry]>,
    selection: Selection,
}

#[derive(Debug, Serialize)]
pub struct CatalogSnapshot {
    pub entries: Vec<CatalogRow>,
    pub selected: Option<CatalogEntry>,
}

#[derive(Debug, Serialize)]
pub struct CatalogRow {
    pub id: String,
    pub name: String,
    pub subentry_count: usize,
}

impl CatalogBrowser {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries: entries.into(),
            selection: Selection::default(),
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        let id = self.selection.selected()?;
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn select(&self, id: &str) -> Result<Self, CatalogError> {
        if !self.entries.iter().any(|entry| entry.id == id) {
            return Err(CatalogError::UnknownEntry(id.to_string()));
        }
        Ok(Self {
            entries: Arc::clone(&self.entries),
            selection: self.selection.select(id),
        })
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            entries: self
                .entries
                .iter()
                .map(|entry| CatalogRow {
                    id: entry.id.clone(),
                    name: entry.name.clone(),
                    subentry_count: entry.subentries.len(),
                })
                .collect(),
            selected: self.selected_entry().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubEntry;

    fn entry(id: &str, subentries: usize) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            name: format!("Pesquisa {id}"),
            subentries: (0..subentries)
                .map(|index| SubEntry {
                    id: format!("{id}{index}"),
                    name: format!("Agregado {index}"),
                })
                .collect(),
        }
    }

    #[test]
    fn selecting_same_id_collapses() {
        let selection = Selection::default().select("A");
        assert_eq!(selection.selected(), Some("A"));
        assert_eq!(selection.select("A").selected(), None);
    }

    #[test]
    fn selecting_other_id_moves_expansion() {
        let selection = Selection::default().select("A").select("B");
        assert_eq!(selection.selected(), Some("B"));
        assert!(!selection.is_selected("A"));
    }

    #[test]
    fn browser_rejects_unknown_ids() {
        let browser = CatalogBrowser::new(vec![entry("A", 2)]);
        assert_eq!(
            browser.select("Z").unwrap_err(),
            CatalogError::UnknownEntry("Z".to_string())
        );
    }

    #[test]
    fn snapshot_reports_counts_and_selected_entry() {
        let browser = CatalogBrowser::new(vec![entry("A", 2), entry("B", 3)]);
        let selected = browser.select("B").unwrap();
        assert!(browser.selection().selected().is_none());

        let snapshot = selected.snapshot();
        assert_eq!(snapshot.entries.len(), 2);
        assert_eq!(snapshot.entries[1].subentry_count, 3);
        let detail = snapshot.selected.expect("selected entry");
        assert_eq!(detail.id, "B");
        assert_eq!(detail.subentries[0].id, "B0");
    }
}
