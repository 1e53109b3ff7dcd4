use crate::filters::{Vocabulary, apply_filters, clean_records};
use crate::models::{ActiveFilters, Dimension, ValueRecord};
use crate::pager::{
    ITEMS_PER_PAGE, MAX_VISIBLE_PAGES, clamp_page, page_bounds, paginate, total_pages,
    visible_page_window,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExplorerError {
    #[error("'{value}' is not a known {} value", .dimension.as_str())]
    UnknownValue { dimension: Dimension, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ExplorerAction {
    Toggle { dimension: Dimension, value: String },
    ClearFilters,
    GoToPage { page: usize },
}

/// Indexed-value explorer state. Transitions return a new value and leave `self` untouched.
#[derive(Debug, Clone)]
pub struct Explorer {
    records: Arc<[ValueRecord]>,
    vocabulary: Arc<Vocabulary>,
    filters: ActiveFilters,
    page: usize,
}

#[derive(Debug, Serialize)]
pub struct ExplorerSnapshot {
    pub total_records: usize,
    pub filtered_records: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub page_window: Vec<usize>,
    pub showing_from: usize,
    pub showing_to: usize,
    pub rows: Vec<ValueRecord>,
    pub filters: ActiveFilters,
    pub vocabulary: Vocabulary,
    pub periods_by_year: BTreeMap<String, Vec<String>>,
}

impl Explorer {
    /// Cleans the raw rows first so vocabularies and the table see the same records.
    pub fn from_records(raw: Vec<ValueRecord>) -> Self {
        let records = clean_records(raw);
        let vocabulary = Vocabulary::from_records(&records);
        Self {
            records: records.into(),
            vocabulary: Arc::new(vocabulary),
            filters: ActiveFilters::default(),
            page: 1,
        }
    }

    pub fn records(&self) -> &[ValueRecord] {
        &self.records
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn filters(&self) -> &ActiveFilters {
        &self.filters
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn filtered(&self) -> Vec<&ValueRecord> {
        apply_filters(&self.records, &self.filters)
    }

    pub fn apply(&self, action: ExplorerAction) -> Result<Self, ExplorerError> {
        let next = match action {
            ExplorerAction::Toggle { dimension, value } => {
                if !self.vocabulary.contains(dimension, &value) {
                    return Err(ExplorerError::UnknownValue { dimension, value });
                }
                self.with_filters(self.filters.toggle(dimension, &value))
            }
            ExplorerAction::ClearFilters => self.with_filters(ActiveFilters::default()),
            ExplorerAction::GoToPage { page } => {
                let total = total_pages(self.filtered().len(), ITEMS_PER_PAGE);
                Self {
                    page: clamp_page(page, total),
                    ..self.clone()
                }
            }
        };
        Ok(next)
    }

    fn with_filters(&self, filters: ActiveFilters) -> Self {
        Self {
            records: Arc::clone(&self.records),
            vocabulary: Arc::clone(&self.vocabulary),
            filters,
            page: 1,
        }
    }

    pub fn snapshot(&self) -> ExplorerSnapshot {
        let filtered = self.filtered();
        let total = total_pages(filtered.len(), ITEMS_PER_PAGE);
        let (showing_from, showing_to) = page_bounds(self.page, ITEMS_PER_PAGE, filtered.len());
        ExplorerSnapshot {
            total_records: self.records.len(),
            filtered_records: filtered.len(),
            page: self.page,
            page_size: ITEMS_PER_PAGE,
            total_pages: total,
            page_window: visible_page_window(self.page, total, MAX_VISIBLE_PAGES),
            showing_from,
            showing_to,
            rows: paginate(&filtered, self.page, ITEMS_PER_PAGE)
                .iter()
                .map(|record| (*record).clone())
                .collect(),
            filters: self.filters.clone(),
            vocabulary: (*self.vocabulary).clone(),
            periods_by_year: self.vocabulary.periods_by_year(),
        }
    }
}
