use crate::models::{ActiveFilters, Dimension, SENTINEL, ValueRecord};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Distinct display names observed per dimension, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Vocabulary {
    pub period: Vec<String>,
    pub variable: Vec<String>,
    pub group: Vec<String>,
}

impl Vocabulary {
    pub fn from_records(records: &[ValueRecord]) -> Self {
        Self {
            period: derive_vocabulary(records, Dimension::Period),
            variable: derive_vocabulary(records, Dimension::Variable),
            group: derive_vocabulary(records, Dimension::Group),
        }
    }

    pub fn get(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Period => &self.period,
            Dimension::Variable => &self.variable,
            Dimension::Group => &self.group,
        }
    }

    pub fn contains(&self, dimension: Dimension, value: &str) -> bool {
        self.get(dimension).iter().any(|known| known == value)
    }

    pub fn periods_by_year(&self) -> BTreeMap<String, Vec<String>> {
        group_by_year(&self.period)
    }
}

/// Drops header/placeholder rows whose value is the sentinel.
pub fn clean_records(records: Vec<ValueRecord>) -> Vec<ValueRecord> {
    records
        .into_iter()
        .filter(|record| record.value != SENTINEL)
        .collect()
}

pub fn derive_vocabulary(records: &[ValueRecord], dimension: Dimension) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for record in records {
        let value = dimension.of(record);
        if value == SENTINEL || !seen.insert(value) {
            continue;
        }
        values.push(value.to_string());
    }
    values
}

/// Groups period labels under their trailing four characters.
///
/// Labels keep the order they were received in; the map iterates years ascending.
pub fn group_by_year<S: AsRef<str>>(labels: &[S]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for label in labels {
        let label = label.as_ref();
        grouped
            .entry(year_key(label).to_string())
            .or_default()
            .push(label.to_string());
    }
    grouped
}

fn year_key(label: &str) -> &str {
    match label.char_indices().rev().nth(3) {
        Some((index, _)) => &label[index..],
        None => label,
    }
}

pub fn matches(record: &ValueRecord, filters: &ActiveFilters) -> bool {
    Dimension::ALL.iter().all(|dimension| {
        let selected = filters.get(*dimension);
        selected.is_empty() || selected.contains(dimension.of(record))
    })
}

pub fn apply_filters<'a>(records: &'a [ValueRecord], filters: &ActiveFilters) -> Vec<&'a ValueRecord> {
    records
        .iter()
        .filter(|record| matches(record, filters))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(period: &str, variable: &str, group: &str, value: &str) -> ValueRecord {
        ValueRecord {
            period_code: format!("code {period}"),
            period_name: period.to_string(),
            variable_code: format!("code {variable}"),
            variable_name: variable.to_string(),
            group_code: format!("code {group}"),
            group_name: group.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn clean_records_drops_sentinel_rows() {
        let records = vec![
            record("Mês", "Variável", "Geral", SENTINEL),
            record("janeiro 2020", "X", "A", "0,21"),
        ];
        let cleaned = clean_records(records);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].period_name, "janeiro 2020");

        let vocabulary = Vocabulary::from_records(&cleaned);
        assert_eq!(vocabulary.period, vec!["janeiro 2020"]);
        assert!(!vocabulary.contains(Dimension::Variable, "Variável"));
    }

    #[test]
    fn vocabulary_dedups_in_first_seen_order_and_skips_sentinel() {
        let records = vec![
            record("fevereiro 2020", "Y", "B", "1"),
            record("janeiro 2020", "X", SENTINEL, "2"),
            record("fevereiro 2020", "X", "A", "3"),
        ];
        assert_eq!(
            derive_vocabulary(&records, Dimension::Period),
            vec!["fevereiro 2020", "janeiro 2020"]
        );
        assert_eq!(derive_vocabulary(&records, Dimension::Variable), vec!["Y", "X"]);
        assert_eq!(derive_vocabulary(&records, Dimension::Group), vec!["B", "A"]);
    }

    #[test]
    fn group_by_year_keeps_insertion_order() {
        let grouped = group_by_year(&["janeiro 2020", "fevereiro 2020", "janeiro 2021"]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["2020"], vec!["janeiro 2020", "fevereiro 2020"]);
        assert_eq!(grouped["2021"], vec!["janeiro 2021"]);
        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["2020", "2021"]);
    }

    #[test]
    fn group_by_year_handles_short_and_accented_labels() {
        let grouped = group_by_year(&["ano", "março 1999"]);
        assert_eq!(grouped["ano"], vec!["ano"]);
        assert_eq!(grouped["1999"], vec!["março 1999"]);
    }

    #[test]
    fn apply_filters_and_across_or_within() {
        let records = vec![
            record("jan 2020", "X", "A", "1"),
            record("feb 2020", "Y", "A", "2"),
            record("feb 2020", "X", "B", "3"),
        ];

        let only_january = ActiveFilters::default().toggle(Dimension::Period, "jan 2020");
        let passed = apply_filters(&records, &only_january);
        assert_eq!(passed, vec![&records[0]]);

        let either_variable = ActiveFilters::default()
            .toggle(Dimension::Variable, "X")
            .toggle(Dimension::Variable, "Y")
            .toggle(Dimension::Group, "A");
        let passed = apply_filters(&records, &either_variable);
        assert_eq!(passed, vec![&records[0], &records[1]]);

        assert_eq!(apply_filters(&records, &ActiveFilters::default()).len(), 3);
    }

    #[test]
    fn apply_filters_with_no_match_is_empty() {
        let records = vec![record("jan 2020", "X", "A", "1")];
        let filters = ActiveFilters::default().toggle(Dimension::Group, "Z");
        assert!(apply_filters(&records, &filters).is_empty());
    }

    #[test]
    fn toggle_twice_restores_original() {
        let original = ActiveFilters::default().toggle(Dimension::Group, "A");
        let toggled = original.toggle(Dimension::Period, "jan 2020");
        assert!(toggled.contains(Dimension::Period, "jan 2020"));
        assert!(!original.contains(Dimension::Period, "jan 2020"));
        assert_eq!(toggled.toggle(Dimension::Period, "jan 2020"), original);
        assert_eq!(original.toggle(Dimension::Group, "A"), ActiveFilters::default());
    }
}
