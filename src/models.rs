use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Placeholder the SIDRA source emits in its header row instead of a value.
pub const SENTINEL: &str = "Valor";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubEntry {
    pub id: String,
    #[serde(rename(deserialize = "nome"))]
    pub name: String,
}

/// One row of the IBGE aggregate catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(rename(deserialize = "nome"))]
    pub name: String,
    #[serde(rename(deserialize = "agregados"))]
    pub subentries: Vec<SubEntry>,
}

/// One period x variable x group measurement from SIDRA table 1419.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRecord {
    #[serde(rename(deserialize = "D3C"))]
    pub period_code: String,
    #[serde(rename(deserialize = "D3N"))]
    pub period_name: String,
    #[serde(rename(deserialize = "D2C"))]
    pub variable_code: String,
    #[serde(rename(deserialize = "D2N"))]
    pub variable_name: String,
    #[serde(rename(deserialize = "D4C"))]
    pub group_code: String,
    #[serde(rename(deserialize = "D4N"))]
    pub group_name: String,
    #[serde(rename(deserialize = "V"))]
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Period,
    Variable,
    Group,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Period, Dimension::Variable, Dimension::Group];

    /// Display name of `record` along this dimension.
    pub fn of(self, record: &ValueRecord) -> &str {
        match self {
            Dimension::Period => &record.period_name,
            Dimension::Variable => &record.variable_name,
            Dimension::Group => &record.group_name,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Period => "period",
            Dimension::Variable => "variable",
            Dimension::Group => "group",
        }
    }
}

/// User-selected values per dimension. An empty set leaves that dimension unrestricted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActiveFilters {
    pub period: BTreeSet<String>,
    pub variable: BTreeSet<String>,
    pub group: BTreeSet<String>,
}

impl ActiveFilters {
    pub fn get(&self, dimension: Dimension) -> &BTreeSet<String> {
        match dimension {
            Dimension::Period => &self.period,
            Dimension::Variable => &self.variable,
            Dimension::Group => &self.group,
        }
    }

    fn get_mut(&mut self, dimension: Dimension) -> &mut BTreeSet<String> {
        match dimension {
            Dimension::Period => &mut self.period,
            Dimension::Variable => &mut self.variable,
            Dimension::Group => &mut self.group,
        }
    }

    pub fn is_empty(&self) -> bool {
        Dimension::ALL.iter().all(|dimension| self.get(*dimension).is_empty())
    }

    pub fn contains(&self, dimension: Dimension, value: &str) -> bool {
        self.get(dimension).contains(value)
    }

    /// Returns a new filter state with `value` flipped in `dimension`.
    pub fn toggle(&self, dimension: Dimension, value: &str) -> Self {
        let mut next = self.clone();
        let set = next.get_mut(dimension);
        if !set.remove(value) {
            set.insert(value.to_string());
        }
        next
    }
}
