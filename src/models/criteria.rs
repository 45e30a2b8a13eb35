use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    ModifiedDate,
    Name,
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortBy::ModifiedDate => write!(f, "modifiedDate"),
            SortBy::Name => write!(f, "name"),
        }
    }
}

impl From<&str> for SortBy {
    /// Anything other than `name` sorts by modification date.
    fn from(value: &str) -> Self {
        match value {
            "name" => SortBy::Name,
            _ => SortBy::ModifiedDate,
        }
    }
}

/// The user's current filter and sort selections. `None` means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub search_input: Option<String>,
    pub connection_id: Option<String>,
    pub tag: Option<String>,
    pub created_by: Option<String>,
    #[serde(default)]
    pub sort_by: SortBy,
}

impl FilterCriteria {
    /// Search terms, lowercased. Empty when the input is missing or only whitespace.
    pub fn search_terms(&self) -> Vec<String> {
        self.search_input
            .as_deref()
            .map(|input| input.split_whitespace().map(str::to_lowercase).collect())
            .unwrap_or_default()
    }

    pub fn apply(&mut self, change: CriterionChange) {
        match change {
            CriterionChange::SearchInput(value) => self.search_input = normalize(value),
            CriterionChange::ConnectionId(value) => self.connection_id = normalize(value),
            CriterionChange::Tag(value) => self.tag = normalize(value),
            CriterionChange::CreatedBy(value) => self.created_by = normalize(value),
            CriterionChange::SortBy(value) => self.sort_by = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CriterionField {
    SearchInput,
    ConnectionId,
    Tag,
    CreatedBy,
    SortBy,
}

impl CriterionField {
    /// Whether changing this field can change which records are visible
    pub fn affects_membership(self) -> bool {
        !matches!(self, CriterionField::SortBy)
    }
}

/// A single-field edit of [`FilterCriteria`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum CriterionChange {
    SearchInput(Option<String>),
    ConnectionId(Option<String>),
    Tag(Option<String>),
    CreatedBy(Option<String>),
    SortBy(SortBy),
}

impl CriterionChange {
    pub fn field(&self) -> CriterionField {
        match self {
            CriterionChange::SearchInput(_) => CriterionField::SearchInput,
            CriterionChange::ConnectionId(_) => CriterionField::ConnectionId,
            CriterionChange::Tag(_) => CriterionField::Tag,
            CriterionChange::CreatedBy(_) => CriterionField::CreatedBy,
            CriterionChange::SortBy(_) => CriterionField::SortBy,
        }
    }
}

/// Select controls report "All" as an empty string
fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
