use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Known chart types and the labels shown next to a previewed query.
const CHART_LABELS: &[(&str, &str)] = &[
    ("line", "Line"),
    ("bar", "Bar - Horizontal"),
    ("verticalbar", "Bar - Vertical"),
    ("bubble", "Bubble"),
    ("histogram", "Histogram"),
    ("scatterplot", "Scatterplot"),
    ("pie", "Pie"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRecord {
    pub id: String,
    pub name: String,
    pub query_text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_by: String,
    #[serde(default)]
    pub connection_id: Option<String>,
    pub modified_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_configuration: Option<ChartConfiguration>,
}

impl QueryRecord {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Label of the configured chart, if the chart type is one we know about
    pub fn chart_label(&self) -> Option<&'static str> {
        let chart_type = self.chart_configuration.as_ref()?.chart_type.as_deref()?;
        chart_label(chart_type)
    }
}

/// Chart settings attached to a saved query. Only `chartType` is interpreted,
/// everything else is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

pub fn chart_label(chart_type: &str) -> Option<&'static str> {
    CHART_LABELS
        .iter()
        .find(|(kind, _)| *kind == chart_type)
        .map(|(_, label)| *label)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSavedQuery {
    pub name: String,
    pub query_text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_by: String,
    pub connection_id: Option<String>,
    #[serde(default)]
    pub chart_configuration: Option<ChartConfiguration>,
}

/// Everything the preview pane shows for the record in focus
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPreview {
    pub id: String,
    pub name: String,
    pub query_text: String,
    pub chart_label: Option<&'static str>,
    pub modified_date: DateTime<Utc>,
    pub created_by: String,
}

impl From<&QueryRecord> for QueryPreview {
    fn from(record: &QueryRecord) -> Self {
        QueryPreview {
            id: record.id.clone(),
            name: record.name.clone(),
            query_text: record.query_text.clone(),
            chart_label: record.chart_label(),
            modified_date: record.modified_date,
            created_by: record.created_by.clone(),
        }
    }
}
