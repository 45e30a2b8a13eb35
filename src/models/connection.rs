use serde::{Deserialize, Serialize};

/// A database connection a saved query may be bound to. Only the id and the
/// display name are needed to populate the connection filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    pub id: String,
    pub name: String,
}

impl ConnectionRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        ConnectionRecord {
            id: id.into(),
            name: name.into(),
        }
    }
}
