use serde::{Deserialize, Serialize};

use super::SortBy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSettings {
    /// Sort order a new session starts with
    pub default_sort_by: SortBy,
    /// Seed the author filter with the current user when they own queries
    pub default_to_current_user: bool,
    /// Put an optimistically removed query back when the store refuses the delete
    pub restore_on_delete_failure: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            default_sort_by: SortBy::ModifiedDate,
            default_to_current_user: true,
            restore_on_delete_failure: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub catalog: CatalogSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{"catalog":{"defaultSortBy":"name"}}"#).unwrap();
        assert_eq!(settings.catalog.default_sort_by, SortBy::Name);
        assert!(settings.catalog.default_to_current_user);
        assert!(settings.catalog.restore_on_delete_failure);

        let empty: AppSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, AppSettings::default());
    }
}
