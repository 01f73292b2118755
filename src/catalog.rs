//! Snapshot of the page template: filter buttons and video cards, using the
//! same attribute vocabulary as the rendered markup (`data-type`,
//! `data-format`, `data-type-filter`, `data-format-filter`, `active`).

use crate::error::StartupError;
use serde::Deserialize;

const BUNDLED_CATALOG: &str = include_str!("../assets/reel.json");

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Catalog {
    pub owner: String,
    pub tagline: String,
    pub type_filters: Vec<FilterButton>,
    pub format_filters: Vec<FilterButton>,
    pub videos: Vec<VideoEntry>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FilterButton {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct VideoEntry {
    pub id: String,
    pub title: String,
    pub embed: String,
    #[serde(default)]
    pub caption: Option<String>,
    /// One or more space-separated type tags.
    #[serde(rename = "type")]
    pub types: String,
    pub format: String,
}

impl Catalog {
    pub fn bundled() -> Result<Self, StartupError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self, StartupError> {
        serde_json::from_str(raw).map_err(|err| StartupError::Catalog(err.to_string()))
    }
}
