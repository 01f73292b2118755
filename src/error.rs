use thiserror::Error;

/// Faults raised while capturing the page snapshot. Any of these leaves the
/// reel unfilterable, so startup aborts instead of guessing a default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartupError {
    #[error("no {group} filter button is marked active")]
    NoActiveButton { group: &'static str },

    #[error("{count} {group} filter buttons are marked active, expected exactly one")]
    MultipleActiveButtons { group: &'static str, count: usize },

    #[error("the {group} filter group has no \"all\" button to reset to")]
    MissingAllButton { group: &'static str },

    #[error("video card '{id}' has no type tags")]
    EmptyTypes { id: String },

    #[error("video card '{id}' has no format")]
    EmptyFormat { id: String },

    #[error("video card '{id}' has format '{value}', expected a single token")]
    MultipleFormats { id: String, value: String },

    #[error("catalog could not be read: {0}")]
    Catalog(String),

    #[error("missing #app mount point")]
    MissingMountPoint,
}
