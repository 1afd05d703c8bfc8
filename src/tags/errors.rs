/// Errors from the tag search domain layer.
use thiserror::Error;

use crate::graph::GraphError;

/// Errors that can occur while validating or running a tag search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Neither `--search-by-name` nor `--search-by-value` was given.
    #[error("Select a search mode with --search-by-name or --search-by-value")]
    NoModeSelected,

    /// Both modes were given.
    #[error("--search-by-name and --search-by-value cannot be used together")]
    ConflictingModes,

    /// Value mode without a usable `--tag-value`.
    #[error("--tag-value is required with --search-by-value")]
    MissingValueForValueMode,

    /// Name mode without a usable `--tag-name`.
    #[error("--tag-name is required with --search-by-name")]
    MissingNameForNameMode,

    /// Any failure from Resource Graph or the session behind it.
    #[error("Query execution failed: {0}")]
    QueryExecution(#[from] GraphError),

    /// Writing results to stdout failed (e.g., closed pipe).
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Example invocations shown alongside usage errors.
pub const USAGE_EXAMPLES: &[&str] = &[
    "tagquery --search-by-name --tag-name Environment",
    "tagquery --search-by-value --tag-value Production",
    "tagquery --search-by-name --tag-name CostCenter --use-tenant-scope",
];

impl SearchError {
    /// Whether this error came from bad arguments rather than the service.
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::NoModeSelected
                | Self::ConflictingModes
                | Self::MissingValueForValueMode
                | Self::MissingNameForNameMode
        )
    }

    /// Machine-readable code for the JSON error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoModeSelected => "no_mode_selected",
            Self::ConflictingModes => "conflicting_modes",
            Self::MissingValueForValueMode => "missing_tag_value",
            Self::MissingNameForNameMode => "missing_tag_name",
            Self::QueryExecution(e) => e.code(),
            Self::Output(_) => "output_error",
        }
    }

    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoModeSelected
            | Self::ConflictingModes
            | Self::MissingValueForValueMode
            | Self::MissingNameForNameMode
            | Self::QueryExecution(_)
            | Self::Output(_) => 1,
        }
    }
}
