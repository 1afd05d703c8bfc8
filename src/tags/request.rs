/// Argument validation: raw CLI input to a `SearchRequest`.
use std::fmt;

use super::errors::SearchError;

/// What the search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Resources carrying a tag with this key.
    TagName,
    /// Resources carrying any tag with this value.
    TagValue,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TagName => "TAG NAME",
            Self::TagValue => "TAG VALUE",
        })
    }
}

/// Raw, unvalidated search input as given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchInput<'a> {
    pub tag_value: Option<&'a str>,
    pub tag_name: Option<&'a str>,
    pub by_value: bool,
    pub by_name: bool,
    pub tenant_scope: bool,
}

/// A validated search. Exactly one mode, with a non-blank term for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    mode: SearchMode,
    term: String,
    tenant_scope: bool,
}

impl SearchRequest {
    /// Validate raw input.
    ///
    /// The term is used as given; surrounding whitespace is significant to
    /// tag matching and is not trimmed.
    ///
    /// # Errors
    ///
    /// Returns the `SearchError` usage variant for the first problem found:
    /// no mode, both modes, or a blank term for the selected mode.
    pub fn validate(input: &SearchInput<'_>) -> Result<Self, SearchError> {
        let (mode, term) = match (input.by_name, input.by_value) {
            (false, false) => return Err(SearchError::NoModeSelected),
            (true, true) => return Err(SearchError::ConflictingModes),
            (false, true) => (
                SearchMode::TagValue,
                non_blank(input.tag_value).ok_or(SearchError::MissingValueForValueMode)?,
            ),
            (true, false) => (
                SearchMode::TagName,
                non_blank(input.tag_name).ok_or(SearchError::MissingNameForNameMode)?,
            ),
        };

        Ok(Self {
            mode,
            term: term.to_owned(),
            tenant_scope: input.tenant_scope,
        })
    }

    #[must_use]
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// The tag name or tag value being searched for.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn tenant_scope(&self) -> bool {
        self.tenant_scope
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}
