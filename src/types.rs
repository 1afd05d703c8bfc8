/// Shared serializable types.
///
/// `ResultRecord` is both what Resource Graph returns and what gets written
/// to stdout in the JSON formats, so it keeps the service's camelCase names.
use serde::{Deserialize, Deserializer, Serialize};

/// One matching resource/tag pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    /// Resource name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Resource type (e.g., "microsoft.storage/storageaccounts").
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub resource_type: String,
    /// Resource group name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub resource_group: String,
    /// Azure region.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    /// Owning subscription.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subscription_id: String,
    /// The tag key that matched.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tag_key: String,
    /// Value of that tag on this resource.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tag_value: String,
    /// Full ARM resource ID.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (`snake_case`).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Example invocations, for usage errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
}

impl ErrorOutput {
    /// Construct from a `SearchError`.
    #[must_use]
    pub fn from_search_error(err: &crate::tags::SearchError) -> Self {
        let examples = err
            .is_usage()
            .then(|| crate::tags::USAGE_EXAMPLES.iter().map(|&s| s.to_owned()).collect());
        Self {
            ok: false,
            error: ErrorDetail {
                code: err.code().to_owned(),
                message: err.to_string(),
                examples,
            },
        }
    }
}
