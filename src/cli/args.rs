/// CLI argument definitions via clap derive.
use clap::{ArgAction, Parser, ValueEnum};

use crate::tags::SearchInput;

/// tagquery — find Azure resources by tag name or tag value.
#[derive(Debug, Parser)]
#[allow(clippy::struct_excessive_bools)]
#[command(
    name = "tagquery",
    about = "Find Azure resources by tag name or tag value via Resource Graph",
    version,
    after_help = "Examples:\n  \
                  tagquery --search-by-name --tag-name Environment\n  \
                  tagquery --search-by-value --tag-value Production --use-tenant-scope"
)]
pub struct Cli {
    /// Tag value to search for (with --search-by-value).
    #[arg(long, value_name = "VALUE")]
    pub tag_value: Option<String>,

    /// Tag name (key) to search for (with --search-by-name).
    #[arg(long, value_name = "NAME")]
    pub tag_name: Option<String>,

    /// Find resources having any tag whose value equals --tag-value.
    #[arg(long)]
    pub search_by_value: bool,

    /// Find resources having a tag whose key equals --tag-name.
    #[arg(long)]
    pub search_by_name: bool,

    /// Search every subscription in the tenant instead of the current one.
    #[arg(long)]
    pub use_tenant_scope: bool,

    /// Subscription to search instead of the Azure CLI's current one.
    #[arg(long, value_name = "ID", env = "AZURE_SUBSCRIPTION_ID")]
    pub subscription: Option<String>,

    /// Output format. Auto-detects: table when TTY, json when piped.
    #[arg(long, value_name = "FORMAT", default_value = "auto")]
    pub output: OutputFormat,

    /// Shorthand for --output json.
    #[arg(long, conflicts_with = "output")]
    pub json: bool,

    /// Omit table headers (useful for awk/cut processing).
    #[arg(long)]
    pub no_header: bool,

    /// Increase log verbosity on stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The search-related arguments, unvalidated.
    #[must_use]
    pub fn search_input(&self) -> SearchInput<'_> {
        SearchInput {
            tag_value: self.tag_value.as_deref(),
            tag_name: self.tag_name.as_deref(),
            by_value: self.search_by_value,
            by_name: self.search_by_name,
            tenant_scope: self.use_tenant_scope,
        }
    }
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Auto-detect: table when stdout is a TTY, json when piped.
    #[default]
    Auto,
    /// JSON array (pretty-printed).
    Json,
    /// Compact single-line JSON.
    Compact,
    /// Newline-delimited JSON (one record per line).
    Ndjson,
    /// Summary lines and an aligned table (human-readable).
    Table,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_name_search() {
        let cli = Cli::try_parse_from([
            "tagquery",
            "--search-by-name",
            "--tag-name",
            "Environment",
            "--use-tenant-scope",
        ])
        .unwrap();
        let input = cli.search_input();
        assert!(input.by_name);
        assert!(!input.by_value);
        assert!(input.tenant_scope);
        assert_eq!(input.tag_name, Some("Environment"));
        assert_eq!(input.tag_value, None);
    }

    #[test]
    fn conflicting_modes_reach_validator() {
        // Mode conflicts are reported by the validator, not clap.
        let cli =
            Cli::try_parse_from(["tagquery", "--search-by-name", "--search-by-value"]).unwrap();
        assert!(cli.search_input().by_name && cli.search_input().by_value);
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["tagquery", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
