/// Output formatting: report text, table, JSON modes. TTY detection.
use std::io::{self, IsTerminal, Write};

use comfy_table::{Table, presets::UTF8_BORDERS_ONLY};
use serde::Serialize;

use super::args::OutputFormat;
use crate::tags::{BatchProgress, SearchRequest};
use crate::types::{ErrorOutput, ResultRecord};

/// Resolve the effective output format, handling `--json` flag and TTY auto-detection.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag {
        return OutputFormat::Json;
    }
    if fmt == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        fmt
    }
}

/// Output context passed to all formatters.
pub struct OutputCtx {
    pub format: OutputFormat,
    pub no_header: bool,
}

impl OutputCtx {
    /// Construct from CLI args.
    #[must_use]
    pub fn new(fmt: OutputFormat, json_flag: bool, no_header: bool) -> Self {
        Self {
            format: resolve_format(fmt, json_flag),
            no_header,
        }
    }

    /// Whether per-page progress lines go to stderr. Only the table report has them.
    #[must_use]
    pub fn shows_progress(&self) -> bool {
        matches!(self.format, OutputFormat::Table | OutputFormat::Auto)
    }
}

// --- Progress ---

/// Report one fetched page on stderr.
pub fn write_progress(progress: BatchProgress) {
    eprintln!(
        "Retrieved {} resources (total: {})",
        progress.batch, progress.total
    );
}

// --- Search report ---

/// Write the search results to `out` in the context's format.
///
/// In the JSON formats an empty result is written as `[]` and the
/// not-found warning goes to stderr.
///
/// # Errors
///
/// Returns any I/O error from `out`.
pub fn write_report<W: Write>(
    out: &mut W,
    records: &[ResultRecord],
    request: &SearchRequest,
    ctx: &OutputCtx,
) -> io::Result<()> {
    match ctx.format {
        OutputFormat::Table | OutputFormat::Auto => {
            render_report(out, records, request, ctx.no_header)
        }
        json => {
            if records.is_empty() {
                eprintln!("WARNING: {}", not_found_message(request));
            }
            render_json(out, records, json)
        }
    }
}

/// Header, then either the not-found warning or summary, table and total.
///
/// # Errors
///
/// Returns any I/O error from `out`.
pub fn render_report<W: Write>(
    out: &mut W,
    records: &[ResultRecord],
    request: &SearchRequest,
    no_header: bool,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== RESOURCES WITH {}: {} ===", request.mode(), request.term())?;
    writeln!(out)?;

    if records.is_empty() {
        writeln!(out, "WARNING: {}", not_found_message(request))?;
        return Ok(());
    }

    writeln!(
        out,
        "Found {} with {} '{}'",
        count_noun(records.len()),
        mode_phrase(request),
        request.term()
    )?;
    writeln!(out, "{}", records_table(records, no_header))?;
    writeln!(out)?;
    writeln!(out, "Total: {}", count_noun(records.len()))
}

fn records_table(records: &[ResultRecord], no_header: bool) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    if !no_header {
        table.set_header([
            "NAME",
            "TAG KEY",
            "TAG VALUE",
            "TYPE",
            "RESOURCE GROUP",
            "LOCATION",
        ]);
    }
    for r in records {
        table.add_row([
            r.name.as_str(),
            r.tag_key.as_str(),
            r.tag_value.as_str(),
            r.resource_type.as_str(),
            r.resource_group.as_str(),
            r.location.as_str(),
        ]);
    }
    table
}

fn render_json<W: Write>(
    out: &mut W,
    records: &[ResultRecord],
    fmt: OutputFormat,
) -> io::Result<()> {
    match fmt {
        OutputFormat::Compact => write_json_line(out, records),
        OutputFormat::Ndjson => {
            for r in records {
                write_json_line(out, r)?;
            }
            Ok(())
        }
        _ => {
            let s = serde_json::to_string_pretty(records).map_err(io::Error::other)?;
            writeln!(out, "{s}")
        }
    }
}

fn write_json_line<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    let s = serde_json::to_string(value).map_err(io::Error::other)?;
    writeln!(out, "{s}")
}

fn not_found_message(request: &SearchRequest) -> String {
    format!(
        "No resources found with {} '{}'",
        mode_phrase(request),
        request.term()
    )
}

fn mode_phrase(request: &SearchRequest) -> String {
    request.mode().to_string().to_lowercase()
}

fn count_noun(n: usize) -> String {
    if n == 1 {
        "1 resource".to_owned()
    } else {
        format!("{n} resources")
    }
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &ErrorOutput, format: OutputFormat, json_flag: bool) {
    let fmt = resolve_format(format, json_flag);
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    match fmt {
        OutputFormat::Json | OutputFormat::Compact | OutputFormat::Ndjson => {
            let s = serde_json::to_string_pretty(err).unwrap_or_default();
            let _ = writeln!(out, "{s}");
        }
        _ => {
            let _ = writeln!(out, "Error: {}", err.error.message);
            if let Some(examples) = &err.error.examples {
                let _ = writeln!(out, "  Examples:");
                for example in examples {
                    let _ = writeln!(out, "    {example}");
                }
            }
        }
    }
}
