//! The quill formatter CLI.
//!
//! `quill [OPTIONS] <PATHS>...` formats JavaScript files in place.
//!
//! Options:
//! - `--check` - Report files that would change and exit 1 if any would
//! - `--stdout` - Print the formatted text instead of writing it back
//! - `--edits` - Print the edit list of each file as JSON
//! - `--config` - Load options from a `quill.toml` (default: `./quill.toml`)
//! - `--kind` - Parse the input as a unit other than a whole file
//! - `--offset` / `--length` - Keep only edits inside this byte region
//! - `--indent` - Initial indentation level
//!
//! Logging goes to stderr and is filtered by `QUILL_LOG` (default `warn`).

mod discovery;

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use quill_common::span::LineIndex;
use quill_fmt::{apply_edits, FormatConfig, FormatKind};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "quill", version, about = "Format JavaScript source files")]
struct Cli {
    /// Files or directories to format (directories are searched for .js files)
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Check formatting without writing; exit 1 if any file would change
    #[arg(long)]
    check: bool,

    /// Print formatted output to stdout instead of writing files
    #[arg(long, conflicts_with = "check")]
    stdout: bool,

    /// Print the edit list of each file as JSON (one object per line)
    #[arg(long, conflicts_with_all = ["check", "stdout"])]
    edits: bool,

    /// Configuration file (defaults to quill.toml in the current directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Syntactic unit the input is parsed as
    #[arg(long, value_enum, default_value_t = KindArg::File)]
    kind: KindArg,

    /// Start of the region to format, in bytes
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Length of the region to format, in bytes (defaults to the rest of the file)
    #[arg(long)]
    length: Option<usize>,

    /// Initial indentation level
    #[arg(long, default_value_t = 0)]
    indent: usize,

    /// Disable colorized diagnostics
    #[arg(long = "no-color")]
    no_color: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    /// A whole source file
    File,
    /// Class members without the surrounding class
    ClassBody,
    /// A statement list
    Statements,
    /// A single expression
    Expression,
    /// Whichever of the above parses
    Unknown,
}

impl From<KindArg> for FormatKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::File => FormatKind::CompilationUnit,
            KindArg::ClassBody => FormatKind::ClassBodyDeclarations,
            KindArg::Statements => FormatKind::Statements,
            KindArg::Expression => FormatKind::Expression,
            KindArg::Unknown => FormatKind::Unknown,
        }
    }
}

/// What happened to one file.
enum Outcome {
    Unchanged,
    Changed,
    Failed,
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };
    let files = match discovery::collect_files(&cli.paths) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };
    info!(files = files.len(), "formatting");

    let mut changed = 0;
    let mut failed = 0;
    for file in &files {
        match format_file(file, &cli, &config) {
            Outcome::Unchanged => {}
            Outcome::Changed => changed += 1,
            Outcome::Failed => failed += 1,
        }
    }

    if cli.check && changed > 0 {
        eprintln!("{} file(s) would be reformatted", changed);
    }
    if failed > 0 || (cli.check && changed > 0) {
        process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("QUILL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// The explicit config file, else `./quill.toml` when present, else defaults.
fn load_config(explicit: Option<&Path>) -> Result<FormatConfig, String> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let local = PathBuf::from("quill.toml");
            if !local.is_file() {
                return Ok(FormatConfig::default());
            }
            local
        }
    };
    debug!(path = %path.display(), "loading configuration");
    FormatConfig::from_file(&path).map_err(|e| e.to_string())
}

fn format_file(path: &Path, cli: &Cli, config: &FormatConfig) -> Outcome {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: failed to read '{}': {}", path.display(), e);
            return Outcome::Failed;
        }
    };
    let region = match region(&source, cli.offset, cli.length) {
        Ok(region) => region,
        Err(e) => {
            eprintln!("error: {}: {}", path.display(), e);
            return Outcome::Failed;
        }
    };
    let line_separator = if source.contains("\r\n") { "\r\n" } else { "\n" };
    let kind = FormatKind::from(cli.kind);
    debug!(path = %path.display(), ?kind, "format file");

    let Some(edits) = quill_fmt::format(
        kind,
        &source,
        region.start,
        region.end - region.start,
        cli.indent,
        line_separator,
        config,
    ) else {
        report_failure(path, &source, kind, !cli.no_color);
        return Outcome::Failed;
    };

    let formatted = apply_edits(&source, &edits);
    let outcome = if formatted == source {
        Outcome::Unchanged
    } else {
        Outcome::Changed
    };

    if cli.edits {
        let line = serde_json::json!({
            "file": path.display().to_string(),
            "edits": edits,
        });
        println!("{}", line);
    } else if cli.stdout {
        print!("{}", formatted);
    } else if cli.check {
        if let (Outcome::Changed, Some(first)) = (&outcome, edits.first()) {
            let (line, col) = LineIndex::new(&source).line_col(first.offset as u32);
            println!("Would reformat: {}:{}:{}", path.display(), line, col);
        }
    } else if matches!(outcome, Outcome::Changed) {
        if let Err(e) = std::fs::write(path, &formatted) {
            eprintln!("error: failed to write '{}': {}", path.display(), e);
            return Outcome::Failed;
        }
        info!(path = %path.display(), edits = edits.len(), "reformatted");
    }
    outcome
}

fn region(source: &str, offset: usize, length: Option<usize>) -> Result<Range<usize>, String> {
    if offset > source.len() {
        return Err(format!(
            "offset {} is past the end of the file ({} bytes)",
            offset,
            source.len()
        ));
    }
    let length = length.unwrap_or(source.len() - offset);
    match offset.checked_add(length) {
        Some(end) if end <= source.len() => Ok(offset..end),
        _ => Err(format!(
            "region {}+{} is past the end of the file ({} bytes)",
            offset,
            length,
            source.len()
        )),
    }
}

/// Explain why a file was left alone: parse errors when there are any,
/// otherwise a layout failure.
fn report_failure(path: &Path, source: &str, kind: FormatKind, color: bool) {
    let parse = match kind {
        FormatKind::Expression => quill_parser::parse_expression(source),
        FormatKind::ClassBodyDeclarations => quill_parser::parse_class_members(source),
        FormatKind::Statements => quill_parser::parse_statements(source),
        FormatKind::CompilationUnit | FormatKind::Unknown => quill_parser::parse(source),
    };
    if parse.ok() {
        eprintln!("error: could not format '{}'", path.display());
        return;
    }

    use ariadne::{Config, Label, Report, ReportKind, Source};
    let config = if color {
        Config::default()
    } else {
        Config::default().with_color(false)
    };
    eprintln!("error: failed to parse '{}'", path.display());
    for error in parse.errors() {
        let start = error.span.start as usize;
        let end = (error.span.end as usize).max(start + 1);
        let mut report = Report::<Range<usize>>::build(ReportKind::Error, start..end)
            .with_message("Parse error")
            .with_config(config)
            .with_label(Label::new(start..end).with_message(&error.message));
        if let Some((message, span)) = &error.related {
            let related_start = span.start as usize;
            let related_end = (span.end as usize).max(related_start + 1);
            report = report.with_label(Label::new(related_start..related_end).with_message(message));
        }
        let _ = report.finish().eprint(Source::from(source));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_defaults_to_the_rest_of_the_file() {
        assert_eq!(region("abcdef", 2, None), Ok(2..6));
        assert_eq!(region("abcdef", 0, Some(3)), Ok(0..3));
    }

    #[test]
    fn region_past_the_end_is_rejected() {
        assert!(region("abc", 4, None).is_err());
        assert!(region("abc", 1, Some(3)).is_err());
        assert!(region("abc", 1, Some(usize::MAX)).is_err());
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
