#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # template-issues
//!
//! Drops the linter issues a submission inherited from its starter template.
//!
//! `template-issues filter submissions.json steps.json hyperstyle_issues`
//! rewrites every submission's issue column so that only the student's own
//! issues remain; the template's issues move to `hyperstyle_issues_diff`.
//!
//! `template-issues segments template.py solution.py` shows how a single
//! submission was aligned with its template.
//!
//! Settings are read from `TEMPLATE_ISSUES_*` environment variables, or a
//! `.env` file in the working directory.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use bpaf::*;
use colored::Colorize;
use dotenvy::dotenv;
use template_issues::{
    CleanupMode, DiffTag, FilterConfig, ReportKind, Row, StepIndex, TemplateFilter,
    batch::{read_rows, render_table, template_issue_rows},
    config, filter_submissions,
};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Filter a dataset of submissions
    Filter {
        /// Submissions file
        submissions:      PathBuf,
        /// Steps file
        steps:            PathBuf,
        /// Which issue column to filter
        kind:             ReportKind,
        /// Where to write the filtered submissions
        output:           Option<PathBuf>,
        /// Where to write the template issues
        templates_issues: Option<PathBuf>,
        /// Print template issues as a table
        table:            bool,
    },
    /// Show how a submission aligns with its template
    Segments {
        /// Template file
        template: PathBuf,
        /// Submission file
        code:     PathBuf,
    },
}

/// Parsed command line.
#[derive(Debug, Clone)]
struct Opts {
    /// Log at DEBUG instead of INFO
    verbose: bool,
    /// Overrides `TEMPLATE_ISSUES_CLEANUP`
    cleanup: Option<CleanupMode>,
    /// The command to run
    cmd:     Cmd,
}

/// Parse the command line arguments and return `Opts`
fn options() -> Opts {
    let verbose = short('v')
        .long("verbose")
        .help("Log debugging information")
        .switch();
    let cleanup = long("cleanup")
        .help("When to clean up raw diffs: auto, always or never")
        .argument::<CleanupMode>("MODE")
        .optional();

    let filter = {
        let submissions = positional::<PathBuf>("SUBMISSIONS")
            .help("JSON array or JSON lines file with one submission per row");
        let steps = positional::<PathBuf>("STEPS").help("JSON file with one step per row");
        let kind = positional::<String>("COLUMN")
            .help("Issue column to filter: hyperstyle_issues or qodana_issues")
            .parse(|column| column.parse::<ReportKind>());
        let output = short('o')
            .long("output")
            .help("Write filtered submissions here instead of stdout")
            .argument::<PathBuf>("PATH")
            .optional();
        let templates_issues = long("templates-issues")
            .help("Write the issues found in templates here")
            .argument::<PathBuf>("PATH")
            .optional();
        let table = long("table")
            .help("Print the issues found in templates as a table")
            .switch();

        construct!(Cmd::Filter {
            submissions,
            steps,
            kind,
            output,
            templates_issues,
            table
        })
        .to_options()
        .command("filter")
        .help("Remove template issues from a dataset of submissions")
    };

    let segments = {
        let template = positional::<PathBuf>("TEMPLATE").help("Template file");
        let code = positional::<PathBuf>("CODE").help("Submission file");

        construct!(Cmd::Segments { template, code })
            .to_options()
            .command("segments")
            .help("Show how a submission was aligned with its template")
    };

    let cmd = construct!([filter, segments]);

    construct!(Opts {
        verbose,
        cleanup,
        cmd
    })
    .to_options()
    .descr("Separates template issues from the ones students introduce")
    .run()
}

/// Reads a dataset file.
async fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Could not read {}", path.display()))?;
    read_rows(&text).with_context(|| format!("Could not parse rows of {}", path.display()))
}

/// Writes rows as a pretty JSON array, to `path` or stdout.
async fn write_json<T: serde::Serialize>(value: &T, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Could not serialize output")?;
    match path {
        Some(path) => tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Could not write {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

/// Runs the `filter` command.
async fn run_filter(
    submissions: PathBuf,
    steps: PathBuf,
    kind: ReportKind,
    output: Option<PathBuf>,
    templates_issues: Option<PathBuf>,
    table: bool,
) -> Result<()> {
    let (rows, step_rows) = tokio::try_join!(load_rows(&submissions), load_rows(&steps))?;
    let steps = Arc::new(StepIndex::new(&step_rows));
    let filter = Arc::new(TemplateFilter::new(FilterConfig::clone(&config::get())));

    let filtered = filter_submissions(rows, steps, kind, filter).await?;

    if templates_issues.is_some() || table {
        let issues = template_issue_rows(&filtered, kind)
            .context("Could not collect issues found in templates")?;
        if table {
            eprintln!("{}", render_table(&issues));
        }
        if let Some(path) = templates_issues.as_deref() {
            write_json(&issues, Some(path)).await?;
        }
    }

    write_json(&filtered, output.as_deref()).await
}

/// Runs the `segments` command.
async fn run_segments(template: PathBuf, code: PathBuf) -> Result<()> {
    let (template_text, code_text) = tokio::try_join!(
        tokio::fs::read_to_string(&template),
        tokio::fs::read_to_string(&code)
    )
    .with_context(|| format!("Could not read {} or {}", template.display(), code.display()))?;

    let filter = TemplateFilter::new(FilterConfig::clone(&config::get()));
    let segments = filter.segments(&template_text, &code_text);

    let mut aligned = String::new();
    for segment in &segments {
        let text = match segment.tag {
            DiffTag::Equal => segment.text.normal(),
            DiffTag::Insert => segment.text.green(),
            DiffTag::Delete => segment.text.red().strikethrough(),
        };
        aligned.push_str(&text.to_string());
        eprintln!(
            "{:<6} template {:<12} code {:<12} {:?}",
            segment.tag.as_str(),
            segment.template_interval.to_string(),
            segment.code_interval.to_string(),
            segment.text
        );
    }
    println!("{aligned}");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let opts = options();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let level = if opts.verbose { Level::DEBUG } else { Level::INFO };
    let filter_layer = LevelFilter::from_level(level);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    if let Some(cleanup) = opts.cleanup {
        config::set(FilterConfig::from_env().with_cleanup(cleanup));
    }

    match opts.cmd {
        Cmd::Filter {
            submissions,
            steps,
            kind,
            output,
            templates_issues,
            table,
        } => run_filter(submissions, steps, kind, output, templates_issues, table).await?,
        Cmd::Segments { template, code } => run_segments(template, code).await?,
    };

    Ok(())
}
