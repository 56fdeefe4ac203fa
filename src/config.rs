#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Runtime configuration, read from the environment.

use std::{
    str::FromStr,
    sync::{Arc, Mutex, OnceLock},
};

use typed_builder::TypedBuilder;

use crate::{constants::DEFAULT_COMMENT_MARKERS, diff::CleanupMode};

/// Default number of submissions filtered concurrently by the batch driver.
const DEFAULT_WORKERS: usize = 8;

/// Knobs of the template filter.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
#[builder(doc)]
pub struct FilterConfig {
    /// When to run the semantic cleanup pass over raw diffs.
    #[builder(default)]
    cleanup:          CleanupMode,
    /// Reject issue positions that fall outside of the code instead of
    /// mapping them to a best-effort offset.
    #[builder(default = false)]
    strict_positions: bool,
    /// Single-line comment markers used by the cleanup decision.
    #[builder(default = default_markers(), setter(into))]
    comment_markers:  Vec<String>,
    /// How many submissions the batch driver filters at once.
    #[builder(default = DEFAULT_WORKERS)]
    workers:          usize,
}

/// Owned copy of [`DEFAULT_COMMENT_MARKERS`].
fn default_markers() -> Vec<String> {
    DEFAULT_COMMENT_MARKERS
        .iter()
        .map(|marker| marker.to_string())
        .collect()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl FilterConfig {
    /// Builds a configuration from `TEMPLATE_ISSUES_*` environment variables,
    /// falling back to the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let cleanup = read_env("TEMPLATE_ISSUES_CLEANUP", CleanupMode::default());
        let strict_positions = read_env("TEMPLATE_ISSUES_STRICT_POSITIONS", false);
        let workers = read_env("TEMPLATE_ISSUES_WORKERS", DEFAULT_WORKERS).max(1);
        let comment_markers = std::env::var("TEMPLATE_ISSUES_COMMENT_MARKERS")
            .ok()
            .map(|value| parse_markers(&value))
            .filter(|markers| !markers.is_empty())
            .unwrap_or_else(default_markers);

        Self {
            cleanup,
            strict_positions,
            comment_markers,
            workers,
        }
    }

    /// Returns the cleanup mode.
    pub fn cleanup(&self) -> CleanupMode {
        self.cleanup
    }

    /// Returns whether out-of-range issue positions are rejected.
    pub fn strict_positions(&self) -> bool {
        self.strict_positions
    }

    /// Returns the comment markers.
    pub fn comment_markers(&self) -> &[String] {
        &self.comment_markers
    }

    /// Returns the batch concurrency.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Returns a new config with a different cleanup mode.
    pub fn with_cleanup(mut self, cleanup: CleanupMode) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Returns a new config with strict positions toggled.
    pub fn with_strict_positions(mut self, strict: bool) -> Self {
        self.strict_positions = strict;
        self
    }
}

/// Splits a comma separated marker list, dropping blanks.
fn parse_markers(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|marker| !marker.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses an environment variable, falling back to `default` when it is
/// missing or does not parse.
fn read_env<T: FromStr>(env: &str, default: T) -> T {
    match std::env::var(env) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparsable value `{value}` for {env}");
            default
        }),
        Err(_) => default,
    }
}

/// Global storage for the lazily constructed configuration.
static CONFIG_SLOT: OnceLock<Mutex<Option<Arc<FilterConfig>>>> = OnceLock::new();

/// Returns the mutex guarding the global configuration slot.
fn slot() -> &'static Mutex<Option<Arc<FilterConfig>>> {
    CONFIG_SLOT.get_or_init(|| Mutex::new(None))
}

/// Returns the process-wide configuration, reading the environment the
/// first time it is needed.
pub fn get() -> Arc<FilterConfig> {
    let mut guard = slot().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(cfg) = guard.as_ref() {
        return Arc::clone(cfg);
    }

    let cfg = Arc::new(FilterConfig::from_env());
    *guard = Some(Arc::clone(&cfg));
    cfg
}

/// Replaces the process-wide configuration.
pub fn set(cfg: FilterConfig) {
    let mut guard = slot().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = Some(Arc::new(cfg));
}
