//! Configuration for a route-compiler run.
//!
//! Nothing here mutates the process environment. [`EnvVars`] is an owned
//! snapshot of the process variables merged with an optional `.env` file,
//! and [`CompilerConfig::resolve`] turns that snapshot plus CLI overrides
//! into the settings the pipeline and watcher read.
//!
//! # Environment Variables
//!
//! - `ROUTER_CONFIG` - directory (relative to the project root) holding `pages/`
//! - `ROUTER_PAGES_DIR` - explicit pages directory, wins over `ROUTER_CONFIG`
//! - `ROUTER_OUT_DIR` - output directory for generated files
//! - `ROUTER_EXCLUDE` - comma-separated exclude regexes
//! - `ROUTER_PREFIX` - import prefix for route files
//! - `ROUTER_DEBOUNCE_MS` - watch debounce delay

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::codegen::DEFAULT_LAYOUT_MODULE;
use crate::pipeline::CompileOptions;

pub const DEFAULT_PREFIX: &str = "@/pages/";
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;
pub const PAGES_DIR_NAME: &str = "pages";
pub const OUTPUT_DIR_NAME: &str = ".router";

// ═══════════════════════════════════════════════════════════════════════════════
// ENVIRONMENT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars {
    vars: BTreeMap<String, String>,
}

impl EnvVars {
    pub fn from_process() -> Self {
        Self::from_pairs(std::env::vars())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Adds pairs whose key is not already defined. Existing values always win.
    pub fn merge_missing<I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in pairs {
            self.vars.entry(key).or_insert(value);
        }
        self
    }

    /// Merges a dotenv file with first-definition-wins semantics.
    ///
    /// A missing file leaves the variables unchanged. Lines that fail to
    /// parse are logged and skipped.
    pub fn merge_dotenv(self, path: &Path) -> Self {
        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(e) if e.not_found() => return self,
            Err(e) => {
                tracing::warn!("could not read {}: {e}", path.display());
                return self;
            }
        };

        let pairs = iter.filter_map(|item| match item {
            Ok(pair) => Some(pair),
            Err(e) => {
                tracing::warn!("skipping invalid line in {}: {e}", path.display());
                None
            }
        });
        self.merge_missing(pairs.collect::<Vec<_>>())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Like [`EnvVars::get`], ignoring blank values.
    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

/// Values given on the command line; `None` falls through to the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub pages_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub prefix: Option<String>,
    pub layout_module: Option<String>,
    pub debounce_ms: Option<u64>,
    pub watch: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    pub project_root: PathBuf,
    pub pages_dir: PathBuf,
    pub output_dir: PathBuf,
    pub exclude: Vec<String>,
    pub prefix: String,
    pub layout_module: String,
    pub debounce: Duration,
    pub watch: bool,
}

impl CompilerConfig {
    /// Resolves settings: CLI overrides, then environment, then defaults.
    pub fn resolve(project_root: PathBuf, env: &EnvVars, overrides: ConfigOverrides) -> Self {
        let pages_dir = overrides
            .pages_dir
            .or_else(|| env.non_empty("ROUTER_PAGES_DIR").map(|dir| project_root.join(dir)))
            .unwrap_or_else(|| default_pages_dir(&project_root, env.non_empty("ROUTER_CONFIG")));

        let output_dir = overrides
            .output_dir
            .or_else(|| env.non_empty("ROUTER_OUT_DIR").map(|dir| project_root.join(dir)))
            .unwrap_or_else(|| default_output_dir(&pages_dir));

        let exclude = if overrides.exclude.is_empty() {
            env.non_empty("ROUTER_EXCLUDE")
                .map(split_patterns)
                .unwrap_or_default()
        } else {
            overrides.exclude
        };

        let prefix = overrides
            .prefix
            .or_else(|| env.get("ROUTER_PREFIX").map(str::to_string))
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        let debounce_ms = overrides
            .debounce_ms
            .or_else(|| parse_debounce(env.non_empty("ROUTER_DEBOUNCE_MS")))
            .unwrap_or(DEFAULT_DEBOUNCE_MS);

        Self {
            project_root,
            pages_dir,
            output_dir,
            exclude,
            prefix,
            layout_module: overrides
                .layout_module
                .unwrap_or_else(|| DEFAULT_LAYOUT_MODULE.to_string()),
            debounce: Duration::from_millis(debounce_ms),
            watch: overrides.watch.unwrap_or(true),
        }
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            base: self.pages_dir.clone(),
            prefix: self.prefix.clone(),
            exclude: self.exclude.clone(),
        }
    }
}

fn default_pages_dir(project_root: &Path, router_config: Option<&str>) -> PathBuf {
    match router_config {
        Some(base) if base != "." && base != "./" => project_root.join(base).join(PAGES_DIR_NAME),
        _ => project_root.join(PAGES_DIR_NAME),
    }
}

/// `.router` next to the pages directory.
fn default_output_dir(pages_dir: &Path) -> PathBuf {
    pages_dir
        .parent()
        .map(|parent| parent.join(OUTPUT_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(OUTPUT_DIR_NAME))
}

fn split_patterns(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_debounce(value: Option<&str>) -> Option<u64> {
    let value = value?;
    match value.parse() {
        Ok(ms) => Some(ms),
        Err(_) => {
            tracing::warn!("ignoring ROUTER_DEBOUNCE_MS={value:?}: not a number of milliseconds");
            None
        }
    }
}
