//! One full compile: scan, classify, assemble, generate, write.
//!
//! A run shares nothing with earlier runs. Every call re-reads the pages
//! directory from scratch, so the output depends only on the current
//! file-system state.

#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::classify::{is_route_module_file, ExcludeSet};
use crate::codegen::{generate_artifacts, write_artifacts};
use crate::config::CompilerConfig;
use crate::discovery::scan_route_files;
use crate::error::CompileError;
use crate::route_id::create_route_id;
use crate::tree::{assemble_routes, RouteTable};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOptions {
    /// Pages directory to scan.
    pub base: PathBuf,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Qualified route files keyed by route id.
///
/// Two files normalizing to the same id (`about.tsx` and `about.jsx`) fail
/// the run instead of one silently replacing the other.
pub fn collect_route_files(
    options: &CompileOptions,
    exclude: &ExcludeSet,
) -> Result<BTreeMap<String, String>, CompileError> {
    let mut files = BTreeMap::new();
    let mut scanned = 0usize;

    for candidate in scan_route_files(&options.base) {
        scanned += 1;
        let source = match fs::read_to_string(&candidate.absolute) {
            Ok(source) => source,
            Err(e) => {
                tracing::debug!("skipping {}: {e}", candidate.relative);
                continue;
            }
        };
        if !is_route_module_file(&candidate.relative, &source, exclude) {
            tracing::trace!("not a route module: {}", candidate.relative);
            continue;
        }

        match files.entry(create_route_id(&candidate.relative)) {
            Entry::Vacant(slot) => {
                slot.insert(candidate.relative);
            }
            Entry::Occupied(slot) => {
                return Err(CompileError::DuplicateRouteId {
                    id: slot.key().clone(),
                    first: slot.get().clone(),
                    second: candidate.relative,
                });
            }
        }
    }

    tracing::debug!(
        "scanned {scanned} candidates under {}, {} qualified",
        options.base.display(),
        files.len()
    );
    Ok(files)
}

/// Builds the route tree for `options.base`. A missing directory compiles to
/// an empty table.
pub fn compile_routes(options: &CompileOptions) -> Result<RouteTable, CompileError> {
    let exclude = ExcludeSet::new(&options.exclude)?;
    let files = collect_route_files(options, &exclude)?;
    Ok(assemble_routes(&files, &options.prefix))
}

/// Compiles and writes both generated files for `config`.
///
/// On error nothing new is renamed into place, so the previous output stays.
pub fn generate(config: &CompilerConfig) -> Result<RouteTable, CompileError> {
    let table = compile_routes(&config.compile_options())?;
    let artifacts = generate_artifacts(&table, &config.layout_module);
    write_artifacts(&config.output_dir, &artifacts)?;

    tracing::info!(
        "generated {} routes into {}",
        table.len(),
        config.output_dir.display()
    );
    Ok(table)
}

/// Compiles routes for a JSON-encoded [`CompileOptions`] and returns the
/// route table as JSON.
#[cfg(feature = "napi")]
#[napi]
pub fn compile_routes_native(options_json: String) -> napi::Result<String> {
    let options: CompileOptions = serde_json::from_str(&options_json)
        .map_err(|e| napi::Error::from_reason(format!("invalid options: {e}")))?;
    let table = compile_routes(&options).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    serde_json::to_string(&table).map_err(|e| napi::Error::from_reason(e.to_string()))
}
