//! Error types for route compilation and the watch loop.
//!
//! Scan and classification problems never show up here: an unreadable or
//! unparsable file simply does not become a route. Only failures that would
//! leave the generated output wrong or missing are errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("failed to create output directory {path}: {source}")]
    CreateOutputDir { path: PathBuf, source: io::Error },

    #[error("failed to write {path}: {source}")]
    WriteArtifact { path: PathBuf, source: io::Error },

    #[error("invalid exclude pattern `{pattern}`: {source}")]
    InvalidExcludePattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("route id `{id}` is produced by both `{first}` and `{second}`")]
    DuplicateRouteId {
        id: String,
        first: String,
        second: String,
    },
}

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("failed to initialize watcher: {0}")]
    Init(#[from] notify::Error),

    #[error("cannot watch {path}: {reason}")]
    WatchPath { path: PathBuf, reason: String },
}
