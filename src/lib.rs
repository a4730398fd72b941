//! # Route Compiler
//!
//! Turns a `pages/` directory laid out by naming convention into a nested
//! route tree, and writes the generated route table and router component
//! that wire those files into the app.
//!
//! ## Pipeline
//!
//! 1. **Discovery** walks the pages directory (`discovery`).
//! 2. **Classification** keeps files whose source contains JSX (`classify`).
//! 3. **Derivation** maps each file to a route id and path segment (`route_id`).
//! 4. **Assembly** nests routes under their longest id prefix (`tree`).
//! 5. **Codegen** writes `getRouter.ts` and `index.tsx` (`codegen`).
//!
//! `pipeline::generate` runs all five; `watch::RouteWatcher` reruns them
//! after each debounced burst of file changes.
//!
//! ## Naming Rules
//!
//! | File                  | Route path   |
//! |-----------------------|--------------|
//! | `index.tsx`           | `/`          |
//! | `about.tsx`           | `/about`     |
//! | `blog/index.tsx`      | `/blog`      |
//! | `user.$id.tsx`        | `/user/:id`  |
//! | `docs.$.tsx`          | `/docs/*`    |
//! | `$.tsx`               | `*`          |
//!
//! A file `a.tsx` next to a directory `a/` is the layout for everything in
//! that directory.

#[cfg(feature = "napi")]
use napi_derive::napi;

pub mod classify;
pub mod codegen;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod route_id;
pub mod tree;
pub mod watch;

mod pipeline_tests;

pub use config::{CompilerConfig, ConfigOverrides, EnvVars};
pub use error::{CompileError, WatchError};
pub use pipeline::{compile_routes, generate, CompileOptions};
pub use tree::{Route, RouteTable};

#[cfg(feature = "napi")]
pub use pipeline::compile_routes_native;

#[cfg(feature = "napi")]
#[napi]
pub fn compile_bridge() -> String {
    "Route Compiler Native Bridge Connected".to_string()
}
