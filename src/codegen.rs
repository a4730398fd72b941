//! Codegen module for the route compiler
//!
//! Serializes a [`RouteTable`] into the two generated sources the app
//! imports: the route table (`getRouter.ts`) and the router component that
//! renders it (`index.tsx`).

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::CompileError;
use crate::route_id::strip_file_extension;
use crate::tree::{Route, RouteTable};

pub const ROUTE_TABLE_FILE: &str = "getRouter.ts";
pub const ROUTER_INDEX_FILE: &str = "index.tsx";

pub const DEFAULT_LAYOUT_MODULE: &str = "@/layouts";

const GENERATED_BANNER: &str = "// This file is generated by route-compiler. Do not edit.\n";
const INDENT: &str = "  ";

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifacts {
    pub route_table: String,
    pub router_index: String,
}

pub fn generate_artifacts(table: &RouteTable, layout_module: &str) -> GeneratedArtifacts {
    GeneratedArtifacts {
        route_table: generate_route_table(table, layout_module),
        router_index: generate_router_index(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ROUTE TABLE
// ═══════════════════════════════════════════════════════════════════════════════

/// Emits `getRoutes()`: a single `/` layout entry whose `routes` hold one
/// entry per route, in table order.
pub fn generate_route_table(table: &RouteTable, layout_module: &str) -> String {
    let mut out = String::from(GENERATED_BANNER);
    out.push_str("export function getRoutes() {\n");
    out.push_str("  const routes = [\n");
    out.push_str("    {\n");
    out.push_str("      path: \"/\",\n");
    let _ = writeln!(
        out,
        "      component: {{ loader: () => import(/* webpackChunkName: 'layouts__index' */ {}) }},",
        js_string(layout_module)
    );
    out.push_str("      routes: [\n");
    for route in table.routes() {
        emit_route(&mut out, route);
    }
    out.push_str("      ],\n");
    out.push_str("    },\n");
    out.push_str("  ];\n\n");
    out.push_str("  return routes;\n");
    out.push_str("}\n");
    out
}

fn emit_route(out: &mut String, route: &Route) {
    let pad = INDENT.repeat(4);
    let _ = writeln!(out, "{pad}{{");
    let _ = writeln!(out, "{pad}  path: {},", js_string(&entry_path(route)));
    let _ = writeln!(
        out,
        "{pad}  component: {{ loader: () => import({}) }},",
        js_string(&strip_file_extension(&route.file))
    );
    let _ = writeln!(out, "{pad}}},");
}

/// `/` + the route's path from the tree root. Nested routes keep their full
/// URL (`a/b` is `/a/b`, not `/b`) and the root index is `/`, never `//`.
fn entry_path(route: &Route) -> String {
    format!("/{}", route.abs_path.trim_start_matches('/'))
}

/// A double-quoted JS string literal. JSON string syntax is valid JS.
fn js_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

// ═══════════════════════════════════════════════════════════════════════════════
// ROUTER INDEX
// ═══════════════════════════════════════════════════════════════════════════════

const ROUTER_INDEX_TEMPLATE: &str = r#"import React, { useEffect, useState } from "react";
import { Routes, Route } from "react-router-dom";
import { getRoutes } from "./getRouter";

type RouteModule = { default: React.ComponentType<any> };

type RouteEntry = {
  path: string;
  component: { loader: () => Promise<RouteModule> };
  routes?: RouteEntry[];
};

// Renders nothing until the module resolves, then its default export.
const AsyncComponent = ({ loader }: { loader: () => Promise<RouteModule> }) => {
  const [Component, setComponent] = useState<React.ComponentType<any> | null>(null);

  useEffect(() => {
    let active = true;
    loader().then((mod) => {
      if (active) {
        setComponent(() => mod.default);
      }
    });
    return () => {
      active = false;
    };
  }, [loader]);

  return Component ? <Component /> : null;
};

const renderRoutes = (entries: RouteEntry[] | undefined): React.ReactNode =>
  entries?.map((entry, i) => (
    <Route
      key={`${i}:${entry.path}`}
      path={entry.path}
      element={<AsyncComponent loader={entry.component.loader} />}
    >
      {renderRoutes(entry.routes)}
    </Route>
  ));

const Router = () => {
  const routes = getRoutes();

  return <Routes>{renderRoutes(routes)}</Routes>;
};

export default Router;
"#;

pub fn generate_router_index() -> String {
    format!("{GENERATED_BANNER}{ROUTER_INDEX_TEMPLATE}")
}

// ═══════════════════════════════════════════════════════════════════════════════
// WRITING
// ═══════════════════════════════════════════════════════════════════════════════

/// Writes both artifacts into `out_dir`, creating it if needed.
///
/// Each file is staged in a temp file inside `out_dir` and renamed over the
/// target, and both are staged before either is renamed, so readers see
/// either the old or the new file and the window where the pair disagrees
/// is as short as two renames.
pub fn write_artifacts(out_dir: &Path, artifacts: &GeneratedArtifacts) -> Result<(), CompileError> {
    std::fs::create_dir_all(out_dir).map_err(|source| CompileError::CreateOutputDir {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let staged = [
        (ROUTE_TABLE_FILE, artifacts.route_table.as_str()),
        (ROUTER_INDEX_FILE, artifacts.router_index.as_str()),
    ]
    .into_iter()
    .map(|(name, contents)| stage(out_dir, name, contents).map(|file| (name, file)))
    .collect::<Result<Vec<_>, _>>()?;

    for (name, file) in staged {
        let target = out_dir.join(name);
        file.persist(&target)
            .map_err(|e| CompileError::WriteArtifact {
                path: target.clone(),
                source: e.error,
            })?;
    }
    Ok(())
}

fn stage(out_dir: &Path, name: &str, contents: &str) -> Result<NamedTempFile, CompileError> {
    let write_err = |source| CompileError::WriteArtifact {
        path: out_dir.join(name),
        source,
    };
    let mut file = NamedTempFile::new_in(out_dir).map_err(write_err)?;
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    file.flush().map_err(write_err)?;
    Ok(file)
}
