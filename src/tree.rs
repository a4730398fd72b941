//! Route tree assembly.
//!
//! Parent/child relationships are never stored as child lists. A route's
//! parent is the longest route id that prefixes it (`a/b` is under `a`), and
//! children are found by asking which routes name a given id as parent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::route_id::{by_longest_first, create_route_path, find_parent_route_id};

// ═══════════════════════════════════════════════════════════════════════════════
// ROUTE TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Path segment relative to the parent route (`/` for the root index).
    pub path: String,
    /// Full path from the tree root, always starting with `/`.
    pub abs_path: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Backing file, relative to the pages directory and prefixed.
    pub file: String,
}

/// Routes in definition order: every route precedes its children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.id == id)
    }

    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Route> + 'a {
        self.routes
            .iter()
            .filter(move |route| route.parent_id.as_deref() == Some(id))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ASSEMBLY
// ═══════════════════════════════════════════════════════════════════════════════

/// Builds the route tree from qualified files (`route id -> relative file`).
///
/// `prefix` is prepended to every route's `file`.
pub fn assemble_routes(files: &BTreeMap<String, String>, prefix: &str) -> RouteTable {
    let mut entries: Vec<(&str, &str)> = files
        .iter()
        .map(|(id, file)| (id.as_str(), file.as_str()))
        .collect();
    entries.sort_by(|(a, _), (b, _)| by_longest_first(a, b).then_with(|| a.cmp(b)));

    let route_ids: Vec<&str> = entries.iter().map(|(id, _)| *id).collect();
    let mut routes = Vec::with_capacity(entries.len());
    define_nested_routes(&entries, &route_ids, prefix, None, &mut routes);

    RouteTable { routes }
}

/// Defines every route whose parent is `parent`, then recurses into each.
/// The parent is passed down rather than kept on a shared stack.
fn define_nested_routes(
    entries: &[(&str, &str)],
    route_ids: &[&str],
    prefix: &str,
    parent: Option<&Route>,
    routes: &mut Vec<Route>,
) {
    let parent_id = parent.map(|p| p.id.as_str());

    for &(route_id, file) in entries {
        if find_parent_route_id(route_ids, route_id) != parent_id {
            continue;
        }

        let local_id = match parent_id {
            Some(pid) => &route_id[pid.len() + 1..],
            None => route_id,
        };
        let route = define_route(
            parent,
            create_route_path(local_id),
            route_id,
            format!("{prefix}{file}"),
        );

        routes.push(route.clone());
        define_nested_routes(entries, route_ids, prefix, Some(&route), routes);
    }
}

fn define_route(parent: Option<&Route>, path: String, id: &str, file: String) -> Route {
    let abs_path = join_abs_path(parent.map(|p| p.abs_path.as_str()), &path);
    Route {
        path: if abs_path == "/" { "/".to_string() } else { path },
        abs_path,
        id: id.to_string(),
        parent_id: parent.map(|p| p.id.clone()),
        file,
    }
}

/// `/a` + `b` is `/a/b`; an empty segment keeps the parent's path.
fn join_abs_path(parent: Option<&str>, path: &str) -> String {
    let base = parent.unwrap_or("").trim_end_matches('/');
    match (base.is_empty(), path.is_empty()) {
        (true, true) => "/".to_string(),
        (false, true) => base.to_string(),
        _ => format!("{base}/{path}"),
    }
}
