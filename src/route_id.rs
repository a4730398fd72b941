//! Route id and route path derivation.
//!
//! Everything in here is a pure function of its input: a relative file path
//! becomes a route id, and a route id (or the part of it below its parent)
//! becomes the URL path segment the route contributes.
//!
//! Filename conventions:
//! - `$` alone is a root catch-all, a trailing `/$` or `.$` a nested catch-all
//! - `$name` is a dynamic segment (`:name`)
//! - `a.b` nests `b` under `a` without a directory
//! - `index` and `README` collapse into their directory's default route

use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;

lazy_static! {
    static ref FILE_EXTENSION_RE: Regex = Regex::new(r"(?i)\.[a-z0-9]+$").unwrap();
    static ref NESTED_CATCH_ALL_RE: Regex = Regex::new(r"[/.]\$$").unwrap();
}

const EXTENDED_LENGTH_PREFIX: &str = r"\\?\";

// ═══════════════════════════════════════════════════════════════════════════════
// ROUTE IDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Canonical route id for a file: extension stripped, separators normalized to `/`.
pub fn create_route_id(file: &str) -> String {
    win_path(&strip_file_extension(file))
}

pub fn strip_file_extension(file: &str) -> String {
    FILE_EXTENSION_RE.replace(file, "").into_owned()
}

/// Normalizes Windows separators. Extended-length paths (`\\?\C:\...`) are
/// returned untouched since their backslashes are significant.
pub fn win_path(path: &str) -> String {
    if path.starts_with(EXTENDED_LENGTH_PREFIX) {
        return path.to_string();
    }
    path.replace('\\', "/")
}

/// Orders route ids so longer (more deeply nested) ids come first.
pub fn by_longest_first(a: &str, b: &str) -> Ordering {
    b.len().cmp(&a.len())
}

/// Finds the id that `child_route_id` is nested under.
///
/// `route_ids` must already be sorted with [`by_longest_first`] so the first
/// prefix hit is the most specific ancestor.
pub fn find_parent_route_id<'a, S: AsRef<str>>(
    route_ids: &'a [S],
    child_route_id: &str,
) -> Option<&'a str> {
    route_ids.iter().map(AsRef::<str>::as_ref).find(|id| {
        child_route_id
            .strip_prefix(*id)
            .is_some_and(|rest| rest.starts_with('/'))
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// ROUTE PATHS
// ═══════════════════════════════════════════════════════════════════════════════

/// Derives the URL path contributed by a route id.
///
/// ```
/// use route_compiler::route_id::create_route_path;
///
/// assert_eq!(create_route_path("$"), "*");
/// assert_eq!(create_route_path("docs.$"), "docs/*");
/// assert_eq!(create_route_path("user.$id"), "user/:id");
/// assert_eq!(create_route_path("blog/index"), "blog");
/// ```
pub fn create_route_path(route_id: &str) -> String {
    let mut path = if route_id == "$" {
        "*".to_string()
    } else {
        NESTED_CATCH_ALL_RE.replace(route_id, "/*").into_owned()
    };
    path = path.replace('$', ":").replace('.', "/");

    // a/index/index -> a/index
    if ends_with_segment(&path, "index/index") {
        path = drop_trailing_segment(&path, "index");
    }

    // a/index -> a, index -> '', a/:index and a/:id/index are kept
    if ends_with_segment(&path, "index") && !is_dynamic_index(&path) {
        path = drop_trailing_segment(&path, "index");
    }

    if ends_with_segment(&path, "README") {
        path = drop_trailing_segment(&path, "README");
    }

    path
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// True when `path` ends with `suffix` and `suffix` starts on a word boundary,
/// so `myindex` does not end with the `index` segment.
fn ends_with_segment(path: &str, suffix: &str) -> bool {
    path.strip_suffix(suffix)
        .is_some_and(|head| !head.chars().next_back().is_some_and(is_word_char))
}

fn drop_trailing_segment(path: &str, segment: &str) -> String {
    let head = &path[..path.len() - segment.len()];
    head.strip_suffix('/').unwrap_or(head).to_string()
}

/// An `index` that is itself a param (`:index`) or sits directly under a
/// dynamic segment (`:id/index`).
fn is_dynamic_index(path: &str) -> bool {
    let head = &path[..path.len() - "index".len()];
    if head.ends_with(':') {
        return true;
    }
    head.strip_suffix('/')
        .and_then(|parent| parent.rsplit('/').next())
        .is_some_and(|segment| segment.starts_with(':'))
}
