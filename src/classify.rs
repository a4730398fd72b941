//! Route-module classification.
//!
//! A file becomes a route when it survives the naming rules, the caller's
//! exclude patterns and the extension check, and its source contains at
//! least one JSX element.

use lazy_static::lazy_static;
use oxc_allocator::Allocator;
use oxc_ast::ast::{Expression, JSXElement, Statement};
use oxc_ast_visit::{walk, Visit};
use oxc_parser::Parser;
use oxc_span::SourceType;
use regex::Regex;
use std::path::Path;

use crate::error::CompileError;

pub const ROUTE_MODULE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "md", "mdx", "vue"];

const EXCLUDED_DIRECTORIES: &[&str] = &["components", "component", "utils", "util"];

lazy_static! {
    static ref TEST_FILE_RE: Regex = Regex::new(r"\.(test|spec|e2e)\.(j|t)sx?$").unwrap();
    static ref DECLARATION_FILE_RE: Regex = Regex::new(r"\.d\.ts$").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAMING RULES
// ═══════════════════════════════════════════════════════════════════════════════

/// Naming rules applied to a single directory entry name.
///
/// Excluded directories are never descended into.
pub fn is_excluded_name(name: &str, is_dir: bool) -> bool {
    if is_dir && EXCLUDED_DIRECTORIES.contains(&name) {
        return true;
    }
    if name.starts_with('.') || name.starts_with('_') {
        return true;
    }
    if is_dir {
        return false;
    }
    TEST_FILE_RE.is_match(name) || DECLARATION_FILE_RE.is_match(name)
}

pub fn has_route_module_extension(file: &str) -> bool {
    Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ROUTE_MODULE_EXTENSIONS.contains(&ext))
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXCLUDE PATTERNS
// ═══════════════════════════════════════════════════════════════════════════════

/// Caller-supplied exclusion regexes, matched against the relative file path.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<Regex>,
}

impl ExcludeSet {
    pub fn new<S: AsRef<str>>(sources: &[S]) -> Result<Self, CompileError> {
        let patterns = sources
            .iter()
            .map(|source| {
                let source = source.as_ref();
                Regex::new(source).map_err(|e| CompileError::InvalidExcludePattern {
                    pattern: source.to_string(),
                    source: e,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_excluded(&self, file: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(file))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONTENT HEURISTIC
// ═══════════════════════════════════════════════════════════════════════════════

/// Decides whether `file` (relative, slash-normalized) with contents `source`
/// is a route module.
pub fn is_route_module_file(file: &str, source: &str, exclude: &ExcludeSet) -> bool {
    if exclude.is_excluded(file) {
        tracing::trace!("excluded by pattern: {file}");
        return false;
    }
    if !has_route_module_extension(file) {
        return false;
    }
    contains_markup(source)
}

/// Parses `source` as TypeScript + JSX and reports whether any JSX element
/// appears in it. Sources that fail to parse never qualify.
pub fn contains_markup(source: &str) -> bool {
    let allocator = Allocator::default();
    let source_type = SourceType::default()
        .with_module(true)
        .with_typescript(true)
        .with_jsx(true);
    let ret = Parser::new(&allocator, source, source_type).parse();
    if ret.panicked || !ret.errors.is_empty() {
        tracing::trace!("source did not parse ({} errors)", ret.errors.len());
        return false;
    }

    let mut finder = MarkupFinder::default();
    finder.visit_program(&ret.program);
    finder.found
}

/// Stops walking as soon as the first element is seen.
#[derive(Default)]
struct MarkupFinder {
    found: bool,
}

impl<'a> Visit<'a> for MarkupFinder {
    fn visit_statement(&mut self, stmt: &Statement<'a>) {
        if !self.found {
            walk::walk_statement(self, stmt);
        }
    }

    fn visit_expression(&mut self, expr: &Expression<'a>) {
        if !self.found {
            walk::walk_expression(self, expr);
        }
    }

    fn visit_jsx_element(&mut self, _element: &JSXElement<'a>) {
        self.found = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_with_jsx_is_markup() {
        let source = r#"
            import React from 'react';
            export default function Page() {
                return <div className="page">hello</div>;
            }
        "#;
        assert!(contains_markup(source));
    }

    #[test]
    fn test_nested_jsx_inside_callbacks() {
        let source = r#"
            const items: string[] = ['a', 'b'];
            export default () => {
                const list = items.map((item) => { return <li key={item}>{item}</li>; });
                return null;
            };
        "#;
        assert!(contains_markup(source));
    }

    #[test]
    fn test_plain_module_is_not_markup() {
        let source = r#"
            export interface User { id: number }
            export const fetchUser = async (id: number): Promise<User> => ({ id });
        "#;
        assert!(!contains_markup(source));
    }

    #[test]
    fn test_fragment_alone_is_not_an_element() {
        assert!(!contains_markup("export default () => <></>;"));
    }

    #[test]
    fn test_unparsable_source_does_not_qualify() {
        assert!(!contains_markup("export default () => <div>;"));
        assert!(!contains_markup("# A markdown heading\n\nSome *text*."));
    }

    #[test]
    fn test_excluded_names() {
        assert!(is_excluded_name("components", true));
        assert!(is_excluded_name("util", true));
        assert!(is_excluded_name(".git", true));
        assert!(is_excluded_name("_private.tsx", false));
        assert!(is_excluded_name("page.test.tsx", false));
        assert!(is_excluded_name("page.e2e.js", false));
        assert!(is_excluded_name("types.d.ts", false));

        assert!(!is_excluded_name("components.tsx", false));
        assert!(!is_excluded_name("users", true));
        assert!(!is_excluded_name("testing.tsx", false));
    }

    #[test]
    fn test_route_module_extensions() {
        assert!(has_route_module_extension("a/b.tsx"));
        assert!(has_route_module_extension("docs/intro.mdx"));
        assert!(!has_route_module_extension("styles.css"));
        assert!(!has_route_module_extension("Makefile"));
    }

    #[test]
    fn test_exclude_patterns() {
        let exclude = ExcludeSet::new(&["^admin/", r"\.draft\."]).unwrap();
        let page = "export default () => <main />;";

        assert!(!is_route_module_file("admin/users.tsx", page, &exclude));
        assert!(!is_route_module_file("post.draft.tsx", page, &exclude));
        assert!(is_route_module_file("users.tsx", page, &exclude));
        assert!(!is_route_module_file("users.css", page, &exclude));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let err = ExcludeSet::new(&["("]).unwrap_err();
        assert!(matches!(err, CompileError::InvalidExcludePattern { ref pattern, .. } if pattern == "("));
    }
}
