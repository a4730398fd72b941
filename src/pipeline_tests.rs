#[cfg(test)]
mod tests {
    use crate::codegen::{ROUTER_INDEX_FILE, ROUTE_TABLE_FILE};
    use crate::config::{CompilerConfig, ConfigOverrides, EnvVars};
    use crate::error::CompileError;
    use crate::pipeline::{compile_routes, generate, CompileOptions};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const PAGE: &str = "export default function Page() { return <main>page</main>; }";
    const HELPER: &str = "export const format = (s: string) => s.trim();";

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn options(base: &Path) -> CompileOptions {
        CompileOptions {
            base: base.to_path_buf(),
            prefix: "@/pages/".to_string(),
            exclude: Vec::new(),
        }
    }

    fn config(project: &Path) -> CompilerConfig {
        CompilerConfig::resolve(
            project.to_path_buf(),
            &EnvVars::default(),
            ConfigOverrides {
                watch: Some(false),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_compiles_nested_layouts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.tsx", PAGE);
        write(dir.path(), "a/b.tsx", PAGE);
        write(dir.path(), "a/b/c.tsx", PAGE);

        let table = compile_routes(&options(dir.path())).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("a/b/c").unwrap().parent_id.as_deref(), Some("a/b"));
        assert_eq!(table.get("a/b/c").unwrap().abs_path, "/a/b/c");
        assert_eq!(table.get("a/b/c").unwrap().file, "@/pages/a/b/c.tsx");
    }

    #[test]
    fn test_private_only_directory_has_no_routes() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "_private.tsx", PAGE);

        assert!(compile_routes(&options(dir.path())).unwrap().is_empty());
    }

    #[test]
    fn test_missing_base_is_empty() {
        let dir = TempDir::new().unwrap();
        let table = compile_routes(&options(&dir.path().join("pages"))).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_files_without_markup_are_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "index.tsx", PAGE);
        write(dir.path(), "helpers.ts", HELPER);
        write(dir.path(), "broken.tsx", "export default () => <div>;");

        let table = compile_routes(&options(dir.path())).unwrap();
        let ids: Vec<_> = table.routes().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["index"]);
    }

    #[test]
    fn test_exclude_patterns() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "index.tsx", PAGE);
        write(dir.path(), "admin/users.tsx", PAGE);
        write(dir.path(), "draft.tsx", PAGE);

        let mut opts = options(dir.path());
        opts.exclude = vec!["^admin/".to_string(), "draft".to_string()];
        let table = compile_routes(&opts).unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.get("index").is_some());
    }

    #[test]
    fn test_invalid_exclude_pattern_fails() {
        let dir = TempDir::new().unwrap();
        let mut opts = options(dir.path());
        opts.exclude = vec!["(".to_string()];

        assert!(matches!(
            compile_routes(&opts),
            Err(CompileError::InvalidExcludePattern { .. })
        ));
    }

    #[test]
    fn test_duplicate_route_id_fails() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "about.jsx", PAGE);
        write(dir.path(), "about.tsx", PAGE);

        match compile_routes(&options(dir.path())) {
            Err(CompileError::DuplicateRouteId { id, first, second }) => {
                assert_eq!(id, "about");
                assert_eq!(first, "about.jsx");
                assert_eq!(second, "about.tsx");
            }
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn test_generate_writes_both_artifacts() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("pages"), "index.tsx", PAGE);
        write(&dir.path().join("pages"), "blog/$slug.tsx", PAGE);

        let table = generate(&config(dir.path())).unwrap();
        assert_eq!(table.len(), 2);

        let out = dir.path().join(".router");
        let route_table = fs::read_to_string(out.join(ROUTE_TABLE_FILE)).unwrap();
        assert!(route_table.contains("import(\"@/pages/blog/$slug\")"));
        assert!(out.join(ROUTER_INDEX_FILE).is_file());
    }

    #[test]
    fn test_generate_is_byte_identical_across_runs() {
        let dir = TempDir::new().unwrap();
        let pages = dir.path().join("pages");
        for rel in ["index.tsx", "a.tsx", "a/index.tsx", "a/$id.tsx", "docs.$.tsx", "z/y.jsx"] {
            write(&pages, rel, PAGE);
        }
        let config = config(dir.path());
        let out = dir.path().join(".router");

        generate(&config).unwrap();
        let first = fs::read(out.join(ROUTE_TABLE_FILE)).unwrap();
        let first_index = fs::read(out.join(ROUTER_INDEX_FILE)).unwrap();

        generate(&config).unwrap();
        assert_eq!(fs::read(out.join(ROUTE_TABLE_FILE)).unwrap(), first);
        assert_eq!(fs::read(out.join(ROUTER_INDEX_FILE)).unwrap(), first_index);
    }

    #[test]
    fn test_failed_run_keeps_previous_output() {
        let dir = TempDir::new().unwrap();
        let pages = dir.path().join("pages");
        write(&pages, "about.tsx", PAGE);
        let config = config(dir.path());
        let out = dir.path().join(".router");

        generate(&config).unwrap();
        let before = fs::read(out.join(ROUTE_TABLE_FILE)).unwrap();

        write(&pages, "about.jsx", PAGE);
        assert!(generate(&config).is_err());
        assert_eq!(fs::read(out.join(ROUTE_TABLE_FILE)).unwrap(), before);
    }

    #[test]
    fn test_options_from_json() {
        let options: CompileOptions =
            serde_json::from_str(r#"{"base":"/app/pages","prefix":"~/"}"#).unwrap();
        assert_eq!(options.base, Path::new("/app/pages"));
        assert_eq!(options.prefix, "~/");
        assert!(options.exclude.is_empty());
    }
}
