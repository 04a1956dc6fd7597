//! Planner tests against temporary site trees.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::*;
use crate::config::{BundleConfig, SiteConfig};
use crate::router::{OsTree, Router};

fn site(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (file, content) in files {
        let path = dir.path().join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

fn p(path: &str) -> PathBuf {
    path.split('/').collect()
}

fn copy(path: &str) -> BuildInstruction {
    BuildInstruction::Copy { path: p(path) }
}

fn warnings(instructions: &[BuildInstruction]) -> Vec<&str> {
    instructions
        .iter()
        .filter_map(|i| match i {
            BuildInstruction::Warning { message } => Some(message.as_str()),
            _ => None,
        })
        .collect()
}

fn position(instructions: &[BuildInstruction], wanted: &BuildInstruction) -> usize {
    instructions
        .iter()
        .position(|i| i == wanted)
        .unwrap_or_else(|| panic!("{wanted:?} not in {instructions:#?}"))
}

const ROUTES_X: &str = r#"
[routes."/x/"]
type = "build-template"
path = "t.tpl"
"#;

// ============================================================================
// configured routes
// ============================================================================

#[test]
fn test_bundles_and_redirects_come_first() {
    let dir = site(&[("a.css", "")]);
    let bundle = BundleConfig::new(["src/main.js"]).with_option("format", "esm");
    let config = SiteConfig::new(dir.path())
        .with_bundle("/js/main.bundled.js", bundle.clone())
        .with_redirect("/old.html", "https://example.com/new?q=1#frag");

    let instructions = build_instructions(&config).unwrap();
    assert_eq!(
        instructions,
        vec![
            BuildInstruction::Esbuild {
                bundle_path: p("js/main.bundled.js"),
                esbuild_config: bundle,
            },
            BuildInstruction::HtmlRedirect {
                html_path: p("old.html"),
                redirect_target_url: "https://example.com/new?q=1#frag".into(),
            },
            copy("a.css"),
        ]
    );
}

#[test]
fn test_each_bundle_and_redirect_emitted_once() {
    let dir = site(&[("main.bundled.js", "stale"), ("old.html", "old")]);
    let config = SiteConfig::new(dir.path())
        .with_bundle("/main.bundled.js", BundleConfig::new(["main.js"]))
        .with_redirect("/old.html", "/new/")
        .with_redirect("/gone/", "/elsewhere/");

    let instructions = build_instructions(&config).unwrap();
    let bundles = instructions
        .iter()
        .filter(|i| matches!(i, BuildInstruction::Esbuild { .. }))
        .count();
    assert_eq!(bundles, 1);
    // Existing files at configured paths are not copied
    assert!(!instructions.contains(&copy("main.bundled.js")));
    assert!(!instructions.contains(&copy("old.html")));
    // Trailing slash redirects write the directory index
    assert!(instructions.contains(&BuildInstruction::HtmlRedirect {
        html_path: p("gone/index.html"),
        redirect_target_url: "/elsewhere/".into(),
    }));
}

#[test]
fn test_bundle_and_redirect_on_same_uri_is_fatal() {
    let dir = site(&[]);
    let config = SiteConfig::new(dir.path())
        .with_bundle("/x.js", BundleConfig::new(["x.js"]))
        .with_redirect("/x.js", "/y.js");

    let err = build_instructions(&config).unwrap_err();
    let PlanError::ConfigMismatch {
        uri,
        expected,
        actual,
    } = err
    else {
        panic!("expected config mismatch, got {err:?}");
    };
    assert_eq!(uri, "/x.js");
    assert_eq!(expected, "esbuild");
    assert_eq!(actual, "redirect -> /y.js");
}

#[test]
fn test_trailing_slash_redirect_owns_index_with_custom_static_name() {
    let dir = site(&[("old/index.ejs.html", "")]);
    let mut config = SiteConfig::new(dir.path()).with_redirect("/old/", "/new/");
    config.routes.static_index = "default.html".into();

    let instructions = build_instructions(&config).unwrap();
    assert_eq!(
        instructions,
        vec![BuildInstruction::HtmlRedirect {
            html_path: p("old/index.html"),
            redirect_target_url: "/new/".into(),
        }]
    );
}

// ============================================================================
// directory routes
// ============================================================================

#[test]
fn test_template_index_renders_with_directory_uri() {
    let dir = site(&[("index.ejs.html", ""), ("docs/api/index.ejs.html", "")]);
    let config = SiteConfig::new(dir.path());

    let instructions = build_instructions(&config).unwrap();
    assert!(instructions.contains(&BuildInstruction::build_template(
        p("index.ejs.html"),
        p("index.html"),
        "/",
    )));
    assert!(instructions.contains(&BuildInstruction::build_template(
        p("docs/api/index.ejs.html"),
        p("docs/api/index.html"),
        "/docs/api/",
    )));
    assert_eq!(instructions.len(), 2);
}

#[test]
fn test_static_index_copied_once() {
    let dir = site(&[("about/index.html", "")]);
    let config = SiteConfig::new(dir.path());

    let instructions = build_instructions(&config).unwrap();
    assert_eq!(instructions, vec![copy("about/index.html")]);
}

#[test]
fn test_ambiguous_index_warns_only() {
    let dir = site(&[
        ("both/index.html", ""),
        ("both/index.ejs.html", ""),
        ("both/style.css", ""),
    ]);
    let config = SiteConfig::new(dir.path());

    let instructions = build_instructions(&config).unwrap();
    assert_eq!(
        instructions,
        vec![
            BuildInstruction::warning(
                "/both/ has both index.ejs.html and index.html; using neither"
            ),
            copy("both/style.css"),
        ]
    );
}

#[test]
fn test_directory_without_index_still_walks_contents() {
    let dir = site(&[("assets/img/logo.png", ""), ("assets/site.css", "")]);
    let config = SiteConfig::new(dir.path());

    let instructions = build_instructions(&config).unwrap();
    assert_eq!(
        instructions,
        vec![copy("assets/img/logo.png"), copy("assets/site.css")]
    );
}

// ============================================================================
// hidden paths and special files
// ============================================================================

#[test]
fn test_hidden_directory_is_skipped_entirely() {
    let dir = site(&[
        (".git/index.ejs.html", ""),
        (".git/config", ""),
        ("docs/.drafts/index.routes.toml", "not even toml"),
        ("docs/page.html", ""),
    ]);
    let config = SiteConfig::new(dir.path());

    let instructions = build_instructions(&config).unwrap();
    assert_eq!(instructions, vec![copy("docs/page.html")]);
}

#[test]
fn test_access_control_copied_other_dotfiles_dropped() {
    let dir = site(&[(".htaccess", "Deny from all"), (".DS_Store", "")]);
    let config = SiteConfig::new(dir.path());

    let instructions = build_instructions(&config).unwrap();
    assert_eq!(instructions, vec![copy(".htaccess")]);
}

#[cfg(unix)]
#[test]
fn test_broken_symlink_warns() {
    let dir = site(&[("a/.keep", "")]);
    std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("a").join("b"))
        .unwrap();
    let config = SiteConfig::new(dir.path());

    let instructions = build_instructions(&config).unwrap();
    assert_eq!(
        instructions,
        vec![BuildInstruction::warning(
            "/a/b is a broken symlink; ignoring"
        )]
    );
}

#[cfg(unix)]
#[test]
fn test_hidden_broken_symlink_is_silent() {
    let dir = site(&[("a.css", "")]);
    std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join(".cache")).unwrap();
    let config = SiteConfig::new(dir.path());

    let instructions = build_instructions(&config).unwrap();
    assert_eq!(instructions, vec![copy("a.css")]);
}

// ============================================================================
// index scripts
// ============================================================================

#[test]
fn test_index_script_declares_virtual_routes() {
    let dir = site(&[
        ("blog/index.routes.toml", ROUTES_X),
        ("blog/t.tpl", "template"),
    ]);
    let config = SiteConfig::new(dir.path());

    let instructions = build_instructions(&config).unwrap();
    assert_eq!(
        instructions,
        vec![
            BuildInstruction::build_template(p("blog/t.tpl"), p("x/index.html"), "/x/"),
            copy("blog/t.tpl"),
        ]
    );
}

#[test]
fn test_index_script_unsupported_type_is_fatal() {
    let dir = site(&[
        ("a.css", ""),
        (
            "blog/index.routes.toml",
            "[routes.\"/x/\"]\ntype = \"redirect\"\npath = \"t.tpl\"\n",
        ),
    ]);
    let config = SiteConfig::new(dir.path());

    let err = build_instructions(&config).unwrap_err();
    assert!(matches!(
        err,
        PlanError::Script {
            source: ScriptError::UnsupportedType { .. },
            ..
        }
    ));
}

#[test]
fn test_index_script_without_routes_is_fatal() {
    let dir = site(&[("index.routes.toml", "title = \"x\"\n")]);
    let config = SiteConfig::new(dir.path());

    let err = build_instructions(&config).unwrap_err();
    let PlanError::Script { path, source } = err else {
        panic!("expected script error");
    };
    assert!(path.ends_with("index.routes.toml"));
    assert!(matches!(source, ScriptError::MissingRoutes));
}

#[test]
fn test_custom_route_loader() {
    let dir = site(&[("shop/index.routes.toml", "")]);
    let config = SiteConfig::new(dir.path());
    let loader = |path: &Path| -> Result<RouteTable, ScriptError> {
        assert!(path.ends_with("index.routes.toml"));
        let mut table = RouteTable::new();
        table.insert(
            "/shop/item/".into(),
            RouteDescriptor::BuildTemplate {
                path: PathBuf::from("item.ejs.html"),
            },
        );
        Ok(table)
    };

    let router = Router::new(&config, &OsTree);
    let instructions = Planner::new(router, &loader).plan().unwrap();
    assert_eq!(
        instructions,
        vec![BuildInstruction::build_template(
            p("shop/item.ejs.html"),
            p("shop/item/index.html"),
            "/shop/item/",
        )]
    );
}

#[test]
fn test_virtual_route_conflict_warns() {
    let dir = site(&[
        ("x/index.html", ""),
        ("index.routes.toml", ROUTES_X),
        ("t.tpl", ""),
    ]);
    let config = SiteConfig::new(dir.path());

    let instructions = build_instructions(&config).unwrap();
    let warnings = warnings(&instructions);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].starts_with("/x/index.html is produced by 2 instructions"));
    // Conflicts never remove content instructions
    assert!(instructions.contains(&copy("x/index.html")));
    assert!(instructions.last().is_some_and(BuildInstruction::is_warning));
}

// ============================================================================
// ordering and failures
// ============================================================================

#[test]
fn test_post_order() {
    let dir = site(&[
        ("index.ejs.html", ""),
        ("a/index.ejs.html", ""),
        ("a/b/index.html", ""),
        ("a/b/c.css", ""),
        ("z.css", ""),
    ]);
    let config = SiteConfig::new(dir.path());

    let instructions = build_instructions(&config).unwrap();
    let root = position(
        &instructions,
        &BuildInstruction::build_template(p("index.ejs.html"), p("index.html"), "/"),
    );
    let a = position(
        &instructions,
        &BuildInstruction::build_template(p("a/index.ejs.html"), p("a/index.html"), "/a/"),
    );
    let b = position(&instructions, &copy("a/b/index.html"));
    let c = position(&instructions, &copy("a/b/c.css"));
    let z = position(&instructions, &copy("z.css"));

    assert!(b < a && c < a);
    assert!(a < root);
    // A directory's own route precedes its files
    assert!(root < z);
}

#[test]
fn test_idempotent() {
    let dir = site(&[
        ("index.ejs.html", ""),
        ("blog/index.routes.toml", ROUTES_X),
        ("blog/t.tpl", ""),
        ("img/a.png", ""),
        ("img/b.png", ""),
        ("both/index.html", ""),
        ("both/index.ejs.html", ""),
    ]);
    let config = SiteConfig::new(dir.path())
        .with_bundle("/main.js", BundleConfig::new(["src/main.js"]))
        .with_redirect("/old/", "/new/");

    let first = build_instructions(&config).unwrap();
    let second = build_instructions(&config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_missing_root_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = SiteConfig::new(dir.path().join("missing"));

    let err = build_instructions(&config).unwrap_err();
    assert!(matches!(err, PlanError::Io { .. }));
}

#[test]
fn test_plan_directory_is_independent() {
    let dir = site(&[("a/b/c.css", ""), ("a/x.css", ""), ("y.css", "")]);
    let config = SiteConfig::new(dir.path());
    let router = Router::new(&config, &OsTree);
    let planner = Planner::new(router, &ManifestLoader);

    let subtree = planner.plan_directory(&p("a")).unwrap();
    assert_eq!(subtree, vec![copy("a/b/c.css"), copy("a/x.css")]);
}
