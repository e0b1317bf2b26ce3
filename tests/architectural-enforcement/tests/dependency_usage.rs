//! Integration Test: Declared Dependencies Are Used
//!
//! **Policy**: every entry in a crate's `[dependencies]` table is referenced
//! from its `src/` tree as a `name::` path or a `name!` macro. Unused entries
//! slow builds and hide the real stack.

use std::fs;
use std::path::Path;

use architectural_enforcement::{rust_sources, workspace_root};

/// Crate names declared in the `[dependencies]` table of a manifest
fn declared_dependencies(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for line in manifest.lines().map(str::trim) {
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }
        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((name, _)) = line.split_once('=') {
            names.push(name.trim().replace('-', "_"));
        }
    }

    names
}

fn is_referenced(name: &str, code: &str) -> bool {
    code.contains(&format!("{name}::")) || code.contains(&format!("{name}!"))
}

fn unused_dependencies(crate_dir: &Path) -> Vec<String> {
    let manifest = fs::read_to_string(crate_dir.join("Cargo.toml")).unwrap();
    let sources: String = rust_sources(&crate_dir.join("src"))
        .iter()
        .filter_map(|path| fs::read_to_string(path).ok())
        .collect::<Vec<_>>()
        .join("\n");

    declared_dependencies(&manifest)
        .into_iter()
        .filter(|name| !is_referenced(name, &sources))
        .collect()
}

#[test]
fn test_manifest_parsing() {
    let manifest = "[package]\nname = \"x\"\n\n[dependencies]\n# Logging\ntracing = \"0.1\"\nuicp-core = { path = \"../core\" }\n\n[dev-dependencies]\ntempfile = \"3\"\n";
    assert_eq!(declared_dependencies(manifest), vec!["tracing", "uicp_core"]);
}

#[test]
fn test_prefix_of_another_crate_is_not_a_reference() {
    let code = "use serde_json::{json, Value};\nuse tracing_subscriber::EnvFilter;";
    assert!(!is_referenced("serde", code));
    assert!(!is_referenced("tracing", code));
    assert!(is_referenced("serde_json", code));
}

#[test]
fn test_every_dependency_is_used() {
    let mut unused = Vec::new();
    for krate in ["core", "cli"] {
        let dir = workspace_root().join("uicp").join(krate);
        unused.extend(
            unused_dependencies(&dir)
                .into_iter()
                .map(|name| format!("uicp/{krate}: {name}")),
        );
    }

    assert!(
        unused.is_empty(),
        "Declared but unused dependencies:\n  {}",
        unused.join("\n  ")
    );
}
