//! Integration Test: Protocol Core Purity
//!
//! The protocol path (extract, validate, compose) is synchronous and pure
//! apart from logging. Surfaces call it on every streamed chunk, so it must
//! never block on I/O or require a runtime.
//!
//! **Policy**:
//! - `uicp/core/src` has no async code, no tokio, no network or process access
//! - only the start-up loaders (`config.rs`, `registry.rs`) touch the filesystem
//! - production code in every crate propagates errors instead of unwrapping

use std::path::Path;

use architectural_enforcement::{assert_no_violations, scan, workspace_root};

const FORBIDDEN_IN_CORE: &[&str] = &[
    "tokio",
    "async fn",
    ".await",
    "std::net",
    "std::process",
    "reqwest",
];

const FILE_LOADERS: &[&str] = &["config.rs", "registry.rs"];

fn core_src() -> std::path::PathBuf {
    workspace_root().join("uicp").join("core").join("src")
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

#[test]
fn test_core_is_synchronous_and_offline() {
    let violations = scan(&core_src(), "Async or network code in core", |_, code| {
        FORBIDDEN_IN_CORE.iter().any(|pattern| code.contains(pattern))
    });

    assert_no_violations(
        "The protocol core must stay synchronous and offline",
        &violations,
    );
}

#[test]
fn test_core_file_access_only_in_loaders() {
    let violations = scan(&core_src(), "File access outside loaders", |path, code| {
        code.contains("std::fs") && !FILE_LOADERS.contains(&file_name(path))
    });

    assert_no_violations(
        "Only config.rs and registry.rs may read files in the core",
        &violations,
    );
}

#[test]
fn test_no_panicking_error_handling_in_production() {
    let mut violations = Vec::new();
    for krate in ["core", "cli"] {
        let src = workspace_root().join("uicp").join(krate).join("src");
        violations.extend(scan(&src, "Panicking error handling", |_, code| {
            code.contains(".unwrap()") || code.contains(".expect(")
        }));
    }

    assert_no_violations(
        "Production code must propagate errors with `?`",
        &violations,
    );
}
