//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: The CLI runs on a tokio runtime and MUST NOT use blocking
//! file or stdin I/O.
//! **Required**: Use `tokio::fs` and `tokio::io::stdin`, not `std::fs` or
//! `std::io::stdin`.
//!
//! Writing to stdout with `println!` and logging to stderr are allowed.

use architectural_enforcement::{assert_no_violations, scan, workspace_root};

const BLOCKING_IO: &[&str] = &[
    "std::fs",
    "std::io::stdin()",
    "std::io::Read",
    "std::net::",
    "std::process::Command",
    "reqwest::blocking",
];

#[test]
fn test_no_blocking_io_in_cli() {
    let src = workspace_root().join("uicp").join("cli").join("src");
    let violations = scan(&src, "Blocking I/O", |_, code| {
        BLOCKING_IO.iter().any(|pattern| code.contains(pattern))
    });

    if !violations.is_empty() {
        eprintln!("\n✅ REQUIRED async I/O:");
        eprintln!("  - tokio::fs::read_to_string().await");
        eprintln!("  - tokio::io::stdin() with AsyncReadExt / AsyncBufReadExt");
    }

    assert_no_violations("Blocking I/O calls found in CLI code", &violations);
}
