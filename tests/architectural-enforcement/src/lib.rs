//! Architectural Enforcement Integration Tests
//!
//! Source scanners shared by the tests in `tests/`. Each test walks a crate's
//! `src/` directory and reports production lines that break a layering rule:
//! - the protocol core stays synchronous and free of network/process access
//! - file access in the core is limited to the start-up loaders
//! - production code propagates errors instead of panicking
//! - async code in the CLI does not block on std I/O
//!
//! Production code is everything in a file before its `#[cfg(test)]` module;
//! comments are ignored.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// One offending source line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// File containing the line
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// The trimmed source line
    pub text: String,
    /// Name of the rule that was broken
    pub rule: &'static str,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} - {}: {}",
            self.path.display(),
            self.line,
            self.rule,
            self.text
        )
    }
}

/// Workspace root, resolved from this crate's manifest directory
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

/// All `.rs` files under `dir`, sorted for stable reports
#[must_use]
pub fn rust_sources(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Production code lines of a source file as `(line number, code)`
///
/// Stops at the first `#[cfg(test)]`; strips `//` comments.
#[must_use]
pub fn production_lines(content: &str) -> Vec<(usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| line.trim() != "#[cfg(test)]")
        .map(|(idx, line)| (idx + 1, line.split("//").next().unwrap_or(line)))
        .filter(|(_, code)| !code.trim().is_empty())
        .collect()
}

/// Scan every production line under `dir`
///
/// `check` receives the file path and the comment-stripped code of one line.
pub fn scan<F>(dir: &Path, rule: &'static str, check: F) -> Vec<Violation>
where
    F: Fn(&Path, &str) -> bool,
{
    let mut violations = Vec::new();

    for path in rust_sources(dir) {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        for (line, code) in production_lines(&content) {
            if check(&path, code) {
                violations.push(Violation {
                    path: path.clone(),
                    line,
                    text: code.trim().to_string(),
                    rule,
                });
            }
        }
    }

    violations
}

/// Panic with a readable report if there are violations
///
/// # Panics
///
/// Panics when `violations` is not empty.
pub fn assert_no_violations(title: &str, violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ {title}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }

    panic!(
        "\nFound {} violation(s): {title}\nFix these before merging!",
        violations.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let source = "use a;\n// comment\nfn f() {} // trailing\n\n#[cfg(test)]\nmod tests {}\n";
        let lines = production_lines(source);
        assert_eq!(lines, vec![(1, "use a;"), (3, "fn f() {} ")]);
    }

    #[test]
    fn test_doc_comments_ignored() {
        let lines = production_lines("//! let x = y.unwrap();\n/// doc\nlet z = 1;");
        assert_eq!(lines, vec![(3, "let z = 1;")]);
    }

    #[test]
    fn test_workspace_root_contains_core() {
        assert!(workspace_root().join("uicp").join("core").join("src").exists());
    }
}
