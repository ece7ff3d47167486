//! # Error Suggestions
//!
//! Helpers that build user-facing errors carrying `hint:` lines, so every
//! command tells the user what went wrong and what to try next.
//!
//! ```rust,ignore
//! return Err(suggestions::config_not_found(path));
//! ```

use std::path::Path;

use crate::defaults::{CONFIG_ENV, DEFAULT_MANIFEST, FRAMEWORK_INSTALL_COMMAND, ROOT_ENV};

/// The manifest file does not exist.
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Manifest not found: {path}\n\n\
         hint: Create a {DEFAULT_MANIFEST} file in the current directory\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set the {CONFIG_ENV} environment variable",
        path = path.display()
    )
}

/// The manifest parsed but failed validation.
///
/// Every problem is listed, followed by hints for the common ones.
pub fn validation_failed(errors: &[String]) -> anyhow::Error {
    let list = errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut hints = Vec::new();
    if errors.iter().any(|e| e.starts_with("Project root does not exist")) {
        hints.push(format!(
            "hint: Fix 'project.root' in the manifest or pass -p/--project-root (or set {ROOT_ENV})"
        ));
    }
    if errors.iter().any(|e| e.starts_with("BMAD not installed")) {
        hints.push(format!("hint: Install the framework first: {FRAMEWORK_INSTALL_COMMAND}"));
    }
    if errors.iter().any(|e| e.starts_with("Duplicate")) {
        hints.push("hint: Leader names and specialist ids must be unique".to_string());
    }

    let hints = if hints.is_empty() {
        String::new()
    } else {
        format!("\n\n{}", hints.join("\n"))
    };

    anyhow::anyhow!(
        "Manifest validation failed ({count} errors):\n{list}{hints}",
        count = errors.len()
    )
}

/// A `--leader` filter named a leader the manifest does not declare.
pub fn unknown_leader(name: &str, declared: &[&str]) -> anyhow::Error {
    let did_you_mean = find_similar(name, declared)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Unknown leader: {name}{did_you_mean}\n\n\
         Declared leaders are: {leaders}",
        leaders = declared.join(", ")
    )
}

/// The installed framework version is too old for the manifest.
pub fn incompatible_version(detected: &str, required: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Installed BMAD version {detected} does not satisfy '{required}'\n\n\
         hint: Upgrade with: {FRAMEWORK_INSTALL_COMMAND}\n\
         hint: Or relax 'project.bmad_version' in the manifest"
    )
}

/// Some reference tables could not be reconciled.
pub fn provisioning_failed(failed: usize) -> anyhow::Error {
    anyhow::anyhow!(
        "{failed} reference tables failed to provision\n\n\
         hint: Check file permissions under the leader's data/ directory\n\
         hint: Re-run with --log-level debug for per-table details"
    )
}

/// Closest candidate within an edit distance of 2, if any.
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&candidate| (candidate, edit_distance(input, candidate)))
        .filter(|&(_, distance)| distance <= 2 && distance < input.len())
        .min_by_key(|&(_, distance)| distance)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein distance over chars.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
