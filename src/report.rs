//! # Gap Analysis Report
//!
//! Pure data produced by [`crate::analyzer::GapAnalyzer::analyze`], plus the
//! recommendation rules and a plain-text rendering for the CLI.

use serde::Serialize;

use crate::defaults::FRAMEWORK_INSTALL_COMMAND;
use crate::output::{emoji, status_marker, OutputConfig};
use crate::status::LeaderStatus;

/// Result of one analysis pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapAnalysisReport {
    /// Detected framework version, verbatim
    pub bmad_version: Option<String>,
    /// Version requirement declared in the manifest
    pub required_version: Option<String>,
    /// `None` when either side could not be parsed
    pub version_compatible: Option<bool>,
    /// Whether the framework directory exists under the project root
    pub framework_installed: bool,
    pub leaders: Vec<LeaderStatus>,
    pub recommendations: Vec<String>,
}

impl GapAnalysisReport {
    pub fn new(
        bmad_version: Option<String>,
        required_version: Option<String>,
        version_compatible: Option<bool>,
        framework_installed: bool,
        leaders: Vec<LeaderStatus>,
    ) -> Self {
        let mut report = Self {
            bmad_version,
            required_version,
            version_compatible,
            framework_installed,
            leaders,
            recommendations: Vec::new(),
        };
        report.recommendations = derive_recommendations(&report);
        report
    }

    pub fn missing_leaders(&self) -> impl Iterator<Item = &LeaderStatus> {
        self.leaders.iter().filter(|l| !l.installed)
    }

    pub fn outdated_leaders(&self) -> impl Iterator<Item = &LeaderStatus> {
        self.leaders.iter().filter(|l| l.installed && l.needs_update())
    }

    /// Nothing to install or update
    pub fn is_reconciled(&self) -> bool {
        self.framework_installed
            && self.missing_leaders().next().is_none()
            && self.outdated_leaders().next().is_none()
    }

    /// Render the human-readable summary
    pub fn summary(&self, out: &OutputConfig) -> String {
        let mut lines = vec![
            format!("{} Gap Analysis Report", emoji(out, "📊", "==")),
            "=".repeat(50),
            String::new(),
        ];

        match &self.bmad_version {
            Some(version) => {
                lines.push(format!("BMAD Version: {}", version));
                if self.version_compatible == Some(false) {
                    if let Some(required) = &self.required_version {
                        lines.push(format!(
                            "{}  Required: {}",
                            emoji(out, "⚠️", "[WARN]"),
                            required
                        ));
                    }
                }
            }
            None => lines.push(format!(
                "{}  BMAD version not detected",
                emoji(out, "⚠️", "[WARN]")
            )),
        }
        lines.push(String::new());

        for leader in &self.leaders {
            if leader.is_up_to_date() {
                lines.push(format!("{} {}: Up to date", emoji(out, "✅", "[OK]"), leader.name));
            } else if !leader.installed {
                lines.push(format!(
                    "{} {}: Not installed",
                    emoji(out, "❌", "[MISSING]"),
                    leader.name
                ));
            } else {
                let heading = if leader.needs_update() {
                    format!("{}  {}: Needs update", emoji(out, "⚠️", "[WARN]"), leader.name)
                } else {
                    format!("{} {}: Local changes", emoji(out, "📦", "[INFO]"), leader.name)
                };
                lines.push(heading);
                for artifact in leader.pending() {
                    lines.push(format!(
                        "   {} {}: {}",
                        status_marker(out, artifact.change_type),
                        artifact.identity,
                        artifact.details
                    ));
                }
            }
        }
        lines.push(String::new());

        if !self.recommendations.is_empty() {
            lines.push(format!("{} Recommendations:", emoji(out, "💡", "==")));
            for recommendation in &self.recommendations {
                lines.push(format!("   - {}", recommendation));
            }
        }

        lines.join("\n")
    }
}

/// Derive recommended actions from a report.
///
/// Order is fixed: framework installation, version advisories, missing
/// leaders, outdated leaders. The all-clear message is only added when none
/// of the framework, missing or outdated rules fired.
pub fn derive_recommendations(report: &GapAnalysisReport) -> Vec<String> {
    let mut recommendations = Vec::new();

    if !report.framework_installed {
        recommendations.push(format!(
            "BMAD not installed - run: {}",
            FRAMEWORK_INSTALL_COMMAND
        ));
    } else if report.bmad_version.is_none() {
        recommendations.push(
            "BMAD version not detected - confirm the installed version manually before provisioning"
                .to_string(),
        );
    } else if report.version_compatible == Some(false) {
        recommendations.push(format!(
            "BMAD version {} does not satisfy {} - upgrade before provisioning",
            report.bmad_version.as_deref().unwrap_or_default(),
            report.required_version.as_deref().unwrap_or_default()
        ));
    }

    let missing: Vec<&str> = report.missing_leaders().map(|l| l.name.as_str()).collect();
    if !missing.is_empty() {
        recommendations.push(format!(
            "Install {} missing leaders: {}",
            missing.len(),
            missing.join(", ")
        ));
    }

    let outdated: Vec<&str> = report.outdated_leaders().map(|l| l.name.as_str()).collect();
    if !outdated.is_empty() {
        recommendations.push(format!(
            "Update {} outdated leaders: {}",
            outdated.len(),
            outdated.join(", ")
        ));
    }

    if report.framework_installed && missing.is_empty() && outdated.is_empty() {
        recommendations.push("All leaders up to date - safe to provision".to_string());
    }

    recommendations
}
