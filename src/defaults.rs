//! Default values for bmad-provisioner configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

/// Manifest file looked up in the current directory when `--config` is not given.
pub const DEFAULT_MANIFEST: &str = "skills-manifest.yaml";

/// Environment variable that can point at the manifest.
pub const CONFIG_ENV: &str = "BMAD_PROVISIONER_CONFIG";

/// Environment variable that overrides the manifest's project root.
pub const ROOT_ENV: &str = "BMAD_PROVISIONER_ROOT";

/// Workflow phase assigned to leaders that do not declare one.
pub const DEFAULT_PHASE: &str = "3-arch";

/// Command suggested when the framework itself is not installed.
pub const FRAMEWORK_INSTALL_COMMAND: &str = "npx bmad-method@alpha install";

/// Default log level for the CLI when neither `--log-level` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_LEVEL: &str = "warn";
