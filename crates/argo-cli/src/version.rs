//! Build information of this binary.
//!
//! Release builds set `ARGO_GIT_TAG`, `ARGO_GIT_COMMIT`, `ARGO_GIT_TREE_STATE`
//! and `ARGO_BUILD_DATE` at compile time. Local builds fall back to the crate
//! version.

use argo_apiclient::VersionInfo;

/// Name of the CLI binary.
pub const CLI_NAME: &str = "argo";

/// Version derived from the crate version.
const CRATE_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

/// Value used for build metadata that was not provided.
const UNKNOWN: &str = "unknown";

/// Git tag this binary was built from. This is what gets compared against the
/// server.
#[must_use]
pub fn git_tag() -> &'static str {
    option_env!("ARGO_GIT_TAG").unwrap_or(CRATE_VERSION)
}

/// Full build information of this binary.
#[must_use]
pub fn client_version() -> VersionInfo {
    VersionInfo {
        version: CRATE_VERSION.to_string(),
        build_date: option_env!("ARGO_BUILD_DATE").unwrap_or(UNKNOWN).to_string(),
        git_commit: option_env!("ARGO_GIT_COMMIT").unwrap_or(UNKNOWN).to_string(),
        git_tag: git_tag().to_string(),
        git_tree_state: option_env!("ARGO_GIT_TREE_STATE").unwrap_or(UNKNOWN).to_string(),
        go_version: String::new(),
        compiler: "rustc".to_string(),
        platform: platform(),
    }
}

/// `os/arch` using the server's naming for common architectures.
fn platform() -> String {
    let arch = match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        other => other,
    };
    format!("{}/{arch}", std::env::consts::OS)
}
