//! Tracing subscriber setup.
//!
//! `--loglevel` sets the level for everything. `--gloglevel` sets the
//! verbosity of the HTTP transport libraries separately, so that wire-level
//! noise only shows up when asked for.

use std::io;

use tracing_subscriber::EnvFilter;

use crate::cli::LogSettings;

/// Crates whose verbosity follows the glog level.
pub const TRANSPORT_TARGETS: [&str; 4] = ["hyper", "hyper_util", "h2", "reqwest"];

/// Level for the transport crates at a given glog level.
#[must_use]
pub const fn transport_level(glog_level: i32) -> &'static str {
    match glog_level {
        i32::MIN..=0 => "warn",
        1..=4 => "info",
        5..=6 => "debug",
        _ => "trace",
    }
}

/// Filter directives for the given settings, e.g. `info,hyper=warn,...`.
#[must_use]
pub fn filter_directives(settings: &LogSettings) -> String {
    let transport = transport_level(settings.glog_level);
    TRANSPORT_TARGETS
        .iter()
        .fold(settings.level.as_str().to_string(), |mut directives, target| {
            directives.push(',');
            directives.push_str(target);
            directives.push('=');
            directives.push_str(transport);
            directives
        })
}

/// Install the stderr subscriber.
///
/// Returns `false` if a global subscriber was already installed, in which
/// case the existing one is left in place.
pub fn init(settings: &LogSettings) -> bool {
    let filter = EnvFilter::new(filter_directives(settings));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
