// SPDX-License-Identifier: Apache-2.0

use crate::LogFlags;
use prizenation_core::ENV_LOG_LEVEL;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LEVEL: &str = "warn";

fn forced_level(flags: LogFlags) -> Option<&'static str> {
    if flags.trace || flags.verbose > 1 {
        Some("trace")
    } else if flags.verbose == 1 {
        Some("debug")
    } else if flags.quiet {
        Some("error")
    } else {
        None
    }
}

/// Flags win over `RUST_LOG`, which wins over `PRIZENATION_LOG_LEVEL`.
fn filter_for(flags: LogFlags) -> EnvFilter {
    if let Some(level) = forced_level(flags) {
        return EnvFilter::new(level);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var(ENV_LOG_LEVEL)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LEVEL.to_string());
        EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    })
}

/// Logs go to stderr so stdout stays machine readable.
pub(crate) fn init(flags: LogFlags, log_json: bool) {
    let filter = filter_for(flags);
    let result = if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    if let Err(err) = result {
        eprintln!("logging already initialised: {err}");
    }
}
