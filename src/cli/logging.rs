//! Logger setup. Records are written as CI workflow commands on stdout.

use crate::env::EnvConfig;
use log::Level;
use std::io::Write;

/// Install the global logger.
///
/// `RUST_LOG` wins when set; otherwise this crate logs at `info`, or `debug`
/// when the runner has debug logging enabled.
pub fn init_logging(env: &EnvConfig) {
    let filters = env.get("RUST_LOG").unwrap_or_else(|| default_filters(env).to_string());

    let result = env_logger::Builder::new()
        .parse_filters(&filters)
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            writeln!(buf, "{}{}", command_prefix(record.level()), record.args())
        })
        .try_init();

    if let Err(e) = result {
        eprintln!("Logger already initialized: {}", e);
    }
}

fn default_filters(env: &EnvConfig) -> &'static str {
    if env.get("RUNNER_DEBUG").as_deref() == Some("1") {
        "warn,sentry_release_action=debug"
    } else {
        "warn,sentry_release_action=info"
    }
}

fn command_prefix(level: Level) -> &'static str {
    match level {
        Level::Error => "::error::",
        Level::Warn => "::warning::",
        Level::Info => "",
        Level::Debug | Level::Trace => "::debug::",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_debug_enables_debug() {
        let env = EnvConfig::from_pairs([("RUNNER_DEBUG", "1")]);
        assert_eq!(default_filters(&env), "warn,sentry_release_action=debug");
        assert_eq!(default_filters(&EnvConfig::default()), "warn,sentry_release_action=info");
    }

    #[test]
    fn test_level_prefixes() {
        assert_eq!(command_prefix(Level::Warn), "::warning::");
        assert_eq!(command_prefix(Level::Info), "");
        assert_eq!(command_prefix(Level::Trace), "::debug::");
    }
}
