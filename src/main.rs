use site_bootstrap::config::{HostCheck, ProcessEnv, SiteConfiguration, SiteOverrides};
use site_bootstrap::localization::{LocalizationTable, placeholders};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// Options taken from `--name=value` arguments.
#[derive(Debug, Default)]
struct Args {
    overrides: Option<String>,
    check_host: Option<String>,
    lang: Option<String>,
    log_level: Option<String>,
    unknown: Vec<String>,
}

fn parse_args(argv: impl IntoIterator<Item = String>) -> Args {
    let mut args = Args::default();
    for arg in argv {
        if let Some(path) = arg.strip_prefix("--overrides=") {
            args.overrides = Some(path.to_string());
        } else if let Some(host) = arg.strip_prefix("--check-host=") {
            args.check_host = Some(host.to_string());
        } else if let Some(path) = arg.strip_prefix("--lang=") {
            args.lang = Some(path.to_string());
        } else if let Some(level) = arg.strip_prefix("--log-level=") {
            args.log_level = Some(level.to_string());
        } else {
            args.unknown.push(arg);
        }
    }
    args
}

fn init_tracing(log_level: Option<&str>) {
    let level = match log_level {
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("warn") | Some("warning") => Level::WARN,
        Some("error") => Level::ERROR,
        Some("trace") => Level::TRACE,
        _ => Level::INFO,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

fn main() -> ExitCode {
    // Load .env file if it exists (ignore error if not found)
    dotenvy::dotenv().ok();

    let args = parse_args(env::args().skip(1));
    init_tracing(args.log_level.as_deref());

    for arg in &args.unknown {
        warn!(argument = %arg, "Ignoring unknown argument");
    }

    let overrides = match args.overrides.as_deref() {
        Some(path) => match SiteOverrides::load(path) {
            Ok(o) => o,
            Err(e) => {
                error!(path = %path, error = %e, "Failed to load overrides");
                return ExitCode::FAILURE;
            }
        },
        None => SiteOverrides::default(),
    };

    let site = match SiteConfiguration::from_env(&ProcessEnv, &overrides) {
        Ok(site) => site,
        Err(e) => {
            error!(error = %e, "Site configuration failed");
            return ExitCode::FAILURE;
        }
    };

    info!(
        database = %site.database.database,
        user = %site.database.username,
        prefix = %site.database.prefix,
        trusted_hosts = ?site.security.trusted_hosts,
        drupal_compatibility = site.compatibility.drupal_compatibility,
        base_url = ?site.base_url,
        "Bootstrap configuration ready"
    );

    if let Some(host) = args.check_host.as_deref() {
        match site.security.trusted_hosts.check(host) {
            HostCheck::Allowed => info!(host = %host, "Host accepted"),
            HostCheck::Rejected => {
                warn!(host = %host, "Host rejected by trusted host patterns");
                return ExitCode::FAILURE;
            }
            HostCheck::Invalid => {
                warn!(host = %host, "Host is not a valid HTTP host");
                return ExitCode::FAILURE;
            }
        }
    }

    if let Some(path) = args.lang.as_deref() {
        match LocalizationTable::load(path) {
            Ok(table) => {
                let templated = table
                    .iter()
                    .filter(|(_, text)| !placeholders(text).is_empty())
                    .count();
                info!(
                    language = %table.language(),
                    entries = table.len(),
                    templated,
                    "Language table loaded"
                );
            }
            Err(e) => {
                error!(path = %path, error = %e, "Failed to load language table");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_known_flags() {
        let args = parse_args(argv(&[
            "--overrides=site.yaml",
            "--check-host=www.example.com",
            "--lang=gl.js",
            "--log-level=debug",
        ]));
        assert_eq!(args.overrides.as_deref(), Some("site.yaml"));
        assert_eq!(args.check_host.as_deref(), Some("www.example.com"));
        assert_eq!(args.lang.as_deref(), Some("gl.js"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.unknown.is_empty());
    }

    #[test]
    fn test_parse_args_collects_unknown() {
        let args = parse_args(argv(&["--verbose", "--lang=gl.js", "extra"]));
        assert_eq!(args.unknown, vec!["--verbose", "extra"]);
        assert_eq!(args.lang.as_deref(), Some("gl.js"));
    }
}
