use std::time::Duration;

use iweb_engine::ClientSettings;
use iweb_logging::{LevelFilter, LogDestination, LogSettings};
use thiserror::Error;

use crate::cli::Options;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("--site is required unless --dry-run is given")]
    MissingSite,
    #[error("--token or WP_AUTH_TOKEN is required unless --dry-run is given")]
    MissingToken,
}

pub fn log_settings(options: &Options) -> LogSettings {
    let level = match options.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let destination = match &options.log_file {
        Some(path) if options.quiet => LogDestination::File(path.clone()),
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    LogSettings { destination, level }
}

pub fn client_settings(options: &Options) -> Result<ClientSettings, ConfigError> {
    let site = non_blank(options.site.as_deref()).ok_or(ConfigError::MissingSite)?;
    let token = non_blank(options.token.as_deref()).ok_or(ConfigError::MissingToken)?;

    let mut settings = ClientSettings::new(site, token);
    settings.api_base = options.api_base.clone();
    settings.connect_timeout = Duration::from_secs(options.connect_timeout_secs);
    settings.request_timeout = Duration::from_secs(options.request_timeout_secs);
    Ok(settings)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn options() -> Options {
        Options {
            site: Some("mytrips".to_string()),
            token: Some("secret".to_string()),
            api_base: "http://localhost:9/rest/v1.1".to_string(),
            connect_timeout_secs: 3,
            request_timeout_secs: 30,
            dry_run: false,
            stop_on_error: false,
            log_file: None,
            quiet: false,
            verbose: 0,
        }
    }

    #[test]
    fn client_settings_follow_options() {
        let settings = client_settings(&options()).unwrap();
        assert_eq!(settings.site, "mytrips");
        assert_eq!(settings.token, "secret");
        assert_eq!(settings.api_base, "http://localhost:9/rest/v1.1");
        assert_eq!(settings.connect_timeout, Duration::from_secs(3));
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn blank_site_or_token_is_rejected() {
        let mut no_site = options();
        no_site.site = Some("  ".to_string());
        assert_eq!(client_settings(&no_site).unwrap_err(), ConfigError::MissingSite);

        let mut no_token = options();
        no_token.token = None;
        assert_eq!(client_settings(&no_token).unwrap_err(), ConfigError::MissingToken);
    }

    #[test]
    fn verbosity_and_log_file_pick_log_settings() {
        assert_eq!(log_settings(&options()), LogSettings::default());

        let mut loud = options();
        loud.verbose = 3;
        loud.log_file = Some(PathBuf::from("migrate.log"));
        assert_eq!(
            log_settings(&loud),
            LogSettings {
                destination: LogDestination::Both(PathBuf::from("migrate.log")),
                level: LevelFilter::Trace,
            }
        );
    }

    #[test]
    fn quiet_logs_to_the_file_alone() {
        let mut quiet = options();
        quiet.quiet = true;
        quiet.log_file = Some(PathBuf::from("migrate.log"));
        assert_eq!(
            log_settings(&quiet).destination,
            LogDestination::File(PathBuf::from("migrate.log"))
        );
    }
}
