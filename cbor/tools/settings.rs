use hardy_cbor_stream::Limits;
use std::path::Path;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Per-target directives, e.g. `hardy_cbor_stream::decoder=trace`
const LOG_ENV: &str = "CBOR_EVENTS_LOG";

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_level: String,
    pub limits: Limits,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            limits: Limits::default(),
        }
    }
}

impl Settings {
    /// Layers the optional config file, then `CBOR_EVENTS__*` environment
    /// variables, then the command line.
    pub fn load(path: Option<&Path>, log_level: Option<String>) -> anyhow::Result<Self> {
        let mut b = config::Config::builder();
        if let Some(path) = path {
            b = b.add_source(config::File::from(path).format(config::FileFormat::Toml));
        }
        b = b.add_source(
            config::Environment::with_prefix("CBOR_EVENTS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut settings: Settings = b.build()?.try_deserialize()?;
        if let Some(log_level) = log_level {
            settings.log_level = log_level;
        }
        Ok(settings)
    }

    /// `log_level` is the default, refined by [`LOG_ENV`] directives.
    pub fn env_filter(&self) -> anyhow::Result<EnvFilter> {
        let log_level = self.log_level.parse::<LevelFilter>()?;
        Ok(EnvFilter::builder()
            .with_default_directive(log_level.into())
            .with_env_var(LOG_ENV)
            .from_env_lossy())
    }

    pub fn init_logger(&self) -> anyhow::Result<()> {
        let filter = self.env_filter()?;
        let with_target = filter
            .max_level_hint()
            .is_some_and(|level| level > LevelFilter::from_level(tracing::Level::INFO));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(with_target)
            .with_writer(std::io::stderr)
            .init();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_sources() {
        let settings = Settings::load(None, None).unwrap();
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.limits, Limits::default());
    }

    #[test]
    fn log_level_sets_default_filter() {
        let settings = Settings {
            log_level: "debug".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            settings.env_filter().unwrap().max_level_hint(),
            Some(LevelFilter::DEBUG)
        );

        let settings = Settings {
            log_level: "loud".to_string(),
            ..Settings::default()
        };
        assert!(settings.env_filter().is_err());
    }

    #[test]
    fn command_line_wins() {
        let settings = Settings::load(None, Some("trace".to_string())).unwrap();
        assert_eq!(settings.log_level, "trace");
    }
}
