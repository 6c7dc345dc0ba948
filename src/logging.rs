//! Logging configuration passed explicitly to the client and fetcher.

use log::{Level, LevelFilter};

/// Log target shared by the upstream client and the fetch loop.
pub const CLIENT_TARGET: &str = "superhero.client";

/// Verbosity levels supported by the application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Informational output only.
    #[default]
    Info,
    /// Includes raw responses and skipped identifiers.
    Debug,
}

impl Verbosity {
    fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
        }
    }
}

/// Logging settings resolved from the environment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogConfig {
    verbosity: Verbosity,
    notice: Option<String>,
}

impl LogConfig {
    /// Creates a configuration with the given verbosity.
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            notice: None,
        }
    }

    /// Reads `LOG_LEVEL` and `DEBUG` from the process environment.
    pub fn from_env() -> Self {
        let log_level = std::env::var("LOG_LEVEL").ok();
        let debug = std::env::var("DEBUG").ok();
        Self::from_vars(log_level.as_deref(), debug.as_deref())
    }

    /// Resolves the configuration from raw variable values.
    ///
    /// `LOG_LEVEL` defaults to `INFO`. A non-empty `DEBUG` always wins over `LOG_LEVEL`.
    pub fn from_vars(log_level: Option<&str>, debug: Option<&str>) -> Self {
        let requested = log_level.unwrap_or("INFO").trim().to_ascii_uppercase();

        if debug.map_or(false, |value| !value.is_empty()) {
            let notice = log_level
                .filter(|value| !value.trim().is_empty())
                .map(|_| "Overriding LOG_LEVEL setting with DEBUG".to_string());
            return Self {
                verbosity: Verbosity::Debug,
                notice,
            };
        }

        match requested.as_str() {
            "DEBUG" => Self::new(Verbosity::Debug),
            "INFO" | "" => Self::new(Verbosity::Info),
            _ => Self {
                verbosity: Verbosity::Info,
                notice: Some(format!(
                    "LOG_LEVEL '{requested}' is not valid - Log Level set to INFO"
                )),
            },
        }
    }

    /// Returns the resolved verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Returns the warning produced while resolving the configuration, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Returns whether records at `level` should be emitted.
    pub fn enabled(&self, level: Level) -> bool {
        level <= self.verbosity.level_filter()
    }

    /// Installs `env_logger` with this configuration and reports any resolution warning.
    ///
    /// Calling this more than once keeps the first installed logger.
    pub fn init(&self) {
        let installed = env_logger::Builder::new()
            .filter_level(self.verbosity.level_filter())
            .format_timestamp(None)
            .try_init()
            .is_ok();

        if let (true, Some(notice)) = (installed, self.notice()) {
            log::warn!(target: CLIENT_TARGET, "{notice}");
        }
    }
}
