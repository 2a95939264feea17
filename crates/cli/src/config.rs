use std::str::FromStr;

/// How a finished check is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Aligned table or bulleted error list.
    #[default]
    Table,
    /// The full outcome as pretty-printed JSON.
    Json,
}

impl FromStr for OutputFormat {
    type Err = UnknownOutputFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(UnknownOutputFormat(other.to_string())),
        }
    }
}

/// An output format name that is neither `table` nor `json`.
///
/// Carries no source; `clap` reports it against the flag and
/// [`CliConfig::resolve`] against the environment variable.
#[derive(Debug, thiserror::Error)]
#[error("unknown output format '{0}', expected table or json")]
pub struct UnknownOutputFormat(pub String);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: {message}")]
    Invalid { var: &'static str, message: String },
}

/// Values given on the command line. `None` means the flag was absent.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub output: Option<OutputFormat>,
    /// Raw `--delimiter` text; same rules as `CSVGATE_DELIMITER`.
    pub delimiter: Option<String>,
    pub log_level: Option<String>,
}

/// CLI configuration loaded from environment variables.
///
/// All fields have defaults; command-line flags override them (see
/// [`CliConfig::resolve`]).
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub output: OutputFormat,
    /// Field delimiter byte (default: `,`).
    pub delimiter: u8,
    /// Fallback log filter when `RUST_LOG` is unset (default: `info`).
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output: OutputFormat::Table,
            delimiter: b',',
            log_level: "info".into(),
        }
    }
}

impl CliConfig {
    /// Load configuration from flags, then environment variables, then
    /// defaults.
    ///
    /// | Env Var             | Flag          | Default |
    /// |---------------------|---------------|---------|
    /// | `CSVGATE_OUTPUT`    | `--output`    | `table` |
    /// | `CSVGATE_DELIMITER` | `--delimiter` | `,`     |
    /// | `CSVGATE_LOG`       | `--log-level` | `info`  |
    pub fn from_env_with(overrides: CliOverrides) -> Result<Self, ConfigError> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Merge command-line values over an arbitrary key lookup, so tests can
    /// avoid touching the process environment.
    ///
    /// A variable is only read and validated when its flag is absent, so a
    /// malformed environment value never blocks an explicit flag.
    pub fn resolve<F>(overrides: CliOverrides, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let output = match overrides.output {
            Some(output) => output,
            None => match lookup("CSVGATE_OUTPUT") {
                Some(v) => v.parse::<OutputFormat>().map_err(|e| ConfigError::Invalid {
                    var: "CSVGATE_OUTPUT",
                    message: e.to_string(),
                })?,
                None => defaults.output,
            },
        };

        let delimiter = match overrides.delimiter {
            Some(raw) => parse_delimiter("--delimiter", &raw)?,
            None => match lookup("CSVGATE_DELIMITER") {
                Some(v) => parse_delimiter("CSVGATE_DELIMITER", &v)?,
                None => defaults.delimiter,
            },
        };

        let log_level = overrides
            .log_level
            .or_else(|| lookup("CSVGATE_LOG"))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.log_level);

        Ok(Self {
            output,
            delimiter,
            log_level,
        })
    }
}

/// Accepts a single ASCII character, or the literal `\t` / `tab`.
fn parse_delimiter(var: &'static str, value: &str) -> Result<u8, ConfigError> {
    match value {
        "\\t" | "tab" => return Ok(b'\t'),
        _ => {}
    }
    match value.as_bytes() {
        [b] if b.is_ascii() && *b != b'"' && *b != b'\n' && *b != b'\r' => Ok(*b),
        _ => Err(ConfigError::Invalid {
            var,
            message: format!("delimiter must be a single ASCII character, got '{value}'"),
        }),
    }
}
