use clap::{Parser, builder::BoolishValueParser};
use hn_core::client::{ClientConfig, DEFAULT_BASE_URL};
use hn_core::fetch::FetchOptions;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4030";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_BATCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 16;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Parser, Debug)]
#[command(name = "hn-mcpd", version, about = "Hacker News MCP daemon.")]
struct CliArgs {
    #[arg(long, env = "HN_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    api_base_url: String,

    #[arg(
        long,
        env = "HN_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS
    )]
    request_timeout_secs: u64,

    #[arg(
        long,
        env = "HN_BATCH_TIMEOUT_SECS",
        default_value_t = DEFAULT_BATCH_TIMEOUT_SECS
    )]
    batch_timeout_secs: u64,

    #[arg(
        long,
        env = "HN_MAX_CONCURRENT_FETCHES",
        default_value_t = DEFAULT_MAX_CONCURRENT_FETCHES
    )]
    max_concurrent_fetches: usize,

    #[arg(
        long = "stdio",
        env = "HN_ENABLE_STDIO",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(
        long = "http",
        env = "HN_MCP_SERVE",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    mcp_serve: bool,

    #[arg(long, env = "HN_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    #[arg(long, env = "HN_LOG", default_value = DEFAULT_LOG_FILTER)]
    log: String,

    /// Run a single operation (e.g. `list-top`), print its text, and exit.
    #[arg(long, value_name = "OPERATION")]
    call: Option<String>,

    /// JSON object of arguments for `--call`.
    #[arg(long = "args", value_name = "JSON", requires = "call")]
    call_args: Option<String>,
}

/// A single operation requested from the command line.
#[derive(Debug, Clone)]
pub struct OneShotCall {
    pub operation: String,
    pub arguments: Map<String, Value>,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct HnConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub batch_timeout: Duration,
    pub max_concurrent_fetches: usize,
    pub enable_stdio: bool,
    pub mcp_serve: bool,
    pub mcp_http_addr: SocketAddr,
    pub log_filter: String,
    pub call: Option<OneShotCall>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSetting { name: &'static str, value: String },
    NoTransport,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
            Self::NoTransport => write!(
                f,
                "no transport enabled: set HN_ENABLE_STDIO or HN_MCP_SERVE, or use --call"
            ),
        }
    }
}

impl Error for ConfigError {}

impl HnConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_base_url.clone()).with_request_timeout(self.request_timeout)
    }

    pub const fn fetch_options(&self) -> FetchOptions {
        FetchOptions::new()
            .with_max_concurrency(self.max_concurrent_fetches)
            .with_batch_timeout(self.batch_timeout)
    }
}

impl TryFrom<CliArgs> for HnConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let api_base_url = args.api_base_url.trim().to_string();
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidSetting {
                name: "HN_API_BASE_URL",
                value: args.api_base_url,
            });
        }

        if args.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "HN_REQUEST_TIMEOUT_SECS",
                value: args.request_timeout_secs.to_string(),
            });
        }
        if args.batch_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "HN_BATCH_TIMEOUT_SECS",
                value: args.batch_timeout_secs.to_string(),
            });
        }
        if args.max_concurrent_fetches == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "HN_MAX_CONCURRENT_FETCHES",
                value: args.max_concurrent_fetches.to_string(),
            });
        }

        let call = match args.call {
            Some(operation) => {
                let arguments = match args.call_args.as_deref().map(str::trim) {
                    None | Some("") => Map::new(),
                    Some(raw) => serde_json::from_str::<Map<String, Value>>(raw).map_err(|_| {
                        ConfigError::InvalidSetting {
                            name: "--args",
                            value: raw.to_string(),
                        }
                    })?,
                };
                Some(OneShotCall {
                    operation: operation.trim().to_string(),
                    arguments,
                })
            }
            None => None,
        };

        if call.is_none() && !args.enable_stdio && !args.mcp_serve {
            return Err(ConfigError::NoTransport);
        }

        Ok(Self {
            api_base_url,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            batch_timeout: Duration::from_secs(args.batch_timeout_secs),
            max_concurrent_fetches: args.max_concurrent_fetches,
            enable_stdio: args.enable_stdio,
            mcp_serve: args.mcp_serve,
            mcp_http_addr: args.mcp_http_addr,
            log_filter: args.log,
            call,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            batch_timeout_secs: DEFAULT_BATCH_TIMEOUT_SECS,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            enable_stdio: true,
            mcp_serve: false,
            mcp_http_addr: DEFAULT_MCP_HTTP_ADDR.parse().expect("valid MCP addr"),
            log: DEFAULT_LOG_FILTER.to_string(),
            call: None,
            call_args: None,
        }
    }

    #[test]
    fn defaults_parse() {
        let config = HnConfig::try_from(base_args()).expect("config should parse");

        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.fetch_options().max_concurrency, 16);
        assert_eq!(config.fetch_options().batch_timeout, Duration::from_secs(30));
        assert_eq!(config.client_config().request_timeout, Duration::from_secs(10));
        assert!(config.call.is_none());
    }

    #[test]
    fn cli_parses_flags() {
        let args = CliArgs::try_parse_from([
            "hn-mcpd",
            "--api-base-url",
            "http://localhost:9000/v0",
            "--max-concurrent-fetches",
            "4",
            "--call",
            "list-top",
            "--args",
            r#"{"limit": 3}"#,
        ])
        .expect("flags should parse");
        let config = HnConfig::try_from(args).expect("config should parse");

        assert_eq!(config.api_base_url, "http://localhost:9000/v0");
        assert_eq!(config.max_concurrent_fetches, 4);
        let call = config.call.expect("call should be set");
        assert_eq!(call.operation, "list-top");
        assert_eq!(call.arguments.get("limit"), Some(&Value::from(3)));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut args = base_args();
        args.api_base_url = "ftp://example.com".to_string();

        let err = HnConfig::try_from(args).expect_err("ftp should be rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidSetting {
                name: "HN_API_BASE_URL",
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_concurrency() {
        let mut args = base_args();
        args.max_concurrent_fetches = 0;

        assert!(HnConfig::try_from(args).is_err());
    }

    #[test]
    fn rejects_malformed_call_arguments() {
        let mut args = base_args();
        args.call = Some("get-story".to_string());
        args.call_args = Some("[1, 2]".to_string());

        let err = HnConfig::try_from(args).expect_err("array is not an argument object");
        assert!(matches!(err, ConfigError::InvalidSetting { name: "--args", .. }));
    }

    #[test]
    fn requires_some_transport() {
        let mut args = base_args();
        args.enable_stdio = false;
        args.mcp_serve = false;
        assert!(matches!(
            HnConfig::try_from(args),
            Err(ConfigError::NoTransport)
        ));

        let mut args = base_args();
        args.enable_stdio = false;
        args.call = Some("list-best".to_string());
        assert!(HnConfig::try_from(args).is_ok());
    }
}
