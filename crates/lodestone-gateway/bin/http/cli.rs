use clap::{Parser, ValueEnum};
use lodestone_sku::DEFAULT_LAST_RACK;
use lodestone_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "LODESTONE_GATEWAY_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "LODESTONE_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "LODESTONE_MYSQL_DSN";
pub const LAST_RACK_ENV: &str = "LODESTONE_LAST_RACK";
pub const LOG_FORMAT_ENV: &str = "LODESTONE_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "LODESTONE_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "lodestone-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    /// Create the products table on startup when using MySQL.
    #[arg(long)]
    pub init_schema: bool,

    #[arg(long, env = LAST_RACK_ENV, default_value_t = DEFAULT_LAST_RACK)]
    pub last_rack: char,

    #[arg(long, env = LOG_FORMAT_ENV, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP/HTTP endpoint to export traces to.
    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}
