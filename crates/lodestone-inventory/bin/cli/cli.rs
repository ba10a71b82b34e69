use clap::{Args, Parser, Subcommand};
use lodestone_sku::DEFAULT_LAST_RACK;
use lodestone_telemetry::LogFormat;

pub const LAST_RACK_ENV: &str = "LODESTONE_LAST_RACK";
pub const MYSQL_DSN_ENV: &str = "LODESTONE_MYSQL_DSN";
pub const LOG_FORMAT_ENV: &str = "LODESTONE_LOG_FORMAT";

pub const DEFAULT_SEQUENCE_COUNT: usize = 10;

#[derive(Debug, Parser)]
#[command(name = "lodestone", about = "Work with warehouse location SKUs")]
pub struct CLI {
    /// Highest rack the odometer may advance into.
    #[arg(long, global = true, env = LAST_RACK_ENV, default_value_t = DEFAULT_LAST_RACK)]
    pub last_rack: char,

    #[arg(long, global = true, env = LOG_FORMAT_ENV, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check whether a code is a well-formed SKU.
    Validate { code: String },
    /// Print the SKU that follows a code.
    Next { code: String },
    /// Compare two SKUs in storage order.
    Compare { a: String, b: String },
    /// Print the highest valid SKU among the given codes.
    Highest { codes: Vec<String> },
    /// Print the first SKU ever issued.
    Start,
    /// Print the SKUs that follow a code.
    Sequence {
        from: String,
        #[arg(long, short = 'n', default_value_t = DEFAULT_SEQUENCE_COUNT)]
        count: usize,
    },
    /// Create the products table if it is missing.
    InitSchema(MySqlArgs),
    /// Report how many products hold a SKU.
    Status(MySqlArgs),
    /// Give a SKU to every product that lacks one.
    Backfill(MySqlArgs),
}

#[derive(Debug, Args)]
pub struct MySqlArgs {
    #[arg(long, env = MYSQL_DSN_ENV)]
    pub mysql_dsn: String,
}
