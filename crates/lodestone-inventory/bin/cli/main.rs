mod cli;

use crate::cli::{Command, MySqlArgs, CLI};
use anyhow::Context;
use clap::Parser;
use lodestone_core::{Sku, SkuAllocator};
use lodestone_inventory::InventoryService;
use lodestone_sku::{Odometer, OdometerSettings};
use lodestone_storage::MySqlRepository;
use lodestone_telemetry::TelemetrySettings;
use std::cmp::Ordering;
use std::process::ExitCode;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = CLI::parse();

    let _telemetry = lodestone_telemetry::init(
        TelemetrySettings::builder()
            .service_name("lodestone-cli")
            .log_format(config.log_format)
            .build(),
    )?;

    let odometer = Odometer::new(
        OdometerSettings::builder()
            .last_rack(config.last_rack)
            .build(),
    )?;

    match config.command {
        Command::Validate { code } => {
            let valid = lodestone_sku::validate(&code);
            println!("{code}: {}", if valid { "valid" } else { "invalid" });
            if !valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Next { code } => {
            let current: Sku = code.parse()?;
            println!("{}", odometer.next(&current)?);
        }
        Command::Compare { a, b } => {
            let symbol = match lodestone_sku::compare(&a, &b)? {
                Ordering::Less => "<",
                Ordering::Equal => "=",
                Ordering::Greater => ">",
            };
            println!("{a} {symbol} {b}");
        }
        Command::Highest { codes } => match lodestone_sku::find_highest(&codes) {
            Some(highest) => println!("{highest}"),
            None => {
                eprintln!("no valid SKU among {} code(s)", codes.len());
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Start => println!("{}", lodestone_sku::starting()),
        Command::Sequence { from, count } => {
            let mut current: Sku = from.parse()?;
            for _ in 0..count {
                current = odometer.next(&current)?;
                println!("{current}");
            }
        }
        Command::InitSchema(args) => {
            let repository = connect(&args).await?;
            repository.ensure_schema().await?;
            info!("products schema is ready");
        }
        Command::Status(args) => {
            let service = InventoryService::with_odometer(connect(&args).await?, odometer);
            let status = service.status().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Command::Backfill(args) => {
            let service = InventoryService::with_odometer(connect(&args).await?, odometer);
            let report = service.backfill().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn connect(args: &MySqlArgs) -> anyhow::Result<MySqlRepository> {
    MySqlRepository::connect(&args.mysql_dsn)
        .await
        .context("failed to connect to MySQL")
}
