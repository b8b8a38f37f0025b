// Access Directory - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ACCESS_DIRECTORY_PASSKEY=1234 ./target/release/amzn-access-directory-rust check_employee_exists --arg alias=jdoe
// ```
//
// Or with a configuration file:
//
// ```console
// $ ./target/release/amzn-access-directory-rust --config directory.json update_badge_access -a alias=jdoe -a floors=2,3
// ```

use amzn_access_directory_rust::approval::{ConsoleApprovalGate, Passkey};
use amzn_access_directory_rust::service::{
    catalog, json_arguments, parse_key_value_args, AccessDirectory, LoggingConfig, ServiceError,
};
use amzn_access_directory_rust::types::config::CliArgs;
use amzn_access_directory_rust::types::DirectoryConfig;
use anyhow::Context;
use clap::Parser;
use std::collections::BTreeMap;
use std::process;
use tracing::{error, info};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    match run(args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            let service_error = e.downcast_ref::<ServiceError>();
            let category = service_error.map_or("Startup", ServiceError::category);
            error!(category, "{:#}", e);
            eprintln!("Error [{}]: {:#}", category, e);
            if service_error.is_some_and(ServiceError::is_recoverable) {
                eprintln!("Correct the request and run it again.");
            }
            process::exit(2);
        }
    }
}

/// Run one operation and return the process exit code
fn run(args: CliArgs) -> anyhow::Result<i32> {
    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        println!("{}", DirectoryConfig::default().print_json()?);
        return Ok(0);
    }

    if args.list_operations {
        println!("{}", serde_json::to_string_pretty(&catalog())?);
        return Ok(0);
    }

    let mut logging = LoggingConfig::from_flags(args.verbose, args.debug);
    if args.json_logs {
        logging = logging.with_json_format();
    }
    if let Some(dir) = &args.log_dir {
        logging = logging.with_file_logging(dir.clone());
    }
    // Held until exit so buffered file logs are flushed
    let _log_guard = logging.init().context("Failed to initialize logging")?;

    info!("Starting Access Directory");

    let Some(operation) = args.operation.clone() else {
        return Err(ServiceError::invalid_arguments(
            "no operation given; use --list-operations to see the available operations",
        )
        .into());
    };
    let arguments = collect_arguments(&args)?;

    // Load configuration from CLI arguments and optional config file
    let config = DirectoryConfig::from_cli_args(args)
        .map_err(ServiceError::from)
        .context("Failed to load configuration")?;
    let gate = ConsoleApprovalGate::stdio(Passkey::new(config.approval_passkey.clone()));
    let mut directory =
        AccessDirectory::open(config, gate).context("Failed to open access directory")?;

    let outcome = directory.invoke(&operation, &arguments);
    println!("{}", outcome);

    Ok(if outcome.kind.is_error() { 1 } else { 0 })
}

/// Merge `--args-json` with `--arg KEY=VALUE` pairs; the pairs win on conflict
fn collect_arguments(args: &CliArgs) -> anyhow::Result<BTreeMap<String, String>> {
    let mut arguments = match &args.args_json {
        Some(raw) => {
            let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| {
                ServiceError::invalid_arguments(format!("--args-json is not valid JSON: {}", e))
            })?;
            json_arguments(&value)?
        }
        None => BTreeMap::new(),
    };
    arguments.extend(parse_key_value_args(&args.args)?);
    Ok(arguments)
}
