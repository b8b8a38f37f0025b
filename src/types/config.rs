//! Configuration structures for the access directory
//!
//! This module contains the directory configuration, the command line arguments and
//! the validation logic used to control where records live and how writes are
//! approved.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable consulted for the approval passkey
pub const PASSKEY_ENV_VAR: &str = "ACCESS_DIRECTORY_PASSKEY";

/// Policy defaults
pub mod defaults {
    /// Days after the last access at which a guest expires
    pub const GUEST_EXPIRATION_DAYS: i64 = 30;

    /// Length of issued parking validation codes
    pub const PARKING_CODE_LENGTH: usize = 6;

    /// Directory holding the collections
    pub const DATA_DIR: &str = "data";

    /// Employee collection file name
    pub const EMPLOYEES_FILE: &str = "employees.csv";

    /// Guest collection file name
    pub const GUESTS_FILE: &str = "guests.csv";

    /// Parking record collection file name
    pub const PARKING_RECORDS_FILE: &str = "parking_records.csv";
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "access-directory",
    version = "1.0.0",
    about = "Access Directory - Approval-gated employee, guest and parking records",
    long_about = "Runs one named access-directory operation against the employee, guest and parking record collections. Every state-changing operation asks the operator for the approval passkey before anything is written.

EXAMPLES:
    # Look up an employee
    access-directory check_employee_exists --arg alias=jdoe

    # Grant badge access (prompts for the passkey)
    access-directory update_badge_access --arg alias=jdoe --arg floors=2,3,5

    # Pass arguments as JSON
    access-directory add_guest --args-json '{\"first_name\":\"Tony\",\"last_name\":\"Stark\",\"alias\":\"tstark\"}'

    # List operations and their parameters
    access-directory --list-operations

    # Generate configuration template
    access-directory --print-config > my-config.json

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. ACCESS_DIRECTORY_PASSKEY environment variable (passkey only)
    3. Configuration file (--config flag)
    4. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Operation to run
    #[arg(help = "Operation name, e.g. check_employee_exists")]
    pub operation: Option<String>,

    /// Operation argument as key=value
    #[arg(
        short = 'a',
        long = "arg",
        value_name = "KEY=VALUE",
        help = "Operation argument as key=value (repeatable)"
    )]
    pub args: Vec<String>,

    /// Operation arguments as a JSON object
    #[arg(long, value_name = "JSON", help = "Operation arguments as a JSON object")]
    pub args_json: Option<String>,

    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Directory holding the record collections
    #[arg(long, help = "Directory holding the record collections")]
    pub data_dir: Option<String>,

    /// Approval passkey
    #[arg(
        long,
        help = "Approval passkey",
        long_help = "Passkey the operator must enter to approve writes. Prefer the ACCESS_DIRECTORY_PASSKEY environment variable or the configuration file."
    )]
    pub passkey: Option<String>,

    /// Days after which a guest expires
    #[arg(long, help = "Days after the last access at which a guest expires")]
    pub guest_expiration_days: Option<i64>,

    /// Random seed for reproducible parking codes
    #[arg(long, help = "Random seed for reproducible parking codes")]
    pub seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Emit logs as JSON
    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    /// Also write logs to daily files in this directory
    #[arg(long, help = "Also write logs to daily rolling files in this directory")]
    pub log_dir: Option<String>,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,

    /// Print the operation catalog and exit
    #[arg(long, help = "Print the operation catalog in JSON format and exit")]
    pub list_operations: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Directory holding the collections
    pub data_dir: Option<PathBuf>,

    /// Employee collection file name
    pub employees_file: Option<String>,

    /// Guest collection file name
    pub guests_file: Option<String>,

    /// Parking record collection file name
    pub parking_records_file: Option<String>,

    /// Approval passkey
    pub approval_passkey: Option<String>,

    /// Days after which a guest expires
    pub guest_expiration_days: Option<i64>,

    /// Length of parking validation codes
    pub parking_code_length: Option<usize>,

    /// Random seed for parking codes
    pub seed: Option<u64>,
}

/// Configuration for the access directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectoryConfig {
    /// Directory holding the collections
    pub data_dir: PathBuf,

    /// Employee collection file name
    pub employees_file: String,

    /// Guest collection file name
    pub guests_file: String,

    /// Parking record collection file name
    pub parking_records_file: String,

    /// Passkey the operator must enter to approve writes
    pub approval_passkey: String,

    /// Days after the last access at which a guest expires
    pub guest_expiration_days: i64,

    /// Length of parking validation codes
    pub parking_code_length: usize,

    /// Random seed for reproducible parking codes
    pub seed: Option<u64>,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for directory configuration
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigValidationError {
    /// No approval passkey configured
    #[error("An approval passkey is required (--passkey, ACCESS_DIRECTORY_PASSKEY or approval_passkey in the config file)")]
    MissingPasskey,

    /// A collection file name is empty
    #[error("File name for {0} must not be empty")]
    EmptyFileName(&'static str),

    /// Negative expiration window
    #[error("Guest expiration days must not be negative, got {0}")]
    InvalidExpirationDays(i64),

    /// Zero-length parking codes
    #[error("Parking code length must be greater than 0, got {0}")]
    InvalidCodeLength(usize),
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(defaults::DATA_DIR),
            employees_file: defaults::EMPLOYEES_FILE.to_string(),
            guests_file: defaults::GUESTS_FILE.to_string(),
            parking_records_file: defaults::PARKING_RECORDS_FILE.to_string(),
            approval_passkey: String::new(),
            guest_expiration_days: defaults::GUEST_EXPIRATION_DAYS,
            parking_code_length: defaults::PARKING_CODE_LENGTH,
            seed: None,
        }
    }
}

impl DirectoryConfig {
    /// Create a default configuration rooted at `data_dir` with the given passkey
    pub fn new(data_dir: impl Into<PathBuf>, approval_passkey: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            approval_passkey: approval_passkey.into(),
            ..Default::default()
        }
    }

    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        Self::from_sources(args, std::env::var(PASSKEY_ENV_VAR).ok())
    }

    /// Layer the config file, the passkey environment value and the CLI arguments
    fn from_sources(args: CliArgs, env_passkey: Option<String>) -> Result<Self, ConfigError> {
        // Start with default configuration
        let mut config = Self::default();

        // Load from config file if specified
        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        if let Some(passkey) = env_passkey.filter(|p| !p.is_empty()) {
            config.approval_passkey = passkey;
        }

        // Override with command line arguments (CLI takes precedence)
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let content = fs::read_to_string(path)?;
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            data_dir: config_file.data_dir.unwrap_or(defaults.data_dir),
            employees_file: config_file.employees_file.unwrap_or(defaults.employees_file),
            guests_file: config_file.guests_file.unwrap_or(defaults.guests_file),
            parking_records_file: config_file
                .parking_records_file
                .unwrap_or(defaults.parking_records_file),
            approval_passkey: config_file.approval_passkey.unwrap_or(defaults.approval_passkey),
            guest_expiration_days: config_file
                .guest_expiration_days
                .unwrap_or(defaults.guest_expiration_days),
            parking_code_length: config_file
                .parking_code_length
                .unwrap_or(defaults.parking_code_length),
            seed: config_file.seed.or(defaults.seed),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.data_dir {
            config.data_dir = PathBuf::from(value);
        }
        if let Some(value) = args.passkey {
            config.approval_passkey = value;
        }
        if let Some(value) = args.guest_expiration_days {
            config.guest_expiration_days = value;
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
    }

    /// Print configuration as JSON, with the passkey blanked out
    pub fn print_json(&self) -> Result<String, ConfigError> {
        let redacted = Self { approval_passkey: String::new(), ..self.clone() };
        Ok(serde_json::to_string_pretty(&redacted)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.approval_passkey.is_empty() {
            return Err(ConfigValidationError::MissingPasskey);
        }

        for (label, name) in [
            ("employees", &self.employees_file),
            ("guests", &self.guests_file),
            ("parking records", &self.parking_records_file),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigValidationError::EmptyFileName(label));
            }
        }

        if self.guest_expiration_days < 0 {
            return Err(ConfigValidationError::InvalidExpirationDays(self.guest_expiration_days));
        }

        if self.parking_code_length == 0 {
            return Err(ConfigValidationError::InvalidCodeLength(self.parking_code_length));
        }

        Ok(())
    }

    /// Path of the employee collection
    pub fn employees_path(&self) -> PathBuf {
        self.data_dir.join(&self.employees_file)
    }

    /// Path of the guest collection
    pub fn guests_path(&self) -> PathBuf {
        self.data_dir.join(&self.guests_file)
    }

    /// Path of the parking record collection
    pub fn parking_records_path(&self) -> PathBuf {
        self.data_dir.join(&self.parking_records_file)
    }
}
