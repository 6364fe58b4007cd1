/*!
 * bucket-sizer CLI - Command Line Interface
 */

use bucket_sizer::{
    config::{LogLevel, SizerConfig},
    error::{Result, SizerError, EXIT_SUCCESS, EXIT_USAGE},
    logging,
    output::OutputWriter,
    progress::SpinnerProgress,
    protocol::s3::SignatureVersion,
    runner,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bucket-sizer")]
#[command(version, about = "Enumerate an S3 bucket and report object size statistics", long_about = None)]
struct Cli {
    /// The S3 endpoint, including scheme and hostname. Port optional.
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// The S3 access key
    #[arg(long, value_name = "ACCESS_KEY")]
    access_key: Option<String>,

    /// The secret key for the access key
    #[arg(long, value_name = "SECRET_KEY")]
    secret_key: Option<String>,

    /// The bucket to enumerate
    #[arg(long, value_name = "BUCKET")]
    bucket: Option<String>,

    /// Number of items per page
    #[arg(long, value_name = "ITEMS", value_parser = clap::value_parser!(u32).range(1..))]
    page_size: Option<u32>,

    /// Socket timeout in milliseconds
    #[arg(long, value_name = "MILLISECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    socket_timeout: Option<u64>,

    /// Do not enumerate versions
    #[arg(long)]
    no_versions: bool,

    /// Key marker to resume listing from
    #[arg(long, value_name = "KEY")]
    key_marker: Option<String>,

    /// Version marker to resume the listing from
    #[arg(long, value_name = "VERSION_ID")]
    version_marker: Option<String>,

    /// Write key names to this file
    #[arg(long, value_name = "PATH")]
    key_file: Option<PathBuf>,

    /// TOML file with default values for any of these options
    #[arg(short = 'c', long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Region used for endpoint resolution
    #[arg(long, value_name = "REGION")]
    region: Option<String>,

    /// Request signing scheme
    #[arg(long, value_enum)]
    signature: Option<SignatureArg>,

    /// HTTP attempts per request, including the first
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_attempts: Option<u32>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// Disable the progress spinner
    #[arg(long)]
    no_progress: bool,

    /// Log level
    #[arg(long, value_enum)]
    log_level: Option<LogLevelArg>,

    /// Verbose logging (same as --log-level debug)
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Write JSON logs to this file
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SignatureArg {
    V2,
    V4,
}

impl From<SignatureArg> for SignatureVersion {
    fn from(arg: SignatureArg) -> Self {
        match arg {
            SignatureArg::V2 => SignatureVersion::V2,
            SignatureArg::V4 => SignatureVersion::V4,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

impl Cli {
    /// Load the config file, if any, and lay the flags over it
    fn into_config(self) -> Result<SizerConfig> {
        let base = match &self.config {
            Some(path) => SizerConfig::from_file(path)?,
            None => SizerConfig::default(),
        };
        Ok(self.apply(base))
    }

    fn apply(self, mut config: SizerConfig) -> SizerConfig {
        if self.endpoint.is_some() {
            config.endpoint = self.endpoint;
        }
        if self.access_key.is_some() {
            config.access_key = self.access_key;
        }
        if self.secret_key.is_some() {
            config.secret_key = self.secret_key;
        }
        if self.bucket.is_some() {
            config.bucket = self.bucket;
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if self.socket_timeout.is_some() {
            config.socket_timeout_ms = self.socket_timeout;
        }
        if self.no_versions {
            config.no_versions = true;
        }
        if self.key_marker.is_some() {
            config.key_marker = self.key_marker;
        }
        if self.version_marker.is_some() {
            config.version_marker = self.version_marker;
        }
        if self.key_file.is_some() {
            config.key_file = self.key_file;
        }
        if let Some(region) = self.region {
            config.region = region;
        }
        if let Some(signature) = self.signature {
            config.signature = signature.into();
        }
        if let Some(max_attempts) = self.max_attempts {
            config.max_attempts = max_attempts;
        }
        if self.json {
            config.json = true;
        }
        if self.no_progress {
            config.show_progress = false;
        }
        if let Some(level) = self.log_level {
            config.log_level = level.into();
        }
        if self.verbose {
            config.verbose = true;
        }
        if self.log.is_some() {
            config.log_file = self.log;
        }
        config
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too
            let code = if e.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    let output = OutputWriter::new(config.json);
    let code = match run(&config, &output) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            output.error(&e.to_string());
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run(config: &SizerConfig, output: &OutputWriter) -> Result<()> {
    if let Err(e) = logging::init_logging(config) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    config.validate()?;
    tracing::debug!(?config, "resolved configuration");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| SizerError::Config(format!("Failed to start async runtime: {}", e)))?;

    let progress = SpinnerProgress::new(config.show_progress && !output.is_json());
    let report = runtime.block_on(runner::size_bucket(config, &progress))?;

    output.report(&report);
    Ok(())
}
