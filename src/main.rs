use anyhow::Result;
use clap::{builder::PossibleValuesParser, Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tazure::azure::{auth, client::AzureClient, http::format_azure_error, lister::ArmLister};
use tazure::config::Config;
use tazure::resource::{catalog, EnumerationScope, ResourceRecord, RunOptions, Walker};
use tazure::DiscoveryError;
use tracing_subscriber::EnvFilter;

/// Version injected at compile time via TAZURE_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("TAZURE_VERSION") {
    Some(v) => v,
    None => "dev",
};

/// Azure resource inventory for Terraform import
#[derive(Parser, Debug)]
#[command(name = "tazure", version = VERSION, about, long_about = None)]
struct Args {
    /// Azure subscription id
    #[arg(short, long)]
    subscription: Option<String>,

    /// Only discover resources in this resource group
    #[arg(short = 'g', long)]
    resource_group: Option<String>,

    /// Service to discover (repeatable, default: all)
    #[arg(long = "service", value_parser = PossibleValuesParser::new(catalog::SERVICE_NAMES))]
    services: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Walk services concurrently
    #[arg(long)]
    concurrent: bool,

    /// Abort discovery after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// ARM endpoint origin for sovereign clouds, e.g. https://management.chinacloudapi.cn
    #[arg(long)]
    endpoint: Option<String>,

    /// Remember subscription, resource group and services for next runs
    #[arg(long)]
    save: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> Option<&'static str> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some("error"),
            LogLevel::Warn => Some("warn"),
            LogLevel::Info => Some("info"),
            LogLevel::Debug => Some("debug"),
            LogLevel::Trace => Some("trace"),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let directive = level.as_directive()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("tazure {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("tazure").join("tazure.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".tazure").join("tazure.log");
    }
    PathBuf::from("tazure.log")
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let mut config = Config::load();

    let Some(subscription) = args
        .subscription
        .clone()
        .or_else(|| config.effective_subscription())
    else {
        return Err(anyhow::anyhow!(
            "No Azure subscription configured. Set ARM_SUBSCRIPTION_ID or use --subscription"
        ));
    };
    if !auth::validate_subscription_id(&subscription) {
        return Err(anyhow::anyhow!(
            "Invalid subscription id '{}': expected a GUID",
            subscription
        ));
    }

    let resource_group = args
        .resource_group
        .clone()
        .or_else(|| config.resource_group.clone());
    let services = if args.services.is_empty() {
        config.services.clone()
    } else {
        args.services.clone()
    };
    let endpoint = args
        .endpoint
        .clone()
        .unwrap_or_else(|| config.effective_endpoint());

    tracing::info!(
        "Using subscription: {}, resource group: {:?}, services: {:?}",
        subscription,
        resource_group,
        services
    );

    let roots = catalog::roots_for(&services)?;
    let scope = EnumerationScope::new(&subscription, resource_group.as_deref());
    let client = AzureClient::new(&endpoint)?;
    let walker = Walker::new(ArmLister::new(client));

    let options = RunOptions {
        concurrent: args.concurrent,
        timeout: args.timeout_secs.map(Duration::from_secs),
    };
    let discovery = walker.run(&scope, &roots, options).await;

    write_records(&discovery.records, args.output)?;

    if args.save {
        config.subscription_id = Some(subscription);
        config.resource_group = resource_group;
        config.services = services;
        if let Err(e) = config.save() {
            tracing::warn!("Failed to save config: {}", e);
        }
    }

    match &discovery.error {
        None => Ok(ExitCode::SUCCESS),
        Some(err) => {
            report_error(err, discovery.records.len());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn write_records(records: &[ResourceRecord], format: OutputFormat) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, records)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for record in records {
                writeln!(
                    out,
                    "{}\t{}\t{}",
                    record.terraform_type(),
                    record.name,
                    record.id
                )?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn report_error(err: &DiscoveryError, found: usize) {
    eprintln!("Discovery incomplete ({} resource(s) listed before the failure)", found);
    for (level, parent) in err.abort_path() {
        eprintln!("  while enumerating {} {}", level, parent);
    }

    let root = err.root_cause();
    match root {
        DiscoveryError::ListingFailed { kind, cause } => {
            eprintln!("Error: listing {} failed: {}", kind, format_azure_error(cause));
        }
        other => eprintln!("Error: {}", other),
    }
}
