mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hedgehog_native::config::{self, Config, ConfigLoader, OutputFormat};
use hedgehog_native::core::types::RegionType;
use hedgehog_native::memory::{FilterCriteria, RegionFilter};
use hedgehog_native::{Address, IntrospectionBackend, Introspector, ProcessId, ThreadId};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Read-only process introspection
#[derive(Parser)]
#[command(name = "hedgehog-native")]
#[command(version)]
#[command(about = "Inspect memory regions, memory and registers of live processes", long_about = None)]
struct Cli {
    /// Configuration file (defaults to hedgehog.toml in the working directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format, overriding the configuration
    #[arg(short, long, global = true, value_enum)]
    format: Option<Format>,

    /// Log level, overriding the configuration (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Image,
    Mapped,
    Private,
    Unknown,
}

impl From<Kind> for RegionType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Image => RegionType::Image,
            Kind::Mapped => RegionType::Mapped,
            Kind::Private => RegionType::Private,
            Kind::Unknown => RegionType::Unknown,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// List committed memory regions
    Regions {
        pid: ProcessId,

        /// Only readable regions
        #[arg(long)]
        readable: bool,

        /// Only writable regions
        #[arg(long)]
        writable: bool,

        /// Only executable regions
        #[arg(long)]
        executable: bool,

        /// Only regions of this type
        #[arg(long = "type", value_enum)]
        region_type: Option<Kind>,

        /// Only regions of at least this many bytes
        #[arg(long)]
        min_size: Option<u64>,
    },

    /// Dump bytes at an address (hex with 0x, or decimal)
    Read {
        pid: ProcessId,
        address: Address,
        /// Byte count, clamped to the configured maximum
        size: Option<usize>,
    },

    /// List threads, optionally of one process
    Threads {
        #[arg(short, long)]
        pid: Option<ProcessId>,
    },

    /// Print the first thread owned by a process
    MainThread { pid: ProcessId },

    /// Capture the registers of a thread, or of a process's main thread
    Context {
        #[arg(required_unless_present = "pid", conflicts_with = "pid")]
        tid: Option<ThreadId>,

        #[arg(short, long)]
        pid: Option<ProcessId>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => ConfigLoader::new(path)
            .load()
            .with_context(|| format!("loading {}", path.display()))?,
        None => config::load_config().context("loading configuration")?,
    };
    config::validate_config(&config)?;
    Ok(config)
}

fn init_logging(config: &Config, level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or(&config.logging.level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.logging.with_target)
        .with_writer(std::io::stderr)
        .init();
}

fn emit<T: Serialize>(format: OutputFormat, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => println!("{}", text()),
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MemoryDump {
    pid: ProcessId,
    address: Address,
    size: usize,
    bytes: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MainThread {
    pid: ProcessId,
    thread_id: ThreadId,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;
    if let Some(format) = cli.format {
        config.output.format = match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        };
    }

    init_logging(&config, cli.log_level.as_deref());
    debug!("hedgehog-native v{}", env!("CARGO_PKG_VERSION"));

    let introspector = Introspector::native();
    info!("using {} backend", introspector.backend().name());
    let format = config.output.format;

    match cli.command {
        Command::Regions {
            pid,
            readable,
            writable,
            executable,
            region_type,
            min_size,
        } => {
            let mut criteria = FilterCriteria::new();
            if readable {
                criteria = criteria.readable();
            }
            if writable {
                criteria = criteria.writable();
            }
            if executable {
                criteria = criteria.executable();
            }
            if let Some(kind) = region_type {
                criteria = criteria.with_type(kind.into());
            }
            if let Some(size) = min_size {
                criteria = criteria.with_min_size(size);
            }

            let regions = introspector.get_memory_regions(pid)?;
            let regions = RegionFilter::new(criteria).apply(&regions);
            emit(format, &regions, || render::regions(&regions))?;
        }

        Command::Read { pid, address, size } => {
            let size = config.memory.read_size(size);
            let bytes = introspector.read_memory(pid, address, size)?;
            let dump = MemoryDump {
                pid,
                address,
                size: bytes.len(),
                bytes: hex::encode(&bytes),
            };
            emit(format, &dump, || {
                render::memory(address, &bytes, config.memory.bytes_per_row)
            })?;
        }

        Command::Threads { pid } => {
            let threads = match pid {
                Some(pid) => introspector.list_process_threads(pid)?,
                None => introspector.list_threads()?,
            };
            emit(format, &threads, || render::threads(&threads))?;
        }

        Command::MainThread { pid } => {
            let thread_id = introspector.get_main_thread_id(pid)?;
            emit(format, &MainThread { pid, thread_id }, || thread_id.to_string())?;
        }

        Command::Context { tid, pid } => {
            let snapshot = match (tid, pid) {
                (Some(tid), _) => introspector.get_thread_context(tid)?,
                (None, Some(pid)) => introspector.get_main_thread_context(pid)?,
                (None, None) => anyhow::bail!("either a thread id or --pid is required"),
            };
            emit(format, &snapshot, || render::registers(&snapshot))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_name_for_logging() {
        let introspector = Introspector::native();
        assert!(!introspector.backend().name().is_empty());
    }

    #[test]
    fn test_region_kind_mapping() {
        assert_eq!(RegionType::from(Kind::Image), RegionType::Image);
        assert_eq!(RegionType::from(Kind::Unknown), RegionType::Unknown);
    }

    #[test]
    fn test_context_requires_tid_or_pid() {
        assert!(Cli::try_parse_from(["hedgehog-native", "context"]).is_err());
        assert!(Cli::try_parse_from(["hedgehog-native", "context", "12"]).is_ok());
        assert!(Cli::try_parse_from(["hedgehog-native", "context", "--pid", "12"]).is_ok());
    }
}
