//! lldpscan command line.
//!
//! ```bash
//! lldpscan -c switches.json -o output/lldp_discovery.json
//! lldpscan -c switches.json check
//! ```

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};

use lldpscan::discovery::{self, ConnectOptions, DEFAULT_CONCURRENCY, Inventory};
use lldpscan::transport::HostKeyVerification;

/// LLDP neighbor discovery for Aruba switches over SSH
#[derive(Parser)]
#[command(name = "lldpscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Switch inventory file
    #[arg(short, long, default_value = "switches.json", global = true)]
    config: PathBuf,

    /// Where to write the discovery report
    #[arg(short, long, default_value = "output/lldp_discovery.json", global = true)]
    output: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Switches queried at the same time
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, global = true)]
    concurrency: usize,

    /// Connect and per-command timeout in seconds
    #[arg(long, default_value_t = 60, global = true)]
    timeout: u64,

    /// Also append log output to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// How to treat switch host keys
    #[arg(long, value_enum, default_value_t = HostKeys::AcceptNew, global = true)]
    host_keys: HostKeys,

    /// known_hosts file (default: ~/.ssh/known_hosts)
    #[arg(long, global = true)]
    known_hosts: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Collect LLDP neighbors and write the report (default)
    Discover,
    /// Test SSH access and LLDP status on every switch
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum HostKeys {
    Strict,
    AcceptNew,
    Off,
}

impl From<HostKeys> for HostKeyVerification {
    fn from(mode: HostKeys) -> Self {
        match mode {
            HostKeys::Strict => HostKeyVerification::Strict,
            HostKeys::AcceptNew => HostKeyVerification::AcceptNew,
            HostKeys::Off => HostKeyVerification::Disabled,
        }
    }
}

/// Copies log records to stderr and a file.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

fn init_logging(cli: &Cli) -> io::Result<()> {
    let default_filter = if cli.verbose { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    // russh is chatty at debug.
    builder.filter_module("russh", log::LevelFilter::Info);

    if let Some(path) = &cli.log_file {
        let file = File::options().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(Tee { file })));
    }

    builder.init();
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("cannot open log file: {}", e);
        return ExitCode::FAILURE;
    }

    let inventory = match Inventory::load(&cli.config) {
        Ok(inventory) => inventory,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = ConnectOptions {
        timeout: Duration::from_secs(cli.timeout),
        host_key_verification: cli.host_keys.into(),
        known_hosts_path: cli.known_hosts.clone(),
    };
    let connect = |switch: &discovery::SwitchConfig, platform| switch.driver(platform, &options);

    match cli.command.unwrap_or(Command::Discover) {
        Command::Discover => {
            info!("starting LLDP discovery");
            let report = discovery::discover(&inventory, cli.concurrency, connect).await;

            if let Err(e) = report.write_json(&cli.output) {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
            info!("results saved to {}", cli.output.display());

            let summary = &report.summary;
            info!("discovery finished:");
            info!(
                "  - switches processed: {}/{}",
                summary.successful_connections, summary.total_switches
            );
            info!("  - total neighbors discovered: {}", summary.total_neighbors);
            ExitCode::SUCCESS
        }
        Command::Check => {
            let results = discovery::check(&inventory, cli.concurrency, connect).await;

            let mut reachable = 0;
            for (host, result) in &results {
                match result {
                    Ok(check) => {
                        reachable += 1;
                        println!(
                            "{}: ok, LLDP {}, {} neighbor(s), {} ARP entr(ies)",
                            host,
                            if check.lldp_enabled { "enabled" } else { "possibly disabled" },
                            check.neighbors,
                            check.arp_entries
                        );
                    }
                    Err(e) => println!("{}: FAILED: {}", host, e),
                }
            }
            for rejected in &inventory.rejected {
                println!("skipped: {}", rejected);
            }

            println!("{}/{} switches reachable", reachable, inventory.total());
            if reachable == inventory.total() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
