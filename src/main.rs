//! PMU simulator command-line entry point
//!
//! Run with: pmu-sim [OPTIONS]
//!
//! Then type commands on stdin:
//!   addPMU A 127.0.0.1 4712
//!   stop

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::BufReader;

use pmu_sim::{console, PmuSimulator, SimulatorConfig};

fn print_usage() {
    eprintln!("Usage: pmu-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --bind ADDR         Local UDP address to send from (default: 0.0.0.0:0)");
    eprintln!("  --interval-ms N     Milliseconds between frames per device (default: 1000)");
    eprintln!("  --capacity N        Maximum number of devices (default: 100)");
    eprintln!("  -h, --help          Show this help");
    eprintln!();
    eprintln!("Commands (stdin):");
    eprintln!("  addPMU <name> <ip> <port>   Start streaming a new device");
    eprintln!("  stop                        Stop all devices and exit");
}

/// Parse command line options into a config
fn parse_args(args: &[String]) -> Result<SimulatorConfig, String> {
    let mut config = SimulatorConfig::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .ok_or_else(|| format!("Missing value for {}", name))
        };

        match arg.as_str() {
            "--bind" => {
                let raw = value("--bind")?;
                let addr = raw
                    .parse::<SocketAddr>()
                    .map_err(|_| format!("Invalid bind address: '{}'", raw))?;
                config = config.bind(addr);
            }
            "--interval-ms" => {
                let raw = value("--interval-ms")?;
                let ms = raw
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid interval: '{}'", raw))?;
                config = config.tick_interval(Duration::from_millis(ms));
            }
            "--capacity" => {
                let raw = value("--capacity")?;
                let capacity = raw
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid capacity: '{}'", raw))?;
                config = config.capacity(capacity);
            }
            other => return Err(format!("Unknown option: '{}'", other)),
        }
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    // Logs go to stderr so they don't interleave with console replies
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pmu_sim=info".parse()?),
        )
        .init();

    let simulator = PmuSimulator::bind(config).await?;
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    tokio::select! {
        result = console::run(&simulator, stdin, &mut stdout) => result?,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nShutting down...");
            let mut stdout = tokio::io::stdout();
            console::interrupt(&simulator, &mut stdout).await?;

            // The pending stdin read blocks runtime shutdown until a line arrives
            std::process::exit(0);
        }
    }

    Ok(())
}
