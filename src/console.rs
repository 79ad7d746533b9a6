//! Interactive command console
//!
//! Reads commands line by line, applies them to a [`PmuSimulator`] and writes
//! human-readable replies. Input ends on `stop` or end of stream; either way
//! the simulator is shut down before [`run`] returns.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::command::Command;
use crate::error::{CommandError, Result};
use crate::server::PmuSimulator;
use crate::transport::Transport;

const BANNER: &str = "PMU Simulator started. Type 'stop' to exit.";
const PROMPT: &str = "> ";
const USAGE: &str = "Usage: addPMU <name> <ip> <port>";
const STOPPED: &str = "PMU Simulator stopped.";

/// Run the console until `stop` or end of input
pub async fn run<T, R, W>(simulator: &PmuSimulator<T>, reader: R, writer: &mut W) -> Result<()>
where
    T: Transport,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    say(writer, BANNER).await?;

    loop {
        writer.write_all(PROMPT.as_bytes()).await?;
        writer.flush().await?;

        let Some(line) = lines.next_line().await? else {
            tracing::debug!("Console input closed");
            break;
        };

        match Command::parse(&line) {
            Ok(None) => {}
            Ok(Some(Command::Stop)) => break,
            Ok(Some(Command::AddPmu { name, destination })) => {
                match simulator.add_device(&name, destination).await {
                    Ok(_) => {
                        say(
                            writer,
                            &format!("PMU {} added and started, sending to {}.", name, destination),
                        )
                        .await?
                    }
                    Err(e) => say(writer, &e.to_string()).await?,
                }
            }
            Err(e @ CommandError::Unknown(_)) => {
                tracing::debug!(input = %line, "Unknown command");
                say(writer, &e.to_string()).await?;
            }
            Err(e) => {
                tracing::debug!(input = %line, error = %e, "Malformed command");
                say(writer, &format!("{}. {}", e, USAGE)).await?;
            }
        }
    }

    stop(simulator, writer).await
}

/// Shut the simulator down without waiting for console input
///
/// For an interrupt that arrives while [`run`] is blocked reading a line.
pub async fn interrupt<T, W>(simulator: &PmuSimulator<T>, writer: &mut W) -> Result<()>
where
    T: Transport,
    W: AsyncWrite + Unpin,
{
    tracing::debug!("Console interrupted");
    stop(simulator, writer).await
}

async fn stop<T: Transport, W: AsyncWrite + Unpin>(
    simulator: &PmuSimulator<T>,
    writer: &mut W,
) -> Result<()> {
    simulator.shutdown().await;
    say(writer, STOPPED).await?;
    Ok(())
}

async fn say<W: AsyncWrite + Unpin>(writer: &mut W, message: &str) -> std::io::Result<()> {
    writer.write_all(message.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::server::SimulatorConfig;
    use crate::transport::ChannelTransport;

    async fn run_script(script: &str, capacity: usize) -> (String, PmuSimulator<ChannelTransport>) {
        let (transport, _rx) = ChannelTransport::new();
        let config = SimulatorConfig::default()
            .tick_interval(Duration::from_secs(1))
            .capacity(capacity);
        let sim = PmuSimulator::new(config, transport);

        let mut out = Vec::new();
        run(&sim, script.as_bytes(), &mut out).await.unwrap();

        (String::from_utf8(out).unwrap(), sim)
    }

    #[tokio::test]
    async fn test_add_and_stop() {
        let (out, sim) = run_script("addPMU A 127.0.0.1 4712\nstop\n", 10).await;

        assert!(out.starts_with(BANNER));
        assert!(out.contains("PMU A added and started, sending to 127.0.0.1:4712."));
        assert!(out.ends_with("PMU Simulator stopped.\n"));
        assert_eq!(sim.registry().device_count().await, 1);
        assert_eq!(sim.registry().active_count().await, 0);
        assert_eq!(sim.running_tasks().await, 0);
    }

    #[tokio::test]
    async fn test_malformed_command_registers_nothing() {
        let (out, sim) = run_script("addPMU A 127.0.0.1\nstop\n", 10).await;

        assert!(out.contains("Missing argument: <port>. Usage: addPMU <name> <ip> <port>"));
        assert!(!out.contains("added and started"));
        assert_eq!(sim.registry().device_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let (out, sim) = run_script("hello world\nstop\n", 10).await;

        assert!(out.contains("Unknown command: hello world\n"));
        assert_eq!(sim.registry().device_count().await, 0);
    }

    #[tokio::test]
    async fn test_capacity_notice() {
        let script = "addPMU A 127.0.0.1 1\naddPMU B 127.0.0.1 2\nstop\n";
        let (out, sim) = run_script(script, 1).await;

        assert!(out.contains("Max PMU limit reached (1 devices)"));
        assert_eq!(sim.registry().device_count().await, 1);
    }

    #[tokio::test]
    async fn test_end_of_input_shuts_down() {
        let (out, sim) = run_script("addPMU A 127.0.0.1 4712\n\n", 10).await;

        assert!(out.ends_with("PMU Simulator stopped.\n"));
        assert!(sim.registry().is_closed().await);
        assert_eq!(sim.running_tasks().await, 0);
    }

    #[tokio::test]
    async fn test_lines_after_stop_are_ignored() {
        let (out, sim) = run_script("stop\naddPMU A 127.0.0.1 4712\n", 10).await;

        assert!(!out.contains("added and started"));
        assert_eq!(sim.registry().device_count().await, 0);
    }

    #[tokio::test]
    async fn test_interrupt_while_waiting_for_input() {
        let (transport, mut rx) = ChannelTransport::new();
        let config = SimulatorConfig::default().tick_interval(Duration::from_secs(3600));
        let sim = PmuSimulator::new(config, transport);
        sim.add_device("A", "127.0.0.1:4712".parse().unwrap()).await.unwrap();
        rx.recv().await.unwrap();

        // Input that never yields a line, like an idle terminal
        let (_keep_open, idle) = tokio::io::duplex(64);
        let mut console_out = Vec::new();
        let waiting = tokio::time::timeout(
            Duration::from_millis(50),
            run(&sim, tokio::io::BufReader::new(idle), &mut console_out),
        )
        .await;
        assert!(waiting.is_err());

        let mut out = Vec::new();
        interrupt(&sim, &mut out).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "PMU Simulator stopped.\n");
        assert!(sim.registry().is_closed().await);
        assert_eq!(sim.registry().active_count().await, 0);
        assert_eq!(sim.running_tasks().await, 0);
    }
}
