//! Console command parsing
//!
//! Commands are single lines of whitespace-separated words:
//!
//! ```text
//! addPMU <name> <ip> <port>
//! stop
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::CommandError;

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register a device streaming to `destination`
    AddPmu {
        name: String,
        destination: SocketAddr,
    },
    /// Stop all devices and exit
    Stop,
}

impl Command {
    /// Parse one input line
    ///
    /// Returns `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut words = line.split_whitespace();

        let Some(command) = words.next() else {
            return Ok(None);
        };

        let parsed = match command {
            "addPMU" => {
                let name = words.next().ok_or(CommandError::MissingArgument("name"))?;
                let ip = words.next().ok_or(CommandError::MissingArgument("ip"))?;
                let port = words.next().ok_or(CommandError::MissingArgument("port"))?;

                Command::AddPmu {
                    name: name.to_string(),
                    destination: SocketAddr::new(parse_ip(ip)?, parse_port(port)?),
                }
            }
            "stop" => Command::Stop,
            _ => return Err(CommandError::Unknown(line.trim().to_string())),
        };

        if let Some(extra) = words.next() {
            return Err(CommandError::UnexpectedArgument(extra.to_string()));
        }

        Ok(Some(parsed))
    }
}

fn parse_ip(s: &str) -> Result<IpAddr, CommandError> {
    if s.eq_ignore_ascii_case("localhost") {
        return Ok(IpAddr::V4(Ipv4Addr::LOCALHOST));
    }
    s.parse()
        .map_err(|_| CommandError::InvalidAddress(s.to_string()))
}

fn parse_port(s: &str) -> Result<u16, CommandError> {
    match s.parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(CommandError::InvalidPort(s.to_string())),
    }
}
