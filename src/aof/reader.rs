//! Command-log reader
//!
//! Loads the log file and decodes its RESP-framed records back into
//! commands for startup replay. Parsing stops at the first malformed or
//! truncated record; everything before it is recovered.

use crate::commands::Command;
use crate::protocol::RespParser;
use bytes::BytesMut;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

pub struct AofReader {
    data: BytesMut,
}

impl AofReader {
    /// Read the whole log file into memory.
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let contents = fs::read(path)?;
        Ok(AofReader {
            data: BytesMut::from(&contents[..]),
        })
    }

    /// Decode every complete record in order.
    pub fn parse_commands(mut self) -> Vec<Command> {
        let mut commands = Vec::new();

        loop {
            match RespParser::parse(&mut self.data) {
                Ok(Some(frame)) => match Command::from_resp(&frame) {
                    Ok(cmd) => commands.push(cmd),
                    Err(e) => {
                        warn!("skipping malformed log record: {}", e);
                    }
                },
                Ok(None) => {
                    if !self.data.is_empty() {
                        warn!(
                            trailing_bytes = self.data.len(),
                            "log ends with a truncated record; ignoring the tail"
                        );
                    }
                    break;
                }
                Err(e) => {
                    warn!("log is corrupt past {} records: {}", commands.len(), e);
                    break;
                }
            }
        }

        info!("recovered {} commands from the log", commands.len());
        commands
    }
}
