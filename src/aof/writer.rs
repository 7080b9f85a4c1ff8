//! Command-log writer
//!
//! Appends one RESP-framed record per write command. The file handle lives
//! behind its own mutex; log writes never touch the keyspace lock.

use super::SyncPolicy;
use crate::commands::Command;
use crate::protocol::RespEncoder;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub struct AofWriter {
    file: Mutex<File>,
    sync_policy: SyncPolicy,
    last_sync: Mutex<Instant>,
}

impl AofWriter {
    /// Open (or create) the log file in append mode.
    pub fn new<P: AsRef<Path>>(path: P, sync_policy: SyncPolicy) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(AofWriter {
            file: Mutex::new(file),
            sync_policy,
            last_sync: Mutex::new(Instant::now()),
        })
    }

    /// Append one command record and apply the sync policy.
    pub fn append(&self, cmd: &Command) -> io::Result<()> {
        let record = RespEncoder::encode(&cmd.to_resp());

        let mut file = self.file.lock().unwrap();
        file.write_all(&record)?;

        match self.sync_policy {
            SyncPolicy::Always => {
                file.sync_all()?;
            }
            SyncPolicy::EverySecond => {
                let mut last_sync = self.last_sync.lock().unwrap();
                if last_sync.elapsed() >= Duration::from_secs(1) {
                    file.sync_all()?;
                    *last_sync = Instant::now();
                }
            }
            SyncPolicy::No => {}
        }

        Ok(())
    }

    /// Force a sync to disk.
    pub fn sync(&self) -> io::Result<()> {
        let file = self.file.lock().unwrap();
        file.sync_all()?;
        *self.last_sync.lock().unwrap() = Instant::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::fs;

    #[test]
    fn test_append_writes_resp_records() {
        let path = "test_aof_writer.aof";
        let _ = fs::remove_file(path);

        let writer = AofWriter::new(path, SyncPolicy::Always).unwrap();
        let cmd = Command::new("SET", vec![Bytes::from("key"), Bytes::from("value")]);
        writer.append(&cmd).unwrap();
        writer.sync().unwrap();

        let contents = fs::read(path).unwrap();
        assert_eq!(
            contents,
            b"*3\r\n$3\r\nSET\r\n$3\r\nkey\r\n$5\r\nvalue\r\n"
        );

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_append_accumulates() {
        let path = "test_aof_writer_accumulate.aof";
        let _ = fs::remove_file(path);

        let writer = AofWriter::new(path, SyncPolicy::Always).unwrap();
        writer
            .append(&Command::new("SET", vec![Bytes::from("a"), Bytes::from("1")]))
            .unwrap();
        writer
            .append(&Command::new("DEL", vec![Bytes::from("a")]))
            .unwrap();

        let contents = fs::read(path).unwrap();
        assert_eq!(
            contents,
            b"*3\r\n$3\r\nSET\r\n$1\r\na\r\n$1\r\n1\r\n*2\r\n$3\r\nDEL\r\n$1\r\na\r\n"
        );

        fs::remove_file(path).unwrap();
    }
}
