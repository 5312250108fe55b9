//! JSON-lines event log.
//!
//! Records are handed to a dedicated writer task over an unbounded channel,
//! so logging never waits on the file system. Each line looks like
//! `{"ts":1700000000000,"level":"info","event":"lock",...}`.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Error,
}

pub struct EventLog {
    tx: Option<mpsc::UnboundedSender<Value>>,
    writer: Option<JoinHandle<()>>,
}

impl EventLog {
    /// Drop every record
    pub fn disabled() -> Self {
        Self {
            tx: None,
            writer: None,
        }
    }

    /// Append records to `path`. Must be called inside a tokio runtime.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, mut rx) = mpsc::unbounded_channel::<Value>();

        let writer = tokio::spawn(async move {
            use tokio::fs::OpenOptions;
            use tokio::io::AsyncWriteExt;

            let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("[Session] Cannot open event log {}: {}", path.display(), e);
                    return;
                }
            };

            let mut buf: Vec<u8> = Vec::with_capacity(4096);
            while let Some(record) = rx.recv().await {
                buf.clear();
                if serde_json::to_writer(&mut buf, &record).is_err() {
                    continue;
                }
                buf.push(b'\n');
                if file.write_all(&buf).await.is_err() {
                    break;
                }
            }

            let _ = file.flush().await;
        });

        Self {
            tx: Some(tx),
            writer: Some(writer),
        }
    }

    /// Log into a channel instead of a file
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Value>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx: Some(tx),
                writer: None,
            },
            rx,
        )
    }

    /// Queue a record. `fields` is merged into the record when it is an object.
    pub fn record(&self, level: Level, event: &str, fields: Value) {
        if level != Level::Info {
            eprintln!("[Session] {:?} {}: {}", level, event, fields);
        }
        let Some(tx) = &self.tx else {
            return;
        };

        let mut record = Map::new();
        record.insert("ts".into(), Value::from(chrono::Utc::now().timestamp_millis()));
        record.insert("level".into(), serde_json::to_value(level).unwrap_or(Value::Null));
        record.insert("event".into(), Value::from(event));
        if let Value::Object(extra) = fields {
            record.extend(extra);
        }
        let _ = tx.send(Value::Object(record));
    }

    pub fn info(&self, event: &str, fields: Value) {
        self.record(Level::Info, event, fields);
    }

    pub fn warn(&self, event: &str, fields: Value) {
        self.record(Level::Warn, event, fields);
    }

    pub fn error(&self, event: &str, fields: Value) {
        self.record(Level::Error, event, fields);
    }

    /// Stop accepting records and wait until the writer has flushed
    pub async fn close(mut self) {
        self.tx.take();
        if let Some(writer) = self.writer.take() {
            let _ = writer.await;
        }
    }
}
