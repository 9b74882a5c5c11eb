use std::path::PathBuf;

use thiserror::Error;

use crate::event::{EventType, Tool};

#[derive(Error, Debug)]
pub enum SpliceError {
    #[error("input not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("unsupported software: {0}")]
    UnsupportedSoftware(String),
    #[error("unsupported event type: {0}")]
    UnsupportedEventType(String),
    #[error("unsupported configuration: {tool} does not report {event} events")]
    UnsupportedConfiguration { tool: Tool, event: EventType },
    #[error("missing required column '{column}' in {context}")]
    MissingColumn { column: String, context: String },
    #[error("failed to read {}: {source}", .path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type SpliceResult<T> = Result<T, SpliceError>;
