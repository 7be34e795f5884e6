//! Coarse error taxonomy shared by every crate.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which class of failure an operation hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Asset could not be read or decoded
    Io,
    /// Video container could not be opened
    VideoDecode,
    /// Non-2xx status, transport failure or malformed body
    RemoteCall,
    /// Remote round trip exceeded the configured timeout
    Timeout,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Io => "io",
            ErrorKind::VideoDecode => "video_decode",
            ErrorKind::RemoteCall => "remote_call",
            ErrorKind::Timeout => "timeout",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
