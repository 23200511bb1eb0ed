//! Types for the relay uploader chain.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The ephemeral public-hosting backends the chain knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// transfer.sh-style host: raw PUT, plain-text URL response.
    TransferSh,
    /// 0x0.st-style null pointer host: multipart POST, plain-text URL.
    NullPointer,
    /// file.io-style host: multipart POST, JSON response with `link`.
    FileIo,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::TransferSh => "transfer_sh",
            BackendKind::NullPointer => "null_pointer",
            BackendKind::FileIo => "file_io",
        };
        f.write_str(name)
    }
}

/// A publicly fetchable URL for one uploaded artifact, tagged with the
/// backend that accepted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicLink {
    pub url: String,
    pub backend: BackendKind,
}

impl fmt::Display for PublicLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.url, self.backend)
    }
}
