// Copyright 2026 Logsieve Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for logsieve
//!
//! This module defines all error types surfaced at the crate boundary.
//! Errors are returned, never logged; the core carries every diagnostic
//! through the returned value.

use thiserror::Error;

/// Result type alias for logsieve operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for stream deserialization and search operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // =========================================================================
    // Protocol errors
    // =========================================================================
    /// The stream ended before a complete field could be read
    #[error("truncated IR stream")]
    Truncated,

    /// A tag or field is self-inconsistent
    #[error("corrupt IR stream: {0}")]
    Corrupt(String),

    /// The stream's version is not supported by this build
    #[error("unsupported IR stream version '{0}'")]
    UnsupportedVersion(String),

    /// The preamble metadata is not in a supported format
    #[error("unsupported IR stream metadata: {0}")]
    UnsupportedMetadata(String),

    /// The unit tag byte does not map to a known IR unit kind
    #[error("unsupported IR unit tag {tag:#04x}")]
    UnsupportedTag { tag: u8 },

    // =========================================================================
    // Schema tree errors
    // =========================================================================
    /// A node with the same locator already exists in the schema tree
    #[error("duplicate schema tree node '{key_name}' under parent {parent_id}")]
    DuplicateSchemaNode { parent_id: u32, key_name: String },

    // =========================================================================
    // Usage errors
    // =========================================================================
    /// The deserializer already consumed an end-of-stream unit
    #[error("stream already finished")]
    AlreadyFinished,

    /// Invalid argument for an operation
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // =========================================================================
    // Forwarded errors
    // =========================================================================
    /// Error code reported by a unit handler, propagated verbatim
    #[error("unit handler error: {code}")]
    Handler { code: i64 },

    /// IO error (wrapped)
    #[error("IO error: {message}")]
    Io { message: String },
}

impl Error {
    /// Create a new Corrupt error
    pub fn corrupt(message: impl Into<String>) -> Self {
        Error::Corrupt(message.into())
    }

    /// Create a new UnsupportedMetadata error
    pub fn unsupported_metadata(message: impl Into<String>) -> Self {
        Error::UnsupportedMetadata(message.into())
    }

    /// Create a new InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Create a new duplicate schema node error
    pub fn duplicate_schema_node(parent_id: u32, key_name: impl Into<String>) -> Self {
        Error::DuplicateSchemaNode {
            parent_id,
            key_name: key_name.into(),
        }
    }

    /// Create a new handler error with an application-defined code
    pub fn handler(code: i64) -> Self {
        Error::Handler { code }
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Error::Io {
            message: message.into(),
        }
    }

    /// Check if this error marks the byte stream itself as unusable
    ///
    /// After a protocol error the reader's position is unspecified and the
    /// deserializer instance must be discarded.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Error::Truncated
                | Error::Corrupt(_)
                | Error::UnsupportedVersion(_)
                | Error::UnsupportedMetadata(_)
                | Error::UnsupportedTag { .. }
                | Error::DuplicateSchemaNode { .. }
        )
    }

    /// Check if this is a version/metadata/tag support error
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedVersion(_)
                | Error::UnsupportedMetadata(_)
                | Error::UnsupportedTag { .. }
        )
    }

    /// Check if this error was reported by a unit handler
    pub fn is_handler_error(&self) -> bool {
        matches!(self, Error::Handler { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::Truncated
        } else {
            Error::Io {
                message: err.to_string(),
            }
        }
    }
}
