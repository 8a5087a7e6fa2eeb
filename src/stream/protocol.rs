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

//! Wire protocol constants and tag encodings
//!
//! Every multi-byte integer field is little-endian. Variable-width
//! fields carry a length prefix whose width (u8/u16/u32) is selected by
//! two bits of the owning tag byte.
//!
//! Tag byte layout:
//!
//! ```text
//! 0x00              end of stream
//! 0x01              UTC offset change
//! 0x40 | bits       schema tree node insertion
//!                     bit  5    auto-gen namespace
//!                     bits 2-4  node type
//!                     bits 0-1  key-name length width
//! 0x80 | bits       log event
//!                     bits 0-1  node-id / pair-count width
//! ```

use std::fmt;
use std::str::FromStr;

use crate::core::{Error, Namespace, NodeType, Result};

// =========================================================================
// Preamble
// =========================================================================

/// Encoding-variant tag: encoded text variables are 4 bytes wide
pub const FOUR_BYTE_ENCODING_TAG: u8 = 0x10;

/// Encoding-variant tag: encoded text variables are 8 bytes wide
pub const EIGHT_BYTE_ENCODING_TAG: u8 = 0x11;

/// Metadata type tag: the metadata blob is a JSON object
pub const METADATA_JSON_TAG: u8 = 0x01;

/// Metadata key holding the stream format version
pub const METADATA_VERSION_KEY: &str = "version";

/// Metadata key holding the optional user-defined metadata object
pub const METADATA_USER_DEFINED_KEY: &str = "user_defined_metadata";

/// Width of encoded text variables, fixed per stream by the preamble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingType {
    FourByte,
    EightByte,
}

// =========================================================================
// IR unit tags
// =========================================================================

/// Tag byte of the end-of-stream unit
pub const TAG_END_OF_STREAM: u8 = 0x00;

/// Tag byte of the UTC offset change unit
pub const TAG_UTC_OFFSET_CHANGE: u8 = 0x01;

const SCHEMA_NODE_TAG_BASE: u8 = 0x40;
const SCHEMA_NODE_AUTO_GEN_BIT: u8 = 0x20;
const SCHEMA_NODE_TYPE_SHIFT: u8 = 2;
const SCHEMA_NODE_TYPE_MASK: u8 = 0x07;
const LOG_EVENT_TAG_BASE: u8 = 0x80;
const LENGTH_WIDTH_MASK: u8 = 0x03;

/// The kinds of IR unit a stream may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    LogEvent,
    SchemaTreeNodeInsertion,
    UtcOffsetChange,
    EndOfStream,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::LogEvent => write!(f, "log-event"),
            UnitKind::SchemaTreeNodeInsertion => write!(f, "schema-tree-node-insertion"),
            UnitKind::UtcOffsetChange => write!(f, "utc-offset-change"),
            UnitKind::EndOfStream => write!(f, "end-of-stream"),
        }
    }
}

/// Map a tag byte to its unit kind
pub fn unit_kind_from_tag(tag: u8) -> Option<UnitKind> {
    match tag {
        TAG_END_OF_STREAM => Some(UnitKind::EndOfStream),
        TAG_UTC_OFFSET_CHANGE => Some(UnitKind::UtcOffsetChange),
        0x40..=0x7F => Some(UnitKind::SchemaTreeNodeInsertion),
        0x80..=0x83 => Some(UnitKind::LogEvent),
        _ => None,
    }
}

/// Width of a length prefix or node-id field, selected by tag bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthWidth {
    U8,
    U16,
    U32,
}

impl LengthWidth {
    fn from_bits(bits: u8) -> Result<Self> {
        match bits {
            0 => Ok(LengthWidth::U8),
            1 => Ok(LengthWidth::U16),
            2 => Ok(LengthWidth::U32),
            _ => Err(Error::corrupt(format!("invalid length-width bits {}", bits))),
        }
    }

    fn bits(&self) -> u8 {
        match self {
            LengthWidth::U8 => 0,
            LengthWidth::U16 => 1,
            LengthWidth::U32 => 2,
        }
    }

    /// Smallest width that can carry the given value
    pub fn for_value(value: usize) -> Self {
        if value <= u8::MAX as usize {
            LengthWidth::U8
        } else if value <= u16::MAX as usize {
            LengthWidth::U16
        } else {
            LengthWidth::U32
        }
    }
}

/// Decoded form of a schema-tree-node-insertion tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaNodeTag {
    pub namespace: Namespace,
    pub node_type: NodeType,
    pub key_length_width: LengthWidth,
}

impl SchemaNodeTag {
    /// Decode the tag's bit fields
    pub fn decode(tag: u8) -> Result<Self> {
        debug_assert_eq!(tag & 0xC0, SCHEMA_NODE_TAG_BASE);
        let namespace = Namespace::from_auto_gen_flag(tag & SCHEMA_NODE_AUTO_GEN_BIT != 0);
        let type_bits = (tag >> SCHEMA_NODE_TYPE_SHIFT) & SCHEMA_NODE_TYPE_MASK;
        let node_type = NodeType::from_u8(type_bits)
            .ok_or_else(|| Error::corrupt(format!("invalid schema node type bits {}", type_bits)))?;
        let key_length_width = LengthWidth::from_bits(tag & LENGTH_WIDTH_MASK)?;
        Ok(Self {
            namespace,
            node_type,
            key_length_width,
        })
    }

    /// Encode the tag byte
    pub fn encode(&self) -> u8 {
        let auto_gen = if self.namespace.is_auto_gen() {
            SCHEMA_NODE_AUTO_GEN_BIT
        } else {
            0
        };
        SCHEMA_NODE_TAG_BASE
            | auto_gen
            | (self.node_type.as_u8() << SCHEMA_NODE_TYPE_SHIFT)
            | self.key_length_width.bits()
    }
}

/// Decoded form of a log-event tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEventTag {
    /// Width of the pair counts and the node-id fields
    pub field_width: LengthWidth,
}

impl LogEventTag {
    /// Decode the tag's bit fields
    pub fn decode(tag: u8) -> Result<Self> {
        debug_assert_eq!(tag & 0xC0, LOG_EVENT_TAG_BASE);
        Ok(Self {
            field_width: LengthWidth::from_bits(tag & LENGTH_WIDTH_MASK)?,
        })
    }

    /// Encode the tag byte
    pub fn encode(&self) -> u8 {
        LOG_EVENT_TAG_BASE | self.field_width.bits()
    }
}

// =========================================================================
// Value tags (inside log-event bodies)
// =========================================================================

pub const VALUE_TAG_NULL: u8 = 0x00;
pub const VALUE_TAG_TRUE: u8 = 0x01;
pub const VALUE_TAG_FALSE: u8 = 0x02;
pub const VALUE_TAG_INT8: u8 = 0x03;
pub const VALUE_TAG_INT32: u8 = 0x04;
pub const VALUE_TAG_INT64: u8 = 0x05;
pub const VALUE_TAG_FLOAT64: u8 = 0x08;
pub const VALUE_TAG_STR_LEN_U8: u8 = 0x10;
pub const VALUE_TAG_STR_LEN_U16: u8 = 0x11;
pub const VALUE_TAG_STR_LEN_U32: u8 = 0x12;
pub const VALUE_TAG_ARRAY_LEN_U8: u8 = 0x20;
pub const VALUE_TAG_ARRAY_LEN_U16: u8 = 0x21;
pub const VALUE_TAG_ARRAY_LEN_U32: u8 = 0x22;
pub const VALUE_TAG_ENCODED_TEXT: u8 = 0x30;

// =========================================================================
// Version gate
// =========================================================================

/// Current stream format version written by serializers from this line
pub const CURRENT_VERSION: StreamVersion = StreamVersion::new(0, 1, 0);

/// Semantic version carried in the preamble metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl StreamVersion {
    /// Create a version from components
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The supported-version predicate
    ///
    /// A stream is readable when it shares the current major version and
    /// was written at the current minor version or earlier.
    pub fn is_supported(&self) -> bool {
        self.major == CURRENT_VERSION.major && self.minor <= CURRENT_VERSION.minor
    }
}

impl fmt::Display for StreamVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for StreamVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(Error::UnsupportedVersion(s.to_string()));
        }
        let parse = |part: &str| {
            part.parse::<u32>()
                .map_err(|_| Error::UnsupportedVersion(s.to_string()))
        };
        Ok(StreamVersion::new(
            parse(parts[0])?,
            parse(parts[1])?,
            parse(parts[2])?,
        ))
    }
}
