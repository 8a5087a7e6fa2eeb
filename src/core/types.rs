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

//! Core type definitions for logsieve
//!
//! This module defines the fundamental types: NodeType, LiteralType,
//! LiteralTypeSet, FilterOp, and Namespace.

use std::fmt;
use std::ops::{BitAnd, BitOr};

/// Signed UTC offset in nanoseconds, carried by the stream
pub type UtcOffset = i64;

/// Key namespace of a schema tree and the descriptors that query it
///
/// Every stream carries two independent schema trees: one for keys the
/// producer emits on its own (timestamps, sequence numbers) and one for
/// keys originating from user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// System-emitted keys
    AutoGen,
    /// User-supplied keys
    UserGen,
}

impl Namespace {
    /// Returns true for the auto-generated key namespace
    pub fn is_auto_gen(&self) -> bool {
        matches!(self, Namespace::AutoGen)
    }

    /// Create a Namespace from the wire-level auto-gen flag
    pub fn from_auto_gen_flag(is_auto_gen: bool) -> Self {
        if is_auto_gen {
            Namespace::AutoGen
        } else {
            Namespace::UserGen
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::AutoGen => write!(f, "auto_gen"),
            Namespace::UserGen => write!(f, "user_gen"),
        }
    }
}

/// Schema tree node types carried by node-insertion IR units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeType {
    /// Interior object node (may also carry a null value in an event)
    Obj = 0,

    /// 64-bit signed integer leaf
    Int = 1,

    /// 64-bit floating point leaf
    Float = 2,

    /// Boolean leaf
    Bool = 3,

    /// String leaf (short string or encoded-text value)
    Str = 4,

    /// Opaque JSON array text leaf
    UnstructuredArray = 5,
}

impl NodeType {
    /// Returns the type ID as u8 for the wire format
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Create a NodeType from a wire byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(NodeType::Obj),
            1 => Some(NodeType::Int),
            2 => Some(NodeType::Float),
            3 => Some(NodeType::Bool),
            4 => Some(NodeType::Str),
            5 => Some(NodeType::UnstructuredArray),
            _ => None,
        }
    }

    /// The literal types a value under a node of this type may take
    ///
    /// Used during resolution, before any value is available. Obj nodes
    /// only ever match as null.
    pub fn candidate_literal_types(&self) -> LiteralTypeSet {
        match self {
            NodeType::Int | NodeType::Float => LiteralType::Integer | LiteralType::Float,
            NodeType::Bool => LiteralType::Boolean.into(),
            NodeType::Str => LiteralType::ClpString | LiteralType::VarString,
            NodeType::UnstructuredArray => LiteralType::Array.into(),
            NodeType::Obj => LiteralType::Null.into(),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Obj => write!(f, "obj"),
            NodeType::Int => write!(f, "int"),
            NodeType::Float => write!(f, "float"),
            NodeType::Bool => write!(f, "bool"),
            NodeType::Str => write!(f, "str"),
            NodeType::UnstructuredArray => write!(f, "array"),
        }
    }
}

/// Literal types used for query matching
///
/// Discriminants are single bits so sets of literal types can be carried
/// in a [`LiteralTypeSet`] bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum LiteralType {
    Integer = 1,
    Float = 1 << 1,
    Boolean = 1 << 2,
    Array = 1 << 3,
    VarString = 1 << 4,
    ClpString = 1 << 5,
    Null = 1 << 6,
    Unknown = 1 << 7,
}

impl LiteralType {
    /// Returns the bit value of this literal type
    pub fn bit(&self) -> u16 {
        *self as u16
    }
}

impl fmt::Display for LiteralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralType::Integer => write!(f, "integer"),
            LiteralType::Float => write!(f, "float"),
            LiteralType::Boolean => write!(f, "boolean"),
            LiteralType::Array => write!(f, "array"),
            LiteralType::VarString => write!(f, "var-string"),
            LiteralType::ClpString => write!(f, "clp-string"),
            LiteralType::Null => write!(f, "null"),
            LiteralType::Unknown => write!(f, "unknown"),
        }
    }
}

/// A set of literal types, stored as a bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LiteralTypeSet(u16);

impl LiteralTypeSet {
    /// The empty set
    pub const EMPTY: LiteralTypeSet = LiteralTypeSet(0);

    /// Every literal type a column descriptor accepts by default
    ///
    /// Unknown is excluded: no descriptor admits values the type mapping
    /// cannot classify.
    pub const ALL: LiteralTypeSet = LiteralTypeSet(
        LiteralType::Integer as u16
            | LiteralType::Float as u16
            | LiteralType::Boolean as u16
            | LiteralType::Array as u16
            | LiteralType::VarString as u16
            | LiteralType::ClpString as u16
            | LiteralType::Null as u16,
    );

    /// Create a set from a raw bitmask
    pub fn from_bits(bits: u16) -> Self {
        LiteralTypeSet(bits)
    }

    /// Returns the raw bitmask
    pub fn bits(&self) -> u16 {
        self.0
    }

    /// Returns true if the set contains no types
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if the set contains the given type
    pub fn contains(&self, literal_type: LiteralType) -> bool {
        self.0 & literal_type.bit() != 0
    }

    /// Returns true if the two sets share at least one type
    pub fn intersects(&self, other: LiteralTypeSet) -> bool {
        self.0 & other.0 != 0
    }

    /// Set intersection
    pub fn intersection(&self, other: LiteralTypeSet) -> LiteralTypeSet {
        LiteralTypeSet(self.0 & other.0)
    }
}

impl From<LiteralType> for LiteralTypeSet {
    fn from(literal_type: LiteralType) -> Self {
        LiteralTypeSet(literal_type.bit())
    }
}

impl BitOr for LiteralType {
    type Output = LiteralTypeSet;

    fn bitor(self, rhs: LiteralType) -> LiteralTypeSet {
        LiteralTypeSet(self.bit() | rhs.bit())
    }
}

impl BitOr<LiteralType> for LiteralTypeSet {
    type Output = LiteralTypeSet;

    fn bitor(self, rhs: LiteralType) -> LiteralTypeSet {
        LiteralTypeSet(self.0 | rhs.bit())
    }
}

impl BitOr for LiteralTypeSet {
    type Output = LiteralTypeSet;

    fn bitor(self, rhs: LiteralTypeSet) -> LiteralTypeSet {
        LiteralTypeSet(self.0 | rhs.0)
    }
}

impl BitAnd for LiteralTypeSet {
    type Output = LiteralTypeSet;

    fn bitand(self, rhs: LiteralTypeSet) -> LiteralTypeSet {
        self.intersection(rhs)
    }
}

/// Comparison operations carried by filter expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FilterOp {
    /// Equality (for strings: wildcard match)
    Eq = 0,

    /// Inequality (for strings: wildcard mismatch)
    Neq = 1,

    /// Less than
    Lt = 2,

    /// Greater than
    Gt = 3,

    /// Less than or equal
    Lte = 4,

    /// Greater than or equal
    Gte = 5,

    /// Column is present in the event
    Exists = 6,

    /// Column is absent from the event
    NotExists = 7,
}

impl FilterOp {
    /// Returns the operation that accepts exactly the values this one rejects
    pub fn negate(&self) -> FilterOp {
        match self {
            FilterOp::Eq => FilterOp::Neq,
            FilterOp::Neq => FilterOp::Eq,
            FilterOp::Lt => FilterOp::Gte,
            FilterOp::Gt => FilterOp::Lte,
            FilterOp::Lte => FilterOp::Gt,
            FilterOp::Gte => FilterOp::Lt,
            FilterOp::Exists => FilterOp::NotExists,
            FilterOp::NotExists => FilterOp::Exists,
        }
    }

    /// Returns true for operations that order their operands
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            FilterOp::Lt | FilterOp::Gt | FilterOp::Lte | FilterOp::Gte
        )
    }

    /// Returns true if this operation compares against a literal operand
    pub fn needs_operand(&self) -> bool {
        !matches!(self, FilterOp::Exists | FilterOp::NotExists)
    }

    /// The literal types this operation can decide
    ///
    /// Ordering only makes sense for numbers; presence checks decide for
    /// every type.
    pub fn admitted_literal_types(&self) -> LiteralTypeSet {
        if self.is_ordering() {
            LiteralType::Integer | LiteralType::Float
        } else {
            LiteralTypeSet::ALL
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOp::Eq => write!(f, "=="),
            FilterOp::Neq => write!(f, "!="),
            FilterOp::Lt => write!(f, "<"),
            FilterOp::Gt => write!(f, ">"),
            FilterOp::Lte => write!(f, "<="),
            FilterOp::Gte => write!(f, ">="),
            FilterOp::Exists => write!(f, "EXISTS"),
            FilterOp::NotExists => write!(f, "NEXISTS"),
        }
    }
}
