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

//! Value type for logsieve - scalar values carried by log events
//!
//! A Value is associated with a schema tree node id for the duration of
//! one log event. String values come in two shapes: plain short strings
//! and encoded-text values carrying a logtype template plus extracted
//! variables.

use std::fmt;
use std::sync::Arc;

use super::types::{LiteralType, NodeType};

/// A scalar value attached to a schema tree node in one log event
///
/// Note: string payloads use Arc<str> so values stay cheap to clone when
/// events are buffered by handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit signed integer
    Int(i64),

    /// 64-bit floating point
    Float(f64),

    /// Boolean value
    Bool(bool),

    /// Null value (only meaningful under Obj-typed nodes)
    Null,

    /// Plain UTF-8 string
    ShortString(Arc<str>),

    /// Encoded text: logtype template plus extracted variables
    ClpString(EncodedTextAst),

    /// Opaque JSON array text
    UnstructuredArray(Arc<str>),
}

impl Value {
    /// Create a short string value
    pub fn short_string(value: impl Into<String>) -> Self {
        Value::ShortString(Arc::from(value.into().as_str()))
    }

    /// Create an unstructured array value from its JSON text
    pub fn unstructured_array(value: impl Into<String>) -> Self {
        Value::UnstructuredArray(Arc::from(value.into().as_str()))
    }

    /// Returns true if this is the null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer payload, if this value is an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Float payload, if this value is a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Boolean payload, if this value is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Short string payload, if this value is a plain string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::ShortString(s) => Some(s),
            _ => None,
        }
    }

    /// Encoded text payload, if this value is an encoded string
    pub fn as_encoded_text(&self) -> Option<&EncodedTextAst> {
        match self {
            Value::ClpString(ast) => Some(ast),
            _ => None,
        }
    }

    /// The literal type of this value under a node of the given type
    ///
    /// This is the forward mapping used for query matching once a value
    /// is available. Values that disagree with their node's type map to
    /// Unknown, which no descriptor admits.
    pub fn literal_type(&self, node_type: NodeType) -> LiteralType {
        match (node_type, self) {
            (NodeType::Int, Value::Int(_)) => LiteralType::Integer,
            (NodeType::Float, Value::Float(_)) => LiteralType::Float,
            (NodeType::Bool, Value::Bool(_)) => LiteralType::Boolean,
            (NodeType::UnstructuredArray, Value::UnstructuredArray(_)) => LiteralType::Array,
            (NodeType::Str, Value::ShortString(_)) => LiteralType::VarString,
            (NodeType::Str, Value::ClpString(_)) => LiteralType::ClpString,
            (NodeType::Obj, Value::Null) => LiteralType::Null,
            (NodeType::Obj, _) => LiteralType::Unknown,
            _ => LiteralType::Unknown,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
            Value::ShortString(s) => write!(f, "{}", s),
            Value::ClpString(ast) => write!(f, "{}", ast.decode()),
            Value::UnstructuredArray(s) => write!(f, "{}", s),
        }
    }
}

/// Placeholder byte marking the next dictionary variable in a logtype
pub const DICT_VAR_PLACEHOLDER: char = '\u{11}';

/// Placeholder byte marking the next encoded integer variable in a logtype
pub const INT_VAR_PLACEHOLDER: char = '\u{12}';

/// Escape byte preceding a literal occurrence of a placeholder byte
pub const PLACEHOLDER_ESCAPE: char = '\u{13}';

/// An encoded text value: a logtype template with extracted variables
///
/// The logtype embeds [`DICT_VAR_PLACEHOLDER`] and [`INT_VAR_PLACEHOLDER`]
/// bytes standing in for the variables extracted at serialization time.
/// Integer variables travel inline in `encoded_vars`; every other
/// variable kind travels through `dict_vars`, so decoding is lossless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTextAst {
    logtype: Arc<str>,
    dict_vars: Vec<String>,
    encoded_vars: Vec<i64>,
}

impl EncodedTextAst {
    /// Create an encoded text value from its parts
    pub fn new(
        logtype: impl Into<String>,
        dict_vars: Vec<String>,
        encoded_vars: Vec<i64>,
    ) -> Self {
        Self {
            logtype: Arc::from(logtype.into().as_str()),
            dict_vars,
            encoded_vars,
        }
    }

    /// The logtype template with placeholder bytes
    pub fn logtype(&self) -> &str {
        &self.logtype
    }

    /// Variables stored in the dictionary
    pub fn dict_vars(&self) -> &[String] {
        &self.dict_vars
    }

    /// Inline encoded integer variables
    pub fn encoded_vars(&self) -> &[i64] {
        &self.encoded_vars
    }

    /// Reconstruct the original text by substituting variables back into
    /// the logtype
    pub fn decode(&self) -> String {
        let mut out = String::with_capacity(self.logtype.len());
        let mut dict_vars = self.dict_vars.iter();
        let mut encoded_vars = self.encoded_vars.iter();
        let mut chars = self.logtype.chars();
        while let Some(c) = chars.next() {
            match c {
                DICT_VAR_PLACEHOLDER => {
                    if let Some(var) = dict_vars.next() {
                        out.push_str(var);
                    }
                }
                INT_VAR_PLACEHOLDER => {
                    if let Some(var) = encoded_vars.next() {
                        out.push_str(&var.to_string());
                    }
                }
                PLACEHOLDER_ESCAPE => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                _ => out.push(c),
            }
        }
        out
    }
}
