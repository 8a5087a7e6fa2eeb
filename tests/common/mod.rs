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

//! Shared helpers for integration tests: a byte-level stream builder and
//! a recording unit handler.

#![allow(dead_code)]

use logsieve::core::value::EncodedTextAst;
use logsieve::stream::protocol::{
    LengthWidth, LogEventTag, SchemaNodeTag, EIGHT_BYTE_ENCODING_TAG, METADATA_JSON_TAG,
    TAG_END_OF_STREAM, TAG_UTC_OFFSET_CHANGE, VALUE_TAG_ARRAY_LEN_U8, VALUE_TAG_ENCODED_TEXT,
    VALUE_TAG_FALSE, VALUE_TAG_FLOAT64, VALUE_TAG_INT64, VALUE_TAG_NULL, VALUE_TAG_STR_LEN_U8,
    VALUE_TAG_TRUE,
};
use logsieve::{
    Error, LogEvent, Namespace, NodeId, NodeLocator, NodeType, Result, SchemaTree, UnitHandler,
    UtcOffset, Value,
};

/// Builds well-formed (or deliberately malformed) IR stream bytes
pub struct StreamBuilder {
    bytes: Vec<u8>,
}

impl StreamBuilder {
    /// A stream opening with the eight-byte encoding variant and a
    /// current-version preamble
    pub fn new() -> Self {
        Self::with_metadata(r#"{"version":"0.1.0"}"#)
    }

    /// A stream with an explicit metadata blob
    pub fn with_metadata(metadata: &str) -> Self {
        let mut bytes = vec![EIGHT_BYTE_ENCODING_TAG, METADATA_JSON_TAG];
        bytes.extend_from_slice(&(metadata.len() as u32).to_le_bytes());
        bytes.extend_from_slice(metadata.as_bytes());
        Self { bytes }
    }

    /// Append a schema-tree-node-insertion unit
    pub fn insert_node(
        mut self,
        namespace: Namespace,
        parent_id: NodeId,
        key: &str,
        node_type: NodeType,
    ) -> Self {
        let tag = SchemaNodeTag {
            namespace,
            node_type,
            key_length_width: LengthWidth::U8,
        };
        self.bytes.push(tag.encode());
        self.bytes.extend_from_slice(&parent_id.to_le_bytes());
        self.bytes.push(key.len() as u8);
        self.bytes.extend_from_slice(key.as_bytes());
        self
    }

    /// Append a UTC offset change unit
    pub fn utc_offset(mut self, offset: UtcOffset) -> Self {
        self.bytes.push(TAG_UTC_OFFSET_CHANGE);
        self.bytes.extend_from_slice(&offset.to_le_bytes());
        self
    }

    /// Append a log event unit
    pub fn log_event(
        mut self,
        auto_gen: &[(NodeId, Value)],
        user_gen: &[(NodeId, Value)],
    ) -> Self {
        let tag = LogEventTag {
            field_width: LengthWidth::U8,
        };
        self.bytes.push(tag.encode());
        for pairs in [auto_gen, user_gen] {
            self.bytes.push(pairs.len() as u8);
            for (node_id, value) in pairs {
                self.bytes.push(*node_id as u8);
                push_value(&mut self.bytes, value);
            }
        }
        self
    }

    /// Append the end-of-stream unit
    pub fn end_of_stream(mut self) -> Self {
        self.bytes.push(TAG_END_OF_STREAM);
        self
    }

    /// Append raw bytes (for malformed-stream tests)
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// The finished stream
    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

fn push_value(bytes: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => bytes.push(VALUE_TAG_NULL),
        Value::Bool(true) => bytes.push(VALUE_TAG_TRUE),
        Value::Bool(false) => bytes.push(VALUE_TAG_FALSE),
        Value::Int(i) => {
            bytes.push(VALUE_TAG_INT64);
            bytes.extend_from_slice(&i.to_le_bytes());
        }
        Value::Float(f) => {
            bytes.push(VALUE_TAG_FLOAT64);
            bytes.extend_from_slice(&f.to_le_bytes());
        }
        Value::ShortString(s) => {
            bytes.push(VALUE_TAG_STR_LEN_U8);
            bytes.push(s.len() as u8);
            bytes.extend_from_slice(s.as_bytes());
        }
        Value::UnstructuredArray(s) => {
            bytes.push(VALUE_TAG_ARRAY_LEN_U8);
            bytes.push(s.len() as u8);
            bytes.extend_from_slice(s.as_bytes());
        }
        Value::ClpString(ast) => {
            bytes.push(VALUE_TAG_ENCODED_TEXT);
            push_encoded_text(bytes, ast);
        }
    }
}

fn push_encoded_text(bytes: &mut Vec<u8>, ast: &EncodedTextAst) {
    bytes.extend_from_slice(&(ast.logtype().len() as u32).to_le_bytes());
    bytes.extend_from_slice(ast.logtype().as_bytes());
    bytes.extend_from_slice(&(ast.dict_vars().len() as u32).to_le_bytes());
    for var in ast.dict_vars() {
        bytes.extend_from_slice(&(var.len() as u32).to_le_bytes());
        bytes.extend_from_slice(var.as_bytes());
    }
    bytes.extend_from_slice(&(ast.encoded_vars().len() as u32).to_le_bytes());
    for var in ast.encoded_vars() {
        bytes.extend_from_slice(&var.to_le_bytes());
    }
}

/// What a recorded log event carried
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    pub auto_gen: Vec<(NodeId, Value)>,
    pub user_gen: Vec<(NodeId, Value)>,
    pub utc_offset: UtcOffset,
}

/// A unit handler that records every callback in order
#[derive(Debug, Default)]
pub struct RecordingHandler {
    pub unit_order: Vec<String>,
    pub events: Vec<RecordedEvent>,
    pub insertions: Vec<(Namespace, NodeLocator)>,
    pub offset_changes: Vec<(UtcOffset, UtcOffset)>,
    pub projections: Vec<(Namespace, NodeId, String)>,
    pub end_of_stream_count: usize,
    /// When set, the matching callback fails with this handler code
    pub fail_log_events_with: Option<i64>,
    pub fail_projections_with: Option<i64>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UnitHandler for RecordingHandler {
    fn handle_log_event(&mut self, event: LogEvent<'_>) -> Result<()> {
        if let Some(code) = self.fail_log_events_with {
            return Err(Error::handler(code));
        }
        self.unit_order.push("log-event".to_string());
        self.events.push(RecordedEvent {
            auto_gen: event.pairs(Namespace::AutoGen).iter().cloned().collect(),
            user_gen: event.pairs(Namespace::UserGen).iter().cloned().collect(),
            utc_offset: event.utc_offset(),
        });
        Ok(())
    }

    fn handle_schema_tree_node_insertion(
        &mut self,
        namespace: Namespace,
        locator: &NodeLocator,
        tree: &SchemaTree,
    ) -> Result<()> {
        assert!(
            tree.has_node(locator),
            "insertion callback must see the node already in the tree"
        );
        self.unit_order.push("schema-tree-node-insertion".to_string());
        self.insertions.push((namespace, locator.clone()));
        Ok(())
    }

    fn handle_utc_offset_change(&mut self, old: UtcOffset, new: UtcOffset) -> Result<()> {
        self.unit_order.push("utc-offset-change".to_string());
        self.offset_changes.push((old, new));
        Ok(())
    }

    fn handle_end_of_stream(&mut self) -> Result<()> {
        self.unit_order.push("end-of-stream".to_string());
        self.end_of_stream_count += 1;
        Ok(())
    }

    fn handle_projection_resolution(
        &mut self,
        namespace: Namespace,
        node_id: NodeId,
        key_path: &str,
    ) -> Result<()> {
        if let Some(code) = self.fail_projections_with {
            return Err(Error::handler(code));
        }
        self.projections
            .push((namespace, node_id, key_path.to_string()));
        Ok(())
    }
}
