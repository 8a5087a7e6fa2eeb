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

//! Log events and their node-id/value maps
//!
//! Events are narrow (typically under 64 keys), so the id-to-value map
//! is a flat small-vector scanned linearly rather than a hash table.

use smallvec::SmallVec;

use crate::core::{Namespace, NodeId, SchemaTree, UtcOffset, Value};

/// Mapping from schema tree node id to value for one event, one
/// namespace
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeValueMap {
    entries: SmallVec<[(NodeId, Value); 8]>,
}

impl NodeValueMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair; returns false if the node id is already present
    pub fn insert(&mut self, node_id: NodeId, value: Value) -> bool {
        if self.contains(node_id) {
            return false;
        }
        self.entries.push((node_id, value));
        true
    }

    /// Look up the value for a node id
    pub fn get(&self, node_id: NodeId) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(id, _)| *id == node_id)
            .map(|(_, value)| value)
    }

    /// Returns true if the node id has a value in this event
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.entries.iter().any(|(id, _)| *id == node_id)
    }

    /// Iterate pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &(NodeId, Value)> {
        self.entries.iter()
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map holds no pairs
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One matched log event, lent to the unit handler
///
/// The event borrows both schema trees read-only for the duration of the
/// callback; the deserializer resumes mutating them afterwards.
#[derive(Debug)]
pub struct LogEvent<'a> {
    auto_gen_pairs: &'a NodeValueMap,
    user_gen_pairs: &'a NodeValueMap,
    auto_gen_tree: &'a SchemaTree,
    user_gen_tree: &'a SchemaTree,
    utc_offset: UtcOffset,
}

impl<'a> LogEvent<'a> {
    pub(crate) fn new(
        auto_gen_pairs: &'a NodeValueMap,
        user_gen_pairs: &'a NodeValueMap,
        auto_gen_tree: &'a SchemaTree,
        user_gen_tree: &'a SchemaTree,
        utc_offset: UtcOffset,
    ) -> Self {
        Self {
            auto_gen_pairs,
            user_gen_pairs,
            auto_gen_tree,
            user_gen_tree,
            utc_offset,
        }
    }

    /// The node-id/value pairs of the given namespace
    pub fn pairs(&self, namespace: Namespace) -> &NodeValueMap {
        match namespace {
            Namespace::AutoGen => self.auto_gen_pairs,
            Namespace::UserGen => self.user_gen_pairs,
        }
    }

    /// The schema tree of the given namespace
    pub fn schema_tree(&self, namespace: Namespace) -> &SchemaTree {
        match namespace {
            Namespace::AutoGen => self.auto_gen_tree,
            Namespace::UserGen => self.user_gen_tree,
        }
    }

    /// The stream's UTC offset at the time this event was read, in
    /// nanoseconds
    pub fn utc_offset(&self) -> UtcOffset {
        self.utc_offset
    }

    /// Returns true if neither namespace carries a pair
    pub fn is_empty(&self) -> bool {
        self.auto_gen_pairs.is_empty() && self.user_gen_pairs.is_empty()
    }

    /// The dot-joined key path of a node carried by this event
    pub fn key_path(&self, namespace: Namespace, node_id: NodeId) -> Option<String> {
        self.schema_tree(namespace).key_path(node_id)
    }
}
