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

//! Append-only schema tree of typed named nodes
//!
//! Each namespace of a stream grows one of these trees, one node per
//! schema-tree-node-insertion IR unit. Nodes are never removed and a
//! node's type never changes.

use rustc_hash::FxHashMap;

use super::error::{Error, Result};
use super::types::NodeType;

/// Schema tree node identifier
pub type NodeId = u32;

/// Id of the distinguished root node; the root is its own parent
pub const ROOT_NODE_ID: NodeId = 0;

/// Identity of a schema tree node: parent, key name, and type
///
/// The tree enforces at most one node per locator. Two nodes with the
/// same parent and key name but different types are distinct columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeLocator {
    pub parent_id: NodeId,
    pub key_name: String,
    pub node_type: NodeType,
}

impl NodeLocator {
    /// Create a new locator
    pub fn new(parent_id: NodeId, key_name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            parent_id,
            key_name: key_name.into(),
            node_type,
        }
    }
}

/// A node stored in the schema tree
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    parent_id: NodeId,
    key_name: String,
    node_type: NodeType,
}

impl Node {
    /// This node's id
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The parent node's id (the root is its own parent)
    pub fn parent_id(&self) -> NodeId {
        self.parent_id
    }

    /// The key name (empty for the root)
    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    /// The node's type
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// The locator identifying this node
    pub fn locator(&self) -> NodeLocator {
        NodeLocator::new(self.parent_id, self.key_name.clone(), self.node_type)
    }
}

/// Append-only tree of typed named nodes with stable integer ids
///
/// Ids are dense starting from `ROOT_NODE_ID + 1`; the parent of every
/// non-root node is inserted before the node itself. A flat vector gives
/// O(1) lookup by id and a locator index gives O(1) duplicate detection.
#[derive(Debug)]
pub struct SchemaTree {
    nodes: Vec<Node>,
    locator_index: FxHashMap<NodeLocator, NodeId>,
}

impl SchemaTree {
    /// Create a tree containing only the root node
    pub fn new() -> Self {
        let root = Node {
            id: ROOT_NODE_ID,
            parent_id: ROOT_NODE_ID,
            key_name: String::new(),
            node_type: NodeType::Obj,
        };
        Self {
            nodes: vec![root],
            locator_index: FxHashMap::default(),
        }
    }

    /// Insert a node and return its newly assigned id
    ///
    /// Fails with DuplicateSchemaNode if the locator already exists and
    /// InvalidArgument if the parent id refers to no existing node.
    pub fn insert(&mut self, locator: NodeLocator) -> Result<NodeId> {
        if !self.contains_id(locator.parent_id) {
            return Err(Error::invalid_argument(format!(
                "parent node {} does not exist",
                locator.parent_id
            )));
        }
        if self.locator_index.contains_key(&locator) {
            return Err(Error::duplicate_schema_node(
                locator.parent_id,
                locator.key_name,
            ));
        }

        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node {
            id,
            parent_id: locator.parent_id,
            key_name: locator.key_name.clone(),
            node_type: locator.node_type,
        });
        self.locator_index.insert(locator, id);
        Ok(id)
    }

    /// Returns true if a node with this locator exists
    pub fn has_node(&self, locator: &NodeLocator) -> bool {
        self.locator_index.contains_key(locator)
    }

    /// Look up a node id by locator
    pub fn get_node_id(&self, locator: &NodeLocator) -> Option<NodeId> {
        self.locator_index.get(locator).copied()
    }

    /// Look up a node by id
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// Returns true if the id refers to an existing node (including root)
    pub fn contains_id(&self, id: NodeId) -> bool {
        (id as usize) < self.nodes.len()
    }

    /// Number of nodes, including the root
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Reconstruct the dot-joined key path from the root to a node
    ///
    /// The root's path is the empty string.
    pub fn key_path(&self, id: NodeId) -> Option<String> {
        let mut node = self.get_node(id)?;
        let mut segments: Vec<&str> = Vec::new();
        while node.id != ROOT_NODE_ID {
            segments.push(&node.key_name);
            node = self
                .get_node(node.parent_id)
                .expect("parent inserted before child");
        }
        segments.reverse();
        Some(segments.join("."))
    }
}

impl Default for SchemaTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree_has_root_only() {
        let tree = SchemaTree::new();
        assert_eq!(tree.node_count(), 1);
        let root = tree.get_node(ROOT_NODE_ID).unwrap();
        assert_eq!(root.id(), ROOT_NODE_ID);
        assert_eq!(root.parent_id(), ROOT_NODE_ID);
        assert_eq!(root.key_name(), "");
        assert_eq!(root.node_type(), NodeType::Obj);
    }

    #[test]
    fn test_insert_assigns_dense_ids() {
        let mut tree = SchemaTree::new();
        let a = tree
            .insert(NodeLocator::new(ROOT_NODE_ID, "a", NodeType::Obj))
            .unwrap();
        let b = tree
            .insert(NodeLocator::new(a, "b", NodeType::Int))
            .unwrap();
        let c = tree
            .insert(NodeLocator::new(ROOT_NODE_ID, "c", NodeType::Str))
            .unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(c, 3);
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn test_round_trip() {
        let mut tree = SchemaTree::new();
        let locator = NodeLocator::new(ROOT_NODE_ID, "x", NodeType::Float);
        assert!(!tree.has_node(&locator));

        let id = tree.insert(locator.clone()).unwrap();
        assert!(tree.has_node(&locator));
        assert_eq!(tree.get_node_id(&locator), Some(id));

        let node = tree.get_node(id).unwrap();
        assert_eq!(node.parent_id(), ROOT_NODE_ID);
        assert_eq!(node.key_name(), "x");
        assert_eq!(node.node_type(), NodeType::Float);
        assert_eq!(node.locator(), locator);
    }

    #[test]
    fn test_duplicate_locator_rejected() {
        let mut tree = SchemaTree::new();
        let locator = NodeLocator::new(ROOT_NODE_ID, "x", NodeType::Int);
        tree.insert(locator.clone()).unwrap();
        let err = tree.insert(locator).unwrap_err();
        assert!(matches!(err, Error::DuplicateSchemaNode { .. }));
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn test_same_key_different_type_is_distinct() {
        let mut tree = SchemaTree::new();
        tree.insert(NodeLocator::new(ROOT_NODE_ID, "x", NodeType::Int))
            .unwrap();
        tree.insert(NodeLocator::new(ROOT_NODE_ID, "x", NodeType::Str))
            .unwrap();
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_missing_parent_rejected() {
        let mut tree = SchemaTree::new();
        let err = tree
            .insert(NodeLocator::new(99, "orphan", NodeType::Int))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_key_path_reconstruction() {
        let mut tree = SchemaTree::new();
        let a = tree
            .insert(NodeLocator::new(ROOT_NODE_ID, "a", NodeType::Obj))
            .unwrap();
        let b = tree.insert(NodeLocator::new(a, "b", NodeType::Obj)).unwrap();
        let c = tree.insert(NodeLocator::new(b, "c", NodeType::Int)).unwrap();

        assert_eq!(tree.key_path(ROOT_NODE_ID).unwrap(), "");
        assert_eq!(tree.key_path(a).unwrap(), "a");
        assert_eq!(tree.key_path(c).unwrap(), "a.b.c");
        assert_eq!(tree.key_path(42), None);
    }
}
