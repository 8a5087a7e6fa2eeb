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

//! Incremental column resolution
//!
//! The resolver advances partial descriptor-to-path matches as schema
//! tree nodes are inserted, one node at a time, never re-scanning prior
//! nodes. A partial resolution (descriptor, token cursor) anchored at a
//! node means the descriptor prefix before the cursor has matched the
//! path from the root to that node. Partial resolutions are never
//! garbage-collected; their count is bounded by the number of
//! descriptors times the depth of the subtree under a matching prefix.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::{Namespace, NodeId, NodeLocator, NodeType, ROOT_NODE_ID};
use crate::search::ast::Expr;
use crate::search::descriptor::{ColumnDescriptor, DescriptorId};
use crate::search::projection::Projection;

/// A projection path that just resolved to a schema tree node
#[derive(Debug, Clone)]
pub struct ProjectionHit {
    pub namespace: Namespace,
    pub node_id: NodeId,
    pub key_path: Arc<str>,
}

#[derive(Debug, Clone)]
struct PartialResolution {
    descriptor: Arc<ColumnDescriptor>,
    cursor: usize,
}

/// Tracks partial and finalized descriptor resolutions for one stream
#[derive(Debug, Default)]
pub struct Resolver {
    partials: FxHashMap<(NodeId, Namespace), Vec<PartialResolution>>,
    resolutions: FxHashMap<DescriptorId, Vec<NodeId>>,
    projection_paths: FxHashMap<DescriptorId, Arc<str>>,
    resolved_projections: FxHashSet<DescriptorId>,
}

impl Resolver {
    /// Seed partial resolutions for a preprocessed query and a projection
    ///
    /// Every non-pure-wildcard descriptor is anchored at the root with
    /// the cursor on its first token; a leading wildcard also gets a
    /// twin with the cursor advanced, modeling the wildcard matching
    /// zero segments.
    pub fn new(query: Option<&Expr>, projection: &Projection) -> Self {
        let mut resolver = Resolver::default();
        let mut seen: FxHashSet<DescriptorId> = FxHashSet::default();

        if let Some(expr) = query {
            expr.for_each_filter(&mut |filter| {
                if seen.insert(DescriptorId::of(filter.column())) {
                    resolver.add_descriptor(Arc::clone(filter.column()));
                }
            });
        }

        for (descriptor, key_path) in projection.columns() {
            resolver
                .projection_paths
                .insert(DescriptorId::of(descriptor), Arc::clone(key_path));
            if seen.insert(DescriptorId::of(descriptor)) {
                resolver.add_descriptor(Arc::clone(descriptor));
            }
        }

        resolver
    }

    fn add_descriptor(&mut self, descriptor: Arc<ColumnDescriptor>) {
        if descriptor.is_pure_wildcard() {
            return;
        }
        let anchor = (ROOT_NODE_ID, descriptor.namespace());
        let entries = self.partials.entry(anchor).or_default();
        let leading_wildcard = descriptor.token(0).is_wildcard();
        entries.push(PartialResolution {
            descriptor: Arc::clone(&descriptor),
            cursor: 0,
        });
        if leading_wildcard && descriptor.token_count() > 1 {
            entries.push(PartialResolution {
                descriptor,
                cursor: 1,
            });
        }
    }

    /// Advance resolution for one schema tree node insertion
    ///
    /// Returns the projection paths finalized by this node, for the
    /// deserializer to report to the handler.
    pub fn on_node_inserted(
        &mut self,
        namespace: Namespace,
        locator: &NodeLocator,
        node_id: NodeId,
    ) -> Vec<ProjectionHit> {
        let mut hits = Vec::new();
        let entries = match self.partials.get(&(locator.parent_id, namespace)) {
            Some(entries) => entries.clone(),
            None => return hits,
        };

        let child_anchor = (node_id, namespace);
        for entry in entries {
            let descriptor = entry.descriptor;
            let cursor = entry.cursor;
            let cur = descriptor.token(cursor);
            let next_index = cursor + 1;
            let is_last = next_index == descriptor.token_count();

            if !is_last && locator.node_type == NodeType::Obj {
                if cur.is_wildcard() {
                    // The wildcard may absorb more segments, or have
                    // matched exactly up to this node
                    self.extend(child_anchor, &descriptor, cursor);
                    self.extend(child_anchor, &descriptor, next_index);
                } else if cur.matches_key(&locator.key_name) {
                    self.extend(child_anchor, &descriptor, next_index);
                    if descriptor.token(next_index).is_wildcard()
                        && next_index + 1 < descriptor.token_count()
                    {
                        // The wildcard absorbs zero segments at this level
                        self.extend(child_anchor, &descriptor, next_index + 1);
                    }
                }
            }

            let wildcard_tail = !is_last
                && descriptor.token(next_index).is_wildcard()
                && next_index + 1 == descriptor.token_count();
            if (is_last || wildcard_tail)
                && descriptor
                    .types()
                    .intersects(locator.node_type.candidate_literal_types())
                && cur.matches_key(&locator.key_name)
            {
                self.finalize(&descriptor, namespace, node_id, &mut hits);
            }
        }

        hits
    }

    fn extend(
        &mut self,
        anchor: (NodeId, Namespace),
        descriptor: &Arc<ColumnDescriptor>,
        cursor: usize,
    ) {
        self.partials.entry(anchor).or_default().push(PartialResolution {
            descriptor: Arc::clone(descriptor),
            cursor,
        });
    }

    fn finalize(
        &mut self,
        descriptor: &Arc<ColumnDescriptor>,
        namespace: Namespace,
        node_id: NodeId,
        hits: &mut Vec<ProjectionHit>,
    ) {
        let id = DescriptorId::of(descriptor);
        if let Some(key_path) = self.projection_paths.get(&id) {
            // A projection yields at most one node id per namespace
            let key_path = Arc::clone(key_path);
            if self.resolved_projections.insert(id) {
                hits.push(ProjectionHit {
                    namespace,
                    node_id,
                    key_path,
                });
            }
        } else {
            self.resolutions.entry(id).or_default().push(node_id);
        }
    }

    /// The node ids a query descriptor has resolved to so far
    ///
    /// The list grows monotonically as the schema tree grows.
    pub fn resolutions_for(&self, descriptor: &Arc<ColumnDescriptor>) -> &[NodeId] {
        self.resolutions
            .get(&DescriptorId::of(descriptor))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
