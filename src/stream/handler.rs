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

//! The unit handler contract
//!
//! The deserializer reports every deserialized IR unit to a handler, in
//! strict stream order, exactly once each. Any error a handler returns
//! is propagated verbatim as the step's error; the deserializer never
//! retries, so the application owns recovery policy.

use crate::core::{Namespace, NodeId, NodeLocator, Result, SchemaTree, UtcOffset};
use crate::stream::event::LogEvent;

/// User-defined operations invoked per deserialized IR unit
///
/// Schema trees are lent read-only for the duration of a callback; a
/// handler must not hold on to them past its return.
pub trait UnitHandler {
    /// Handle a log event that satisfied the query
    fn handle_log_event(&mut self, event: LogEvent<'_>) -> Result<()>;

    /// Handle a schema tree node insertion
    ///
    /// The locator's node has already been inserted into `tree` when
    /// this fires.
    fn handle_schema_tree_node_insertion(
        &mut self,
        namespace: Namespace,
        locator: &NodeLocator,
        tree: &SchemaTree,
    ) -> Result<()>;

    /// Handle a UTC offset change
    fn handle_utc_offset_change(&mut self, old: UtcOffset, new: UtcOffset) -> Result<()>;

    /// Handle the end-of-stream marker
    fn handle_end_of_stream(&mut self) -> Result<()>;

    /// Handle a projected key path resolving to a schema tree node
    ///
    /// Fires at most once per projected path, before the insertion
    /// callback of the node that resolved it.
    fn handle_projection_resolution(
        &mut self,
        namespace: Namespace,
        node_id: NodeId,
        key_path: &str,
    ) -> Result<()> {
        let _ = (namespace, node_id, key_path);
        Ok(())
    }
}

/// A handler that accepts every unit and does nothing
///
/// Useful for pure deserialization, e.g. skipping to the end of a
/// stream or validating its framing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl UnitHandler for NoopHandler {
    fn handle_log_event(&mut self, _event: LogEvent<'_>) -> Result<()> {
        Ok(())
    }

    fn handle_schema_tree_node_insertion(
        &mut self,
        _namespace: Namespace,
        _locator: &NodeLocator,
        _tree: &SchemaTree,
    ) -> Result<()> {
        Ok(())
    }

    fn handle_utc_offset_change(&mut self, _old: UtcOffset, _new: UtcOffset) -> Result<()> {
        Ok(())
    }

    fn handle_end_of_stream(&mut self) -> Result<()> {
        Ok(())
    }
}
