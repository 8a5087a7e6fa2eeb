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

//! The deserializer core
//!
//! One instance owns both schema trees, the running UTC offset, the
//! preprocessed query, and the resolver state for one stream. Each call
//! to [`Deserializer::next_unit`] consumes exactly one IR unit from the
//! reader and reports it to the unit handler. Construction reads and
//! validates the preamble.
//!
//! Any error other than one reported by the handler leaves the reader's
//! position unspecified; the instance must then be discarded.

use crate::core::{Error, Namespace, Result, SchemaTree, UtcOffset};
use crate::search::ast::Expr;
use crate::search::evaluator::{evaluate_query, EvalContext, EvaluatedValue};
use crate::search::preprocess::preprocess;
use crate::search::projection::{ProjectedKeyPath, Projection};
use crate::search::resolver::Resolver;
use crate::stream::decoder;
use crate::stream::event::{LogEvent, NodeValueMap};
use crate::stream::handler::UnitHandler;
use crate::stream::protocol::{
    unit_kind_from_tag, EncodingType, StreamVersion, UnitKind, METADATA_USER_DEFINED_KEY,
    METADATA_VERSION_KEY,
};
use crate::stream::reader::Reader;

/// Configures and constructs a [`Deserializer`]
pub struct DeserializerBuilder<H: UnitHandler> {
    handler: H,
    query: Option<Expr>,
    projection: Vec<ProjectedKeyPath>,
    case_insensitive: bool,
}

impl<H: UnitHandler> DeserializerBuilder<H> {
    /// Set the search expression; absent means "match everything"
    pub fn query(mut self, query: Expr) -> Self {
        self.query = Some(query);
        self
    }

    /// Set the projected key paths
    pub fn projection(mut self, paths: Vec<ProjectedKeyPath>) -> Self {
        self.projection = paths;
        self
    }

    /// Match string operands case-insensitively for this invocation
    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Read and validate the preamble, preprocess the query, and build
    /// the deserializer
    pub fn build<R: Reader>(self, reader: &mut R) -> Result<Deserializer<H>> {
        let encoding = decoder::get_encoding_type(reader)?;
        let metadata_bytes = decoder::deserialize_preamble(reader)?;
        let metadata: serde_json::Value = serde_json::from_slice(&metadata_bytes)
            .map_err(|_| Error::corrupt("preamble metadata is not valid JSON"))?;
        let object = metadata
            .as_object()
            .ok_or_else(|| Error::corrupt("preamble metadata is not a JSON object"))?;

        let version = object
            .get(METADATA_VERSION_KEY)
            .and_then(|value| value.as_str())
            .ok_or_else(|| Error::corrupt("preamble metadata has no string version key"))?;
        let parsed: StreamVersion = version.parse()?;
        if !parsed.is_supported() {
            return Err(Error::UnsupportedVersion(version.to_string()));
        }

        if let Some(user_defined) = object.get(METADATA_USER_DEFINED_KEY) {
            if !user_defined.is_object() {
                return Err(Error::unsupported_metadata(
                    "user_defined_metadata is not a JSON object",
                ));
            }
        }

        let mut query = preprocess(self.query);
        if let Some(expr) = query.as_mut() {
            let mut bind_error = None;
            expr.for_each_filter_mut(&mut |filter| {
                if bind_error.is_none() {
                    if let Err(err) = filter.bind_matcher(self.case_insensitive) {
                        bind_error = Some(err);
                    }
                }
            });
            if let Some(err) = bind_error {
                return Err(err);
            }
        }

        let projection = Projection::new(self.projection)?;
        let resolver = Resolver::new(query.as_ref(), &projection);

        Ok(Deserializer {
            auto_gen_tree: SchemaTree::new(),
            user_gen_tree: SchemaTree::new(),
            metadata,
            utc_offset: 0,
            handler: self.handler,
            complete: false,
            encoding,
            query,
            resolver,
        })
    }
}

/// Streaming deserializer and query evaluator for one IR stream
#[derive(Debug)]
pub struct Deserializer<H: UnitHandler> {
    auto_gen_tree: SchemaTree,
    user_gen_tree: SchemaTree,
    metadata: serde_json::Value,
    utc_offset: UtcOffset,
    handler: H,
    complete: bool,
    encoding: EncodingType,
    query: Option<Expr>,
    resolver: Resolver,
}

impl<H: UnitHandler> Deserializer<H> {
    /// Start configuring a deserializer for the given handler
    pub fn builder(handler: H) -> DeserializerBuilder<H> {
        DeserializerBuilder {
            handler,
            query: None,
            projection: Vec::new(),
            case_insensitive: false,
        }
    }

    /// Deserialize exactly one IR unit and report it to the handler
    ///
    /// Returns the kind of the unit processed. Log events that do not
    /// satisfy the query are consumed and discarded without a handler
    /// call.
    pub fn next_unit<R: Reader>(&mut self, reader: &mut R) -> Result<UnitKind> {
        if self.complete {
            return Err(Error::AlreadyFinished);
        }

        let tag = decoder::deserialize_tag(reader)?;
        let kind = unit_kind_from_tag(tag).ok_or(Error::UnsupportedTag { tag })?;

        match kind {
            UnitKind::SchemaTreeNodeInsertion => {
                let (namespace, locator) =
                    decoder::deserialize_ir_unit_schema_tree_node_insertion(reader, tag)?;

                let node_id = {
                    let tree = match namespace {
                        Namespace::AutoGen => &mut self.auto_gen_tree,
                        Namespace::UserGen => &mut self.user_gen_tree,
                    };
                    if !tree.contains_id(locator.parent_id) {
                        return Err(Error::corrupt(format!(
                            "schema node parent {} does not exist",
                            locator.parent_id
                        )));
                    }
                    if tree.has_node(&locator) {
                        return Err(Error::corrupt(format!(
                            "duplicate schema tree node '{}' under parent {}",
                            locator.key_name, locator.parent_id
                        )));
                    }
                    tree.insert(locator.clone())?
                };

                for hit in self.resolver.on_node_inserted(namespace, &locator, node_id) {
                    self.handler.handle_projection_resolution(
                        hit.namespace,
                        hit.node_id,
                        &hit.key_path,
                    )?;
                }

                let tree = match namespace {
                    Namespace::AutoGen => &self.auto_gen_tree,
                    Namespace::UserGen => &self.user_gen_tree,
                };
                self.handler
                    .handle_schema_tree_node_insertion(namespace, &locator, tree)?;
            }

            UnitKind::UtcOffsetChange => {
                let new_offset = decoder::deserialize_ir_unit_utc_offset_change(reader)?;
                self.handler
                    .handle_utc_offset_change(self.utc_offset, new_offset)?;
                self.utc_offset = new_offset;
            }

            UnitKind::LogEvent => {
                let (auto_gen_pairs, user_gen_pairs) =
                    decoder::deserialize_ir_unit_log_event(reader, tag, self.encoding)?;
                self.validate_event_node_ids(&auto_gen_pairs, &user_gen_pairs)?;

                let verdict = {
                    let ctx = EvalContext {
                        resolver: &self.resolver,
                        auto_gen_tree: &self.auto_gen_tree,
                        user_gen_tree: &self.user_gen_tree,
                        auto_gen_pairs: &auto_gen_pairs,
                        user_gen_pairs: &user_gen_pairs,
                    };
                    evaluate_query(self.query.as_ref(), &ctx)
                };

                if verdict == EvaluatedValue::True {
                    let event = LogEvent::new(
                        &auto_gen_pairs,
                        &user_gen_pairs,
                        &self.auto_gen_tree,
                        &self.user_gen_tree,
                        self.utc_offset,
                    );
                    self.handler.handle_log_event(event)?;
                }
            }

            UnitKind::EndOfStream => {
                self.handler.handle_end_of_stream()?;
                self.complete = true;
            }
        }

        Ok(kind)
    }

    /// Whether an end-of-stream unit has been deserialized
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The stream's preamble metadata
    pub fn metadata(&self) -> &serde_json::Value {
        &self.metadata
    }

    /// The unit handler
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The unit handler, mutably
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consume the deserializer and recover the handler
    pub fn into_handler(self) -> H {
        self.handler
    }

    fn validate_event_node_ids(
        &self,
        auto_gen_pairs: &NodeValueMap,
        user_gen_pairs: &NodeValueMap,
    ) -> Result<()> {
        let sides = [
            (auto_gen_pairs, &self.auto_gen_tree),
            (user_gen_pairs, &self.user_gen_tree),
        ];
        for (pairs, tree) in sides {
            for (node_id, _) in pairs.iter() {
                if !tree.contains_id(*node_id) {
                    return Err(Error::corrupt(format!(
                        "log event references unknown schema node {}",
                        node_id
                    )));
                }
            }
        }
        Ok(())
    }
}
