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

//! # logsieve - streaming key-value IR log deserialization with search
//!
//! logsieve consumes a self-describing key-value IR log stream one unit
//! at a time, incrementally grows the stream's two schema trees, and
//! evaluates a pre-compiled structured search expression against every
//! log event as it is decoded. Matching events are handed to a
//! user-supplied unit handler; everything else is discarded without
//! allocation beyond the unit being decoded.
//!
//! ## Example
//!
//! ```no_run
//! use logsieve::{
//!     ColumnDescriptor, Deserializer, Expr, FilterExpr, FilterOp, IoReader, Literal, Namespace,
//!     NoopHandler,
//! };
//!
//! let column = ColumnDescriptor::from_key_path(Namespace::UserGen, "latency_ms").unwrap();
//! let query = Expr::Filter(
//!     FilterExpr::new(FilterOp::Gt, column, Some(Literal::Int(250))).unwrap(),
//! );
//!
//! let file = std::fs::File::open("events.ir").unwrap();
//! let mut reader = IoReader::new(file);
//! let mut deserializer = Deserializer::builder(NoopHandler)
//!     .query(query)
//!     .build(&mut reader)
//!     .unwrap();
//! while !deserializer.is_complete() {
//!     deserializer.next_unit(&mut reader).unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`] - errors, scalar types, values, and the schema tree
//! - [`search`] - descriptors, the query AST, preprocessing,
//!   resolution, and three-valued evaluation
//! - [`stream`] - the wire protocol, decoding, and the deserializer

pub mod core;
pub mod search;
pub mod stream;

// Re-export main types for convenience
pub use crate::core::{
    EncodedTextAst, Error, FilterOp, LiteralType, LiteralTypeSet, Namespace, Node, NodeId,
    NodeLocator, NodeType, Result, SchemaTree, UtcOffset, Value, ROOT_NODE_ID,
};

// Re-export search types
pub use crate::search::{
    preprocess, ColumnDescriptor, DescriptorToken, EvaluatedValue, Expr, FilterExpr, Literal,
    ProjectedKeyPath, WildcardPattern,
};

// Re-export stream types
pub use crate::stream::{
    Deserializer, DeserializerBuilder, EncodingType, IoReader, LogEvent, NodeValueMap,
    NoopHandler, Reader, SliceReader, StreamVersion, UnitHandler, UnitKind,
};
