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

//! Core types for logsieve
//!
//! This module contains the fundamental types shared by the stream and
//! search layers: the error taxonomy, scalar/literal types, values, and
//! the schema tree.

pub mod error;
pub mod schema_tree;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use schema_tree::{Node, NodeId, NodeLocator, SchemaTree, ROOT_NODE_ID};
pub use types::{FilterOp, LiteralType, LiteralTypeSet, Namespace, NodeType, UtcOffset};
pub use value::{EncodedTextAst, Value};
