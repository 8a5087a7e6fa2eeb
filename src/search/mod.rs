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

//! Search subsystem for logsieve
//!
//! This module provides everything between a parsed query AST and a
//! match decision for one log event:
//!
//! - [`descriptor`] - column key paths with inline wildcards
//! - [`ast`] - the tagged expression tree
//! - [`preprocess`] - the OR-of-AND, type-narrowing, and
//!   exists-conversion passes
//! - [`pattern`] - wildcard string matching
//! - [`resolver`] - incremental descriptor-to-node resolution
//! - [`evaluator`] - three-valued evaluation
//! - [`projection`] - projected key paths reported on resolution

pub mod ast;
pub mod descriptor;
pub mod evaluator;
pub mod pattern;
pub mod preprocess;
pub mod projection;
pub mod resolver;

pub use ast::{Expr, FilterExpr, Literal};
pub use descriptor::{ColumnDescriptor, DescriptorId, DescriptorToken};
pub use evaluator::{evaluate_query, EvalContext, EvaluatedValue};
pub use pattern::WildcardPattern;
pub use preprocess::preprocess;
pub use projection::{ProjectedKeyPath, Projection};
pub use resolver::{ProjectionHit, Resolver};
