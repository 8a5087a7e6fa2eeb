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

//! Three-valued query evaluation
//!
//! Evaluating an expression against one log event yields True ("the
//! event matches"), False ("it demonstrably does not"), or Prune ("no
//! column this subexpression references exists in the schema or event,
//! so it supplies no information"). Prune is a fixed point of inversion
//! and composes so an outer OR can still match through another branch.

use crate::core::{FilterOp, LiteralType, SchemaTree, Value};
use crate::search::ast::{Expr, FilterExpr, Literal};
use crate::search::resolver::Resolver;
use crate::stream::event::NodeValueMap;

/// Result of evaluating a search expression against one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluatedValue {
    True,
    False,
    Prune,
}

impl EvaluatedValue {
    fn from_bool(matched: bool) -> Self {
        if matched {
            EvaluatedValue::True
        } else {
            EvaluatedValue::False
        }
    }

    /// Invert True/False; Prune passes through unchanged
    fn inverted_if(self, inverted: bool) -> Self {
        if !inverted {
            return self;
        }
        match self {
            EvaluatedValue::True => EvaluatedValue::False,
            EvaluatedValue::False => EvaluatedValue::True,
            EvaluatedValue::Prune => EvaluatedValue::Prune,
        }
    }
}

/// Everything one evaluation reads: the resolver state, both schema
/// trees, and the event's node-id/value maps
pub struct EvalContext<'a> {
    pub resolver: &'a Resolver,
    pub auto_gen_tree: &'a SchemaTree,
    pub user_gen_tree: &'a SchemaTree,
    pub auto_gen_pairs: &'a NodeValueMap,
    pub user_gen_pairs: &'a NodeValueMap,
}

/// Evaluate a preprocessed query against one event
///
/// A `None` query matches every event.
pub fn evaluate_query(query: Option<&Expr>, ctx: &EvalContext<'_>) -> EvaluatedValue {
    match query {
        None => EvaluatedValue::True,
        Some(expr) => evaluate_expr(expr, ctx),
    }
}

fn evaluate_expr(expr: &Expr, ctx: &EvalContext<'_>) -> EvaluatedValue {
    match expr {
        Expr::And { children, inverted } => {
            for child in children {
                match evaluate_expr(child, ctx) {
                    EvaluatedValue::Prune => return EvaluatedValue::Prune,
                    EvaluatedValue::False => {
                        return EvaluatedValue::False.inverted_if(*inverted);
                    }
                    EvaluatedValue::True => {}
                }
            }
            EvaluatedValue::True.inverted_if(*inverted)
        }
        Expr::Or { children, inverted } => {
            let mut all_prune = true;
            for child in children {
                match evaluate_expr(child, ctx) {
                    EvaluatedValue::True => {
                        return EvaluatedValue::True.inverted_if(*inverted);
                    }
                    EvaluatedValue::False => all_prune = false,
                    EvaluatedValue::Prune => {}
                }
            }
            if all_prune {
                EvaluatedValue::Prune
            } else {
                EvaluatedValue::False.inverted_if(*inverted)
            }
        }
        Expr::Filter(filter) => evaluate_filter(filter, ctx).inverted_if(filter.is_inverted()),
        Expr::Empty => EvaluatedValue::False,
    }
}

fn evaluate_filter(filter: &FilterExpr, ctx: &EvalContext<'_>) -> EvaluatedValue {
    let column = filter.column();
    if column.is_pure_wildcard() {
        return evaluate_pure_wildcard_filter(filter, ctx);
    }

    let pairs = if column.namespace().is_auto_gen() {
        ctx.auto_gen_pairs
    } else {
        ctx.user_gen_pairs
    };
    let tree = if column.namespace().is_auto_gen() {
        ctx.auto_gen_tree
    } else {
        ctx.user_gen_tree
    };

    let resolved = ctx.resolver.resolutions_for(column);
    let hit = resolved
        .iter()
        .find_map(|node_id| pairs.get(*node_id).map(|value| (*node_id, value)));
    let (node_id, value) = match hit {
        Some(hit) => hit,
        None => return EvaluatedValue::Prune,
    };

    let node_type = match tree.get_node(node_id) {
        Some(node) => node.node_type(),
        None => return EvaluatedValue::Prune,
    };
    let literal_type = value.literal_type(node_type);
    if !column.types().contains(literal_type) {
        return EvaluatedValue::Prune;
    }

    EvaluatedValue::from_bool(apply_op(filter, literal_type, value))
}

/// A pure-wildcard column ignores its namespace and scans every pair in
/// the event
fn evaluate_pure_wildcard_filter(filter: &FilterExpr, ctx: &EvalContext<'_>) -> EvaluatedValue {
    let mut any_admissible = false;
    let sides = [
        (ctx.auto_gen_pairs, ctx.auto_gen_tree),
        (ctx.user_gen_pairs, ctx.user_gen_tree),
    ];
    for (pairs, tree) in sides {
        for (node_id, value) in pairs.iter() {
            let node_type = match tree.get_node(*node_id) {
                Some(node) => node.node_type(),
                None => continue,
            };
            let literal_type = value.literal_type(node_type);
            if !filter.column().types().contains(literal_type) {
                continue;
            }
            any_admissible = true;
            if apply_op(filter, literal_type, value) {
                return EvaluatedValue::True;
            }
        }
    }
    if any_admissible {
        EvaluatedValue::False
    } else {
        EvaluatedValue::Prune
    }
}

/// Apply a filter's operation to one admissible value
fn apply_op(filter: &FilterExpr, literal_type: LiteralType, value: &Value) -> bool {
    match filter.op() {
        FilterOp::Exists => return true,
        FilterOp::NotExists => return false,
        _ => {}
    }

    match literal_type {
        LiteralType::Integer => {
            let lhs = match value.as_int() {
                Some(lhs) => lhs,
                None => return false,
            };
            match filter.operand() {
                Some(Literal::Int(rhs)) => compare_ord(filter.op(), &lhs, rhs),
                Some(Literal::Float(rhs)) => compare_ord(filter.op(), &(lhs as f64), rhs),
                _ => false,
            }
        }
        LiteralType::Float => {
            let lhs = match value.as_float() {
                Some(lhs) => lhs,
                None => return false,
            };
            match filter.operand() {
                Some(Literal::Int(rhs)) => compare_ord(filter.op(), &lhs, &(*rhs as f64)),
                Some(Literal::Float(rhs)) => compare_ord(filter.op(), &lhs, rhs),
                _ => false,
            }
        }
        LiteralType::Boolean => {
            let lhs = match value.as_bool() {
                Some(lhs) => lhs,
                None => return false,
            };
            match (filter.op(), filter.operand()) {
                (FilterOp::Eq, Some(Literal::Bool(rhs))) => lhs == *rhs,
                (FilterOp::Neq, Some(Literal::Bool(rhs))) => lhs != *rhs,
                _ => false,
            }
        }
        LiteralType::VarString => match value.as_str() {
            Some(text) => match_string(filter, text),
            None => false,
        },
        LiteralType::ClpString => match value.as_encoded_text() {
            Some(ast) => match_string(filter, &ast.decode()),
            None => false,
        },
        LiteralType::Null => match (filter.op(), filter.operand()) {
            (FilterOp::Eq, Some(Literal::Null)) => true,
            (FilterOp::Neq, Some(Literal::Null)) => false,
            _ => false,
        },
        // Arrays and unclassifiable values only answer presence checks
        LiteralType::Array | LiteralType::Unknown => false,
    }
}

fn match_string(filter: &FilterExpr, text: &str) -> bool {
    let matcher = match filter.matcher() {
        Some(matcher) => matcher,
        None => return false,
    };
    match filter.op() {
        FilterOp::Eq => matcher.matches(text),
        FilterOp::Neq => !matcher.matches(text),
        _ => false,
    }
}

fn compare_ord<T: PartialOrd>(op: FilterOp, lhs: &T, rhs: &T) -> bool {
    match op {
        FilterOp::Eq => lhs == rhs,
        FilterOp::Neq => lhs != rhs,
        FilterOp::Lt => lhs < rhs,
        FilterOp::Gt => lhs > rhs,
        FilterOp::Lte => lhs <= rhs,
        FilterOp::Gte => lhs >= rhs,
        FilterOp::Exists | FilterOp::NotExists => true,
    }
}
