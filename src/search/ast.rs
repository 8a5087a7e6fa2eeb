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

//! Search expression AST
//!
//! Queries are tagged variants traversed by `match`: And/Or nodes with
//! inversion flags over filter leaves, plus the Empty sentinel produced
//! by preprocessing when a branch can never match.

use std::fmt;
use std::sync::Arc;

use crate::core::{Error, FilterOp, LiteralType, LiteralTypeSet, Result};
use crate::search::descriptor::ColumnDescriptor;
use crate::search::pattern::WildcardPattern;

/// A literal operand of a filter expression
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Null,
}

impl Literal {
    /// The literal types a column must be able to take for a comparison
    /// against this operand to ever decide
    ///
    /// The match-anything string pattern carries no type information; a
    /// filter built on it is a pure presence check and admits every
    /// type.
    pub fn admitted_types(&self) -> LiteralTypeSet {
        match self {
            Literal::Int(_) => LiteralType::Integer | LiteralType::Float,
            Literal::Float(_) => LiteralType::Float.into(),
            Literal::Bool(_) => LiteralType::Boolean.into(),
            Literal::Str(s) if WildcardPattern::is_match_all(s) => LiteralTypeSet::ALL,
            Literal::Str(_) => LiteralType::VarString | LiteralType::ClpString,
            Literal::Null => LiteralType::Null.into(),
        }
    }

    /// String payload, if this literal is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(x) => write!(f, "{}", x),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Str(s) => write!(f, "\"{}\"", s),
            Literal::Null => write!(f, "null"),
        }
    }
}

/// A single comparison between a column and an optional literal operand
#[derive(Debug, Clone)]
pub struct FilterExpr {
    op: FilterOp,
    column: Arc<ColumnDescriptor>,
    operand: Option<Literal>,
    inverted: bool,
    matcher: Option<WildcardPattern>,
}

impl FilterExpr {
    /// Create a filter expression
    ///
    /// Fails with InvalidArgument if the operation compares against an
    /// operand but none was supplied.
    pub fn new(
        op: FilterOp,
        column: Arc<ColumnDescriptor>,
        operand: Option<Literal>,
    ) -> Result<Self> {
        if op.needs_operand() && operand.is_none() {
            return Err(Error::invalid_argument(format!(
                "operation {} requires a literal operand",
                op
            )));
        }
        Ok(Self {
            op,
            column,
            operand,
            inverted: false,
            matcher: None,
        })
    }

    /// The comparison operation
    pub fn op(&self) -> FilterOp {
        self.op
    }

    /// The column this filter reads
    pub fn column(&self) -> &Arc<ColumnDescriptor> {
        &self.column
    }

    /// The literal operand, if the operation takes one
    pub fn operand(&self) -> Option<&Literal> {
        self.operand.as_ref()
    }

    /// Whether the filter's outcome is inverted
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Flip the inversion flag
    pub fn toggle_inverted(&mut self) {
        self.inverted = !self.inverted;
    }

    /// The compiled wildcard matcher for a string operand, once bound
    pub(crate) fn matcher(&self) -> Option<&WildcardPattern> {
        self.matcher.as_ref()
    }

    pub(crate) fn set_column(&mut self, column: Arc<ColumnDescriptor>) {
        self.column = column;
    }

    pub(crate) fn rewrite_as_presence_check(&mut self, op: FilterOp) {
        self.op = op;
        self.operand = None;
        self.matcher = None;
    }

    /// Compile the wildcard matcher for a string operand
    ///
    /// Called once per query at deserializer construction, when the
    /// invocation's case sensitivity is known.
    pub(crate) fn bind_matcher(&mut self, case_insensitive: bool) -> Result<()> {
        if let Some(Literal::Str(pattern)) = &self.operand {
            self.matcher = Some(WildcardPattern::compile(pattern, case_insensitive)?);
        }
        Ok(())
    }
}

/// A search expression
///
/// The preprocessed form is an Or of Ands of filters; Empty marks a
/// branch that can never match.
#[derive(Debug, Clone)]
pub enum Expr {
    And { children: Vec<Expr>, inverted: bool },
    Or { children: Vec<Expr>, inverted: bool },
    Filter(FilterExpr),
    Empty,
}

impl Expr {
    /// Create a non-inverted AND over the given children
    pub fn and(children: Vec<Expr>) -> Expr {
        Expr::And {
            children,
            inverted: false,
        }
    }

    /// Create a non-inverted OR over the given children
    pub fn or(children: Vec<Expr>) -> Expr {
        Expr::Or {
            children,
            inverted: false,
        }
    }

    /// Wrap an expression with an inversion
    pub fn not(expr: Expr) -> Expr {
        match expr {
            Expr::And { children, inverted } => Expr::And {
                children,
                inverted: !inverted,
            },
            Expr::Or { children, inverted } => Expr::Or {
                children,
                inverted: !inverted,
            },
            Expr::Filter(mut filter) => {
                filter.toggle_inverted();
                Expr::Filter(filter)
            }
            Expr::Empty => Expr::Empty,
        }
    }

    /// Returns true for the Empty sentinel
    pub fn is_empty(&self) -> bool {
        matches!(self, Expr::Empty)
    }

    /// Visit every filter in the expression
    pub fn for_each_filter<'a>(&'a self, visit: &mut impl FnMut(&'a FilterExpr)) {
        match self {
            Expr::And { children, .. } | Expr::Or { children, .. } => {
                for child in children {
                    child.for_each_filter(visit);
                }
            }
            Expr::Filter(filter) => visit(filter),
            Expr::Empty => {}
        }
    }

    pub(crate) fn for_each_filter_mut(&mut self, visit: &mut impl FnMut(&mut FilterExpr)) {
        match self {
            Expr::And { children, .. } | Expr::Or { children, .. } => {
                for child in children {
                    child.for_each_filter_mut(visit);
                }
            }
            Expr::Filter(filter) => visit(filter),
            Expr::Empty => {}
        }
    }
}
