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

//! Query preprocessing passes
//!
//! Three rewrite passes run before a query is evaluated against any
//! event:
//!
//! 1. OR-of-AND normalization - the root becomes an OR of ANDs of
//!    filters, with negations pushed down onto the filters.
//! 2. Type narrowing - each filter's column type mask is intersected
//!    with what its operation and operand can decide; a filter whose
//!    mask empties becomes the Empty sentinel and propagates upward
//!    (Empty AND x => Empty, Empty OR x => x).
//! 3. Exists conversion - filters comparing against the match-anything
//!    string pattern become plain presence checks.
//!
//! A pass returning Empty short-circuits the remaining passes. A `None`
//! query stays `None` ("match everything").

use crate::core::{FilterOp, LiteralTypeSet};
use crate::search::ast::{Expr, FilterExpr, Literal};
use crate::search::pattern::WildcardPattern;

/// Run all preprocessing passes on a query
pub fn preprocess(query: Option<Expr>) -> Option<Expr> {
    let expr = query?;

    let expr = or_of_and_form(expr);
    if expr.is_empty() {
        return Some(Expr::Empty);
    }

    let expr = narrow_types(expr);
    if expr.is_empty() {
        return Some(Expr::Empty);
    }

    Some(convert_to_exists(expr))
}

/// Normalize an expression into an OR of ANDs of filters
///
/// Negations are pushed down to the filter leaves via De Morgan's laws,
/// interior conjunctions are distributed over disjunctions, and the
/// result is rebuilt as a two-level tree (a single conjunct still gets
/// its OR/AND wrappers, which keeps the pass idempotent).
pub fn or_of_and_form(expr: Expr) -> Expr {
    if expr.is_empty() {
        return Expr::Empty;
    }
    let pushed = push_negations(expr, false);
    let disjuncts = collect_disjuncts(pushed);
    if disjuncts.is_empty() {
        return Expr::Empty;
    }
    Expr::or(
        disjuncts
            .into_iter()
            .map(|conjunct| Expr::and(conjunct.into_iter().map(Expr::Filter).collect()))
            .collect(),
    )
}

fn push_negations(expr: Expr, negate: bool) -> Expr {
    match expr {
        Expr::And { children, inverted } => {
            let negated = inverted ^ negate;
            let children: Vec<Expr> = children
                .into_iter()
                .map(|child| push_negations(child, negated))
                .collect();
            if negated {
                Expr::or(children)
            } else {
                Expr::and(children)
            }
        }
        Expr::Or { children, inverted } => {
            let negated = inverted ^ negate;
            let children: Vec<Expr> = children
                .into_iter()
                .map(|child| push_negations(child, negated))
                .collect();
            if negated {
                Expr::and(children)
            } else {
                Expr::or(children)
            }
        }
        Expr::Filter(mut filter) => {
            if negate {
                filter.toggle_inverted();
            }
            Expr::Filter(filter)
        }
        Expr::Empty => Expr::Empty,
    }
}

/// Flatten a negation-free tree into disjuncts of conjoined filters
fn collect_disjuncts(expr: Expr) -> Vec<Vec<FilterExpr>> {
    match expr {
        Expr::Filter(filter) => vec![vec![filter]],
        Expr::Or { children, .. } => children.into_iter().flat_map(collect_disjuncts).collect(),
        Expr::And { children, .. } => {
            // Distribute: AND(a, OR(b, c)) => OR(AND(a, b), AND(a, c))
            let mut conjuncts: Vec<Vec<FilterExpr>> = vec![vec![]];
            for child in children {
                let alternatives = collect_disjuncts(child);
                if alternatives.is_empty() {
                    return vec![];
                }
                let mut extended = Vec::with_capacity(conjuncts.len() * alternatives.len());
                for prefix in &conjuncts {
                    for alternative in &alternatives {
                        let mut merged = prefix.clone();
                        merged.extend(alternative.iter().cloned());
                        extended.push(merged);
                    }
                }
                conjuncts = extended;
            }
            conjuncts
        }
        Expr::Empty => vec![],
    }
}

/// Intersect every filter's column type mask with what its operation and
/// operand can decide
pub fn narrow_types(expr: Expr) -> Expr {
    match expr {
        Expr::And { children, inverted } => {
            let mut narrowed = Vec::with_capacity(children.len());
            for child in children {
                let child = narrow_types(child);
                if child.is_empty() {
                    return Expr::Empty;
                }
                narrowed.push(child);
            }
            Expr::And {
                children: narrowed,
                inverted,
            }
        }
        Expr::Or { children, inverted } => {
            let mut kept = Vec::with_capacity(children.len());
            for child in children {
                let child = narrow_types(child);
                if !child.is_empty() {
                    kept.push(child);
                }
            }
            if kept.is_empty() {
                Expr::Empty
            } else {
                Expr::Or {
                    children: kept,
                    inverted,
                }
            }
        }
        Expr::Filter(mut filter) => {
            let admitted = filter
                .op()
                .admitted_literal_types()
                .intersection(operand_admitted_types(&filter));
            let mask = filter.column().types().intersection(admitted);
            if mask.is_empty() {
                return Expr::Empty;
            }
            if mask != filter.column().types() {
                let narrowed = filter.column().narrowed(mask);
                filter.set_column(narrowed);
            }
            Expr::Filter(filter)
        }
        Expr::Empty => Expr::Empty,
    }
}

fn operand_admitted_types(filter: &FilterExpr) -> LiteralTypeSet {
    match filter.operand() {
        Some(literal) => literal.admitted_types(),
        None => LiteralTypeSet::ALL,
    }
}

/// Rewrite filters whose only information is presence into EXISTS /
/// NEXISTS presence checks
pub fn convert_to_exists(expr: Expr) -> Expr {
    match expr {
        Expr::And { children, inverted } => Expr::And {
            children: children.into_iter().map(convert_to_exists).collect(),
            inverted,
        },
        Expr::Or { children, inverted } => Expr::Or {
            children: children.into_iter().map(convert_to_exists).collect(),
            inverted,
        },
        Expr::Filter(mut filter) => {
            let match_all_operand = matches!(
                filter.operand(),
                Some(Literal::Str(s)) if WildcardPattern::is_match_all(s)
            );
            if match_all_operand {
                match filter.op() {
                    FilterOp::Eq => filter.rewrite_as_presence_check(FilterOp::Exists),
                    FilterOp::Neq => filter.rewrite_as_presence_check(FilterOp::NotExists),
                    _ => {}
                }
            }
            Expr::Filter(filter)
        }
        Expr::Empty => Expr::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::core::{LiteralType, Namespace};
    use crate::search::descriptor::ColumnDescriptor;

    fn column(path: &str) -> Arc<ColumnDescriptor> {
        ColumnDescriptor::from_key_path(Namespace::UserGen, path).unwrap()
    }

    fn int_filter(path: &str, value: i64) -> Expr {
        Expr::Filter(FilterExpr::new(FilterOp::Eq, column(path), Some(Literal::Int(value))).unwrap())
    }

    fn str_filter(path: &str, pattern: &str) -> Expr {
        Expr::Filter(
            FilterExpr::new(
                FilterOp::Eq,
                column(path),
                Some(Literal::Str(pattern.to_string())),
            )
            .unwrap(),
        )
    }

    fn filters_of(expr: &Expr) -> Vec<(String, FilterOp, bool)> {
        let mut out = Vec::new();
        expr.for_each_filter(&mut |f| {
            out.push((f.column().to_string(), f.op(), f.is_inverted()))
        });
        out
    }

    #[test]
    fn test_preprocess_none_is_none() {
        assert!(preprocess(None).is_none());
    }

    #[test]
    fn test_single_filter_wrapped_in_or_of_and() {
        let expr = or_of_and_form(int_filter("x", 1));
        match &expr {
            Expr::Or { children, inverted } => {
                assert!(!inverted);
                assert_eq!(children.len(), 1);
                match &children[0] {
                    Expr::And { children, .. } => assert_eq!(children.len(), 1),
                    _ => panic!("expected AND under OR"),
                }
            }
            _ => panic!("expected OR root"),
        }
    }

    #[test]
    fn test_negation_pushed_to_filters() {
        // NOT (a == 1 AND b == 2) => NOT a == 1 OR NOT b == 2
        let expr = Expr::not(Expr::and(vec![int_filter("a", 1), int_filter("b", 2)]));
        let normalized = or_of_and_form(expr);
        let filters = filters_of(&normalized);
        assert_eq!(filters.len(), 2);
        assert!(filters.iter().all(|(_, _, inverted)| *inverted));
        match &normalized {
            Expr::Or { children, inverted } => {
                assert!(!inverted);
                assert_eq!(children.len(), 2, "De Morgan should split into two disjuncts");
            }
            _ => panic!("expected OR root"),
        }
    }

    #[test]
    fn test_and_distributes_over_or() {
        // a AND (b OR c) => (a AND b) OR (a AND c)
        let expr = Expr::and(vec![
            int_filter("a", 1),
            Expr::or(vec![int_filter("b", 2), int_filter("c", 3)]),
        ]);
        let normalized = or_of_and_form(expr);
        match &normalized {
            Expr::Or { children, .. } => {
                assert_eq!(children.len(), 2);
                for child in children {
                    match child {
                        Expr::And { children, .. } => assert_eq!(children.len(), 2),
                        _ => panic!("expected AND conjuncts"),
                    }
                }
            }
            _ => panic!("expected OR root"),
        }
    }

    #[test]
    fn test_narrow_keeps_compatible_filters() {
        let normalized = or_of_and_form(int_filter("x", 5));
        let narrowed = narrow_types(normalized);
        let filters = filters_of(&narrowed);
        assert_eq!(filters.len(), 1);
        let mut mask = None;
        narrowed.for_each_filter(&mut |f| mask = Some(f.column().types()));
        let mask = mask.unwrap();
        assert!(mask.contains(LiteralType::Integer));
        assert!(mask.contains(LiteralType::Float));
        assert!(!mask.contains(LiteralType::VarString));
    }

    #[test]
    fn test_narrow_empties_contradictory_filter() {
        // Ordering against a string literal can never decide
        let filter = Expr::Filter(
            FilterExpr::new(
                FilterOp::Gt,
                column("x"),
                Some(Literal::Str("abc".to_string())),
            )
            .unwrap(),
        );
        let narrowed = narrow_types(or_of_and_form(filter));
        assert!(narrowed.is_empty());
    }

    #[test]
    fn test_empty_propagates_through_algebra() {
        // (contradiction AND a) OR b => b
        let contradiction = Expr::Filter(
            FilterExpr::new(
                FilterOp::Lt,
                column("x"),
                Some(Literal::Bool(true)),
            )
            .unwrap(),
        );
        let expr = Expr::or(vec![
            Expr::and(vec![contradiction, int_filter("a", 1)]),
            int_filter("b", 2),
        ]);
        let result = narrow_types(or_of_and_form(expr));
        let filters = filters_of(&result);
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].0, "user_gen:b");
    }

    #[test]
    fn test_all_branches_empty_gives_empty() {
        let contradiction = || {
            Expr::Filter(
                FilterExpr::new(
                    FilterOp::Gt,
                    column("x"),
                    Some(Literal::Str("s".to_string())),
                )
                .unwrap(),
            )
        };
        let expr = Expr::or(vec![contradiction(), contradiction()]);
        let result = preprocess(Some(expr)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_convert_to_exists() {
        let converted = convert_to_exists(str_filter("x", "*"));
        let filters = filters_of(&converted);
        assert_eq!(filters[0].1, FilterOp::Exists);

        let neq = Expr::Filter(
            FilterExpr::new(
                FilterOp::Neq,
                column("x"),
                Some(Literal::Str("**".to_string())),
            )
            .unwrap(),
        );
        let converted = convert_to_exists(neq);
        let filters = filters_of(&converted);
        assert_eq!(filters[0].1, FilterOp::NotExists);

        // A partial wildcard still compares values
        let converted = convert_to_exists(str_filter("x", "a*"));
        let filters = filters_of(&converted);
        assert_eq!(filters[0].1, FilterOp::Eq);
    }

    #[test]
    fn test_exists_conversion_keeps_full_type_mask() {
        // x == "*" carries no type information: after the full pipeline
        // the presence check must still admit every type
        let result = preprocess(Some(str_filter("x", "*"))).unwrap();
        let mut mask = None;
        result.for_each_filter(&mut |f| mask = Some(f.column().types()));
        assert_eq!(mask.unwrap(), LiteralTypeSet::ALL);
    }

    #[test]
    fn test_preprocess_idempotence() {
        let expr = Expr::not(Expr::and(vec![
            int_filter("a", 1),
            Expr::or(vec![str_filter("m", "err*"), str_filter("n", "*")]),
        ]));
        let once = preprocess(Some(expr)).unwrap();
        let twice = preprocess(Some(once.clone())).unwrap();
        assert_eq!(shape_of(&once), shape_of(&twice));
    }

    fn shape_of(expr: &Expr) -> String {
        match expr {
            Expr::And { children, inverted } => format!(
                "And[inv={}]({})",
                inverted,
                children.iter().map(shape_of).collect::<Vec<_>>().join(",")
            ),
            Expr::Or { children, inverted } => format!(
                "Or[inv={}]({})",
                inverted,
                children.iter().map(shape_of).collect::<Vec<_>>().join(",")
            ),
            Expr::Filter(f) => format!(
                "Filter[{} {} inv={} mask={:#x}]",
                f.column(),
                f.op(),
                f.is_inverted(),
                f.column().types().bits()
            ),
            Expr::Empty => "Empty".to_string(),
        }
    }
}
