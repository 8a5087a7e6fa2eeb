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

//! Column descriptors: search-time key paths with inline wildcards
//!
//! A descriptor names the column a filter operates on. Descriptors are
//! shared between the AST, the partial-resolution table, and the
//! resolution map; the maps key on handle identity, not structural
//! equality, so one descriptor's resolutions are never confused with a
//! structurally equal descriptor from another filter.

use std::fmt;
use std::sync::Arc;

use crate::core::{Error, LiteralTypeSet, Namespace, Result};

/// One segment of a descriptor's key path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorToken {
    /// Matches any run of path segments (including none)
    Wildcard,
    /// Matches exactly this key name
    Key(String),
}

impl DescriptorToken {
    /// Create a token from raw text; `*` becomes the wildcard token
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text == "*" {
            DescriptorToken::Wildcard
        } else {
            DescriptorToken::Key(text)
        }
    }

    /// Returns true for the wildcard token
    pub fn is_wildcard(&self) -> bool {
        matches!(self, DescriptorToken::Wildcard)
    }

    /// Returns true if this token matches the given key name
    pub fn matches_key(&self, key_name: &str) -> bool {
        match self {
            DescriptorToken::Wildcard => true,
            DescriptorToken::Key(key) => key == key_name,
        }
    }
}

impl fmt::Display for DescriptorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorToken::Wildcard => write!(f, "*"),
            DescriptorToken::Key(key) => write!(f, "{}", key),
        }
    }
}

/// A search-time column: namespace, token path, and admissible types
///
/// Consecutive wildcard tokens are collapsed at construction, so a
/// wildcard token is never followed by another wildcard.
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    namespace: Namespace,
    tokens: Vec<DescriptorToken>,
    types: LiteralTypeSet,
    pure_wildcard: bool,
}

impl ColumnDescriptor {
    /// Create a descriptor accepting every literal type
    ///
    /// Fails with InvalidArgument if the token list is empty.
    pub fn new(namespace: Namespace, tokens: Vec<DescriptorToken>) -> Result<Arc<Self>> {
        Self::with_types(namespace, tokens, LiteralTypeSet::ALL)
    }

    /// Create a descriptor with an explicit admissible-type mask
    pub fn with_types(
        namespace: Namespace,
        tokens: Vec<DescriptorToken>,
        types: LiteralTypeSet,
    ) -> Result<Arc<Self>> {
        if tokens.is_empty() {
            return Err(Error::invalid_argument(
                "column descriptor requires at least one token",
            ));
        }
        let tokens = collapse_wildcards(tokens);
        let pure_wildcard = tokens.len() == 1 && tokens[0].is_wildcard();
        Ok(Arc::new(Self {
            namespace,
            tokens,
            types,
            pure_wildcard,
        }))
    }

    /// Parse a dot-separated key path into a descriptor
    pub fn from_key_path(namespace: Namespace, path: &str) -> Result<Arc<Self>> {
        let tokens = path.split('.').map(DescriptorToken::from_text).collect();
        Self::new(namespace, tokens)
    }

    /// Copy this descriptor with a narrowed admissible-type mask
    pub fn narrowed(&self, types: LiteralTypeSet) -> Arc<Self> {
        Arc::new(Self {
            namespace: self.namespace,
            tokens: self.tokens.clone(),
            types,
            pure_wildcard: self.pure_wildcard,
        })
    }

    /// The namespace this descriptor queries
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// The token path
    pub fn tokens(&self) -> &[DescriptorToken] {
        &self.tokens
    }

    /// Token at the given cursor position
    pub fn token(&self, index: usize) -> &DescriptorToken {
        &self.tokens[index]
    }

    /// Number of tokens
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// The admissible literal types
    pub fn types(&self) -> LiteralTypeSet {
        self.types
    }

    /// Returns true iff the descriptor is a single wildcard token
    pub fn is_pure_wildcard(&self) -> bool {
        self.pure_wildcard
    }
}

impl fmt::Display for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.namespace)?;
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

/// Identity key for a shared descriptor handle
///
/// Derived from the Arc's pointer, so two clones of one handle share a
/// key while structurally equal descriptors from different filters do
/// not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorId(usize);

impl DescriptorId {
    /// The identity of the given handle
    pub fn of(descriptor: &Arc<ColumnDescriptor>) -> Self {
        DescriptorId(Arc::as_ptr(descriptor) as usize)
    }
}

fn collapse_wildcards(tokens: Vec<DescriptorToken>) -> Vec<DescriptorToken> {
    let mut collapsed = Vec::with_capacity(tokens.len());
    let mut prev_was_wildcard = false;
    for token in tokens {
        if prev_was_wildcard && token.is_wildcard() {
            continue;
        }
        prev_was_wildcard = token.is_wildcard();
        collapsed.push(token);
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LiteralType;

    fn tokens(path: &[&str]) -> Vec<DescriptorToken> {
        path.iter().map(|s| DescriptorToken::from_text(*s)).collect()
    }

    #[test]
    fn test_token_matching() {
        assert!(DescriptorToken::Wildcard.is_wildcard());
        assert!(DescriptorToken::Wildcard.matches_key("anything"));
        let key = DescriptorToken::from_text("level");
        assert!(!key.is_wildcard());
        assert!(key.matches_key("level"));
        assert!(!key.matches_key("Level"));
        assert!(DescriptorToken::from_text("*").is_wildcard());
    }

    #[test]
    fn test_empty_descriptor_rejected() {
        let err = ColumnDescriptor::new(Namespace::UserGen, vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_consecutive_wildcards_collapse() {
        let desc =
            ColumnDescriptor::new(Namespace::UserGen, tokens(&["a", "*", "*", "*", "b"])).unwrap();
        assert_eq!(desc.token_count(), 3);
        assert!(desc.token(1).is_wildcard());
        assert!(!desc.is_pure_wildcard());

        let pure = ColumnDescriptor::new(Namespace::UserGen, tokens(&["*", "*"])).unwrap();
        assert_eq!(pure.token_count(), 1);
        assert!(pure.is_pure_wildcard());
    }

    #[test]
    fn test_pure_wildcard_detection() {
        assert!(ColumnDescriptor::new(Namespace::AutoGen, tokens(&["*"]))
            .unwrap()
            .is_pure_wildcard());
        assert!(!ColumnDescriptor::new(Namespace::AutoGen, tokens(&["*", "a"]))
            .unwrap()
            .is_pure_wildcard());
        assert!(!ColumnDescriptor::new(Namespace::AutoGen, tokens(&["a"]))
            .unwrap()
            .is_pure_wildcard());
    }

    #[test]
    fn test_from_key_path() {
        let desc = ColumnDescriptor::from_key_path(Namespace::UserGen, "a.*.c").unwrap();
        assert_eq!(desc.token_count(), 3);
        assert!(desc.token(1).is_wildcard());
        assert_eq!(desc.to_string(), "user_gen:a.*.c");
    }

    #[test]
    fn test_narrowed_copy_preserves_path() {
        let desc = ColumnDescriptor::from_key_path(Namespace::UserGen, "x.y").unwrap();
        let narrowed = desc.narrowed(LiteralType::Integer.into());
        assert_eq!(narrowed.tokens(), desc.tokens());
        assert_eq!(narrowed.namespace(), desc.namespace());
        assert_eq!(narrowed.types(), LiteralType::Integer.into());
        assert_eq!(desc.types(), LiteralTypeSet::ALL);
    }

    #[test]
    fn test_identity_keys() {
        let a = ColumnDescriptor::from_key_path(Namespace::UserGen, "x").unwrap();
        let b = ColumnDescriptor::from_key_path(Namespace::UserGen, "x").unwrap();
        let a2 = Arc::clone(&a);
        assert_eq!(DescriptorId::of(&a), DescriptorId::of(&a2));
        assert_ne!(DescriptorId::of(&a), DescriptorId::of(&b));
    }
}
