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

//! Projected key paths
//!
//! A projection names the literal key paths a caller wants reported as
//! soon as they appear in the schema. Each path is backed by an internal
//! column descriptor used only for resolution, never for evaluation.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::core::{Error, Namespace, Result};
use crate::search::descriptor::{ColumnDescriptor, DescriptorToken};

/// A literal (wildcard-free) key path to project, in tokenized form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedKeyPath {
    pub namespace: Namespace,
    pub tokens: Vec<String>,
}

impl ProjectedKeyPath {
    /// Create a projected key path
    pub fn new(namespace: Namespace, tokens: Vec<String>) -> Self {
        Self { namespace, tokens }
    }

    /// The dot-joined form reported back to the handler
    pub fn joined(&self) -> String {
        self.tokens.join(".")
    }
}

/// The validated set of projected columns
#[derive(Debug, Default)]
pub struct Projection {
    columns: Vec<(Arc<ColumnDescriptor>, Arc<str>)>,
}

impl Projection {
    /// An empty projection (nothing is reported)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate and compile a list of projected key paths
    ///
    /// Fails with InvalidArgument on an empty path, a wildcard token, or
    /// a duplicate path.
    pub fn new(paths: Vec<ProjectedKeyPath>) -> Result<Self> {
        let mut seen: FxHashSet<(Namespace, String)> = FxHashSet::default();
        let mut columns = Vec::with_capacity(paths.len());
        for path in paths {
            if path.tokens.is_empty() {
                return Err(Error::invalid_argument("empty projected key path"));
            }
            if path.tokens.iter().any(|token| token == "*") {
                return Err(Error::invalid_argument(format!(
                    "projected key path '{}' contains a wildcard",
                    path.joined()
                )));
            }
            let joined = path.joined();
            if !seen.insert((path.namespace, joined.clone())) {
                return Err(Error::invalid_argument(format!(
                    "duplicate projected key path '{}'",
                    joined
                )));
            }
            let tokens = path
                .tokens
                .iter()
                .map(|token| DescriptorToken::Key(token.clone()))
                .collect();
            let descriptor = ColumnDescriptor::new(path.namespace, tokens)?;
            columns.push((descriptor, Arc::from(joined.as_str())));
        }
        Ok(Self { columns })
    }

    /// The compiled projection columns with their original paths
    pub fn columns(&self) -> &[(Arc<ColumnDescriptor>, Arc<str>)] {
        &self.columns
    }

    /// Returns true if nothing is projected
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of projected paths
    pub fn len(&self) -> usize {
        self.columns.len()
    }
}
