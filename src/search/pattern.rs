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

//! Wildcard pattern matching for string operands
//!
//! Query string operands use wildcard syntax:
//! - `*` matches any run of characters (including empty)
//! - `?` matches exactly one character
//!
//! Patterns are compiled once to anchored regexes and reused for every
//! evaluated event.

use regex::Regex;

use crate::core::{Error, Result};

/// A compiled wildcard pattern
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    pattern: String,
    regex: Regex,
    case_insensitive: bool,
}

impl WildcardPattern {
    /// Compile a wildcard pattern
    pub fn compile(pattern: &str, case_insensitive: bool) -> Result<Self> {
        // Build regex pattern character by character; % and _ have no
        // special meaning here, only * and ?
        let mut regex_pattern = String::with_capacity(pattern.len() * 2);
        regex_pattern.push('^');

        for c in pattern.chars() {
            match c {
                '*' => regex_pattern.push_str(".*"),
                '?' => regex_pattern.push('.'),
                // Escape regex special characters
                '.' | '+' | '^' | '$' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\' => {
                    regex_pattern.push('\\');
                    regex_pattern.push(c);
                }
                _ => regex_pattern.push(c),
            }
        }

        regex_pattern.push('$');

        let regex_str = if case_insensitive {
            format!("(?i){}", regex_pattern)
        } else {
            regex_pattern
        };

        let regex = Regex::new(&regex_str)
            .map_err(|e| Error::invalid_argument(format!("bad wildcard pattern: {}", e)))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            case_insensitive,
        })
    }

    /// Check if a string matches the pattern
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The source wildcard pattern
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the pattern matches case-insensitively
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Returns true if the pattern matches every string
    ///
    /// Such a pattern carries no value information; filters built on it
    /// reduce to presence checks.
    pub fn is_match_all(pattern: &str) -> bool {
        !pattern.is_empty() && pattern.chars().all(|c| c == '*')
    }
}
