// Copyright 2025 Lablup Inc. and Jeongkyu Shin
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

//! Error types for host list parsing and manipulation

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, HostlistError>;

/// Errors that can occur while parsing or mutating host lists
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostlistError {
    /// Token matches no recognized host name pattern (e.g., `123`)
    #[error("invalid hostname {hostname:?}")]
    InvalidHostname { hostname: String },

    /// Malformed bracket expression (e.g., `node[5-1]`, `node[1-3`)
    #[error("invalid range {range:?}: {reason}")]
    InvalidRange { range: String, reason: String },

    /// Operation needs at least one host
    #[error("hostlist is empty")]
    Empty,

    /// Named host is not a member of the list
    #[error("host {host:?} not found")]
    NotFound { host: String },

    /// Index past the end of the list
    #[error("index {index} out of range (list has {count} hosts)")]
    IndexOutOfRange { index: usize, count: usize },

    /// Numeric list not enclosed in `[...]`
    #[error("numeric list {input:?} must be enclosed in brackets")]
    NumericNotBracketed { input: String },

    /// Numeric list containing letters
    #[error("unexpected alphabetic character(s) in numeric list {input:?}")]
    NumericAlphabetic { input: String },

    /// Numeric list containing whitespace
    #[error("unexpected whitespace in numeric list {input:?}")]
    NumericWhitespace { input: String },

    /// Another error with added context; the message already includes it
    #[error("{context}: {inner}")]
    Context {
        context: String,
        inner: Box<HostlistError>,
    },
}

impl HostlistError {
    pub(crate) fn invalid_range(range: &str, reason: impl Into<String>) -> Self {
        HostlistError::InvalidRange {
            range: range.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_hostname(hostname: &str) -> Self {
        HostlistError::InvalidHostname {
            hostname: hostname.to_string(),
        }
    }

    /// Wrap this error with a description of what was being attempted
    pub fn context(self, context: impl Into<String>) -> Self {
        HostlistError::Context {
            context: context.into(),
            inner: Box::new(self),
        }
    }

    /// The innermost error, skipping any context wrappers
    pub fn root(&self) -> &HostlistError {
        match self {
            HostlistError::Context { inner, .. } => inner.root(),
            other => other,
        }
    }
}
