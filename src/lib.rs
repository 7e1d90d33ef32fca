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

//! Compact host list expressions with list and set algebra
//!
//! Host names that share a prefix and suffix are stored as numeric ranges
//! rather than expanded one by one, so lists like `node[1-4096]` stay small.
//!
//! # Syntax
//!
//! - Plain hosts: `login`, `node7`, `10.0.0.5`
//! - Ranges: `node[1-5]` -> `node1, node2, node3, node4, node5`
//! - Zero padding: `node[01-03]` -> `node01, node02, node03`
//! - Mixed items: `node[1-3,7,9-10]`
//! - Suffixes: `10.5.1.[10-15]:10001`
//! - Several brackets: `rack[2-4]node[01-20].dc1`
//! - Separators between tokens: comma, space or tab
//!
//! # Examples
//!
//! ```rust
//! assert_eq!(
//!     hostlist::expand("quartz[4-8]").unwrap(),
//!     "quartz4,quartz5,quartz6,quartz7,quartz8"
//! );
//! assert_eq!(hostlist::compress("node1,node2,node3,node4").unwrap(), "node[1-4]");
//! assert_eq!(hostlist::count("node[1-4],node[1-4]").unwrap(), 4);
//! ```

pub mod cli;
pub mod error;
pub mod groups;
pub mod list;
pub mod numeric;
mod parser;
pub mod range;
pub mod set;
pub mod utils;

pub use error::{HostlistError, Result};
pub use groups::HostGroups;
pub use list::HostList;
pub use numeric::{NumericList, NumericSet};
pub use parser::MAX_TOKEN_PREFIXES;
pub use range::{HostRange, MAX_RANGE};
pub use set::HostSet;

/// Expand `hosts` into its canonical, fully spelled out form
pub fn expand(hosts: &str) -> Result<String> {
    Ok(HostSet::create(hosts)?.deranged_string())
}

/// Compress `hosts` into its canonical bracketed form
pub fn compress(hosts: &str) -> Result<String> {
    Ok(HostSet::create(hosts)?.ranged_string())
}

/// Number of distinct hosts named by `hosts`
pub fn count(hosts: &str) -> Result<usize> {
    Ok(HostSet::create(hosts)?.count())
}

/// Parse an order-preserving host list
pub fn create(hosts: &str) -> Result<HostList> {
    HostList::create(hosts)
}

/// Parse an order-preserving host list, panicking on invalid input
pub fn must_create(hosts: &str) -> HostList {
    HostList::must_create(hosts)
}

/// Parse a canonical host set
pub fn create_set(hosts: &str) -> Result<HostSet> {
    HostSet::create(hosts)
}

/// Parse a canonical host set, panicking on invalid input
pub fn must_create_set(hosts: &str) -> HostSet {
    HostSet::must_create(hosts)
}

/// Parse a bracketed numeric list such as `[0-3,7]`
pub fn create_numeric_list(input: &str) -> Result<NumericList> {
    NumericList::create(input)
}

/// Parse a bracketed numeric set such as `[0-3,7]`
pub fn create_numeric_set(input: &str) -> Result<NumericSet> {
    NumericSet::create(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand() {
        assert_eq!(
            expand("quartz[4-8]").unwrap(),
            "quartz4,quartz5,quartz6,quartz7,quartz8"
        );
        assert_eq!(expand("n2,n1,n2").unwrap(), "n1,n2");
        assert_eq!(expand("").unwrap(), "");
    }

    #[test]
    fn test_compress() {
        assert_eq!(compress("node1,node2,node3,node4").unwrap(), "node[1-4]");
        assert_eq!(
            compress("rack[1-2]node[1-2]").unwrap(),
            "rack1node[1-2],rack2node[1-2]"
        );
    }

    #[test]
    fn test_count_collapses_duplicates() {
        assert_eq!(count("node[1-4],node[1-4]").unwrap(), 4);
    }

    #[test]
    fn test_invalid_input_is_reported() {
        assert!(matches!(
            count("node[4-1]"),
            Err(HostlistError::InvalidRange { .. })
        ));
        assert!(matches!(
            compress("123"),
            Err(HostlistError::InvalidHostname { .. })
        ));
    }

    #[test]
    #[should_panic]
    fn test_must_create_set_panics() {
        must_create_set("node[1-");
    }

    #[test]
    fn test_create_entry_points() {
        assert_eq!(create("b1,a1").unwrap().to_string(), "b1,a1");
        assert_eq!(must_create("b1").count(), 1);
        assert_eq!(create_set("b1,a1").unwrap().to_string(), "a1,b1");
        assert_eq!(create_numeric_list("[3,1]").unwrap().slice(), vec![3, 1]);
        assert_eq!(create_numeric_set("[3,1]").unwrap().slice(), vec![1, 3]);
    }
}
