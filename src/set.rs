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

//! Canonical, duplicate-free host sets

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{HostlistError, Result};
use crate::list::{HostList, RangeList};

/// A host list kept sorted, deduplicated and merged after every change
///
/// # Examples
///
/// ```rust
/// use hostlist::HostSet;
///
/// let set = HostSet::create("node[3-4],node1,node2,node4").unwrap();
/// assert_eq!(set.to_string(), "node[1-4]");
/// assert_eq!(set.insert("node[4-6]").unwrap(), 2);
/// assert!(set.contains("node6"));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HostSet {
    list: HostList,
}

impl HostSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a host list expression into canonical form
    pub fn create(input: &str) -> Result<Self> {
        Ok(Self::from_ranges(RangeList::parse(input)?))
    }

    /// Like [`create`](Self::create) but panics on invalid input
    pub fn must_create(input: &str) -> Self {
        Self::create(input).unwrap_or_else(|e| panic!("invalid host set {input:?}: {e}"))
    }

    pub(crate) fn from_ranges(mut ranges: RangeList) -> Self {
        ranges.uniq();
        Self {
            list: HostList::from_ranges(ranges),
        }
    }

    /// Number of distinct hosts
    pub fn count(&self) -> usize {
        self.list.count()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Add the hosts named by `hosts`, returning how many were not already present
    pub fn insert(&self, hosts: &str) -> Result<usize> {
        let parsed = RangeList::parse(hosts)?;

        let mut inner = self.list.write();
        let before = inner.count();
        inner.push_list(&parsed);
        inner.uniq();
        Ok(inner.count() - before)
    }

    /// Remove the hosts named by `hosts`, returning how many were present
    pub fn delete(&self, hosts: &str) -> Result<usize> {
        let parsed = RangeList::parse(hosts)?;

        let mut inner = self.list.write();
        let removed = inner.delete(&parsed)?;
        inner.uniq();
        Ok(removed)
    }

    /// Add every host of `other`
    pub fn merge_set(&self, other: &HostSet) {
        if std::ptr::eq(self, other) {
            return;
        }

        let ranges = other.list.snapshot();
        let mut inner = self.list.write();
        inner.push_list(&ranges);
        inner.uniq();
    }

    /// Replace the contents with those of `other`
    pub fn replace_set(&self, other: &HostSet) {
        self.list.replace_list(&other.list);
        self.list.uniq();
    }

    /// Whether `host` is a member
    pub fn contains(&self, host: &str) -> bool {
        self.list.find(host).is_some()
    }

    /// Whether every host named by `hosts` is a member
    pub fn within(&self, hosts: &str) -> Result<bool> {
        self.list.within(hosts)
    }

    /// Members also named by `hosts`
    pub fn intersects(&self, hosts: &str) -> Result<HostSet> {
        let parsed = RangeList::parse(hosts)?;
        let common = self.list.read().intersection(&parsed);
        Ok(Self::from_ranges(common))
    }

    /// Bracketed form, e.g. `node[1-4]`
    pub fn ranged_string(&self) -> String {
        self.list.ranged_string()
    }

    /// Fully expanded, comma-separated form
    pub fn deranged_string(&self) -> String {
        self.list.deranged_string()
    }

    /// Every member in canonical order
    pub fn slice(&self) -> Vec<String> {
        self.list.slice()
    }
}

impl fmt::Display for HostSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ranged_string())
    }
}

impl FromStr for HostSet {
    type Err = HostlistError;

    fn from_str(s: &str) -> Result<Self> {
        Self::create(s)
    }
}

impl Serialize for HostSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.ranged_string())
    }
}

impl<'de> Deserialize<'de> for HostSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::create(&s).map_err(serde::de::Error::custom)
    }
}
