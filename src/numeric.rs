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

//! Numeric lists and sets such as `[0-3,7]`
//!
//! These reuse the host list machinery with an empty prefix and suffix.
//! Input must be exactly one bracket expression; letters and whitespace
//! are rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{HostlistError, Result};
use crate::list::{HostList, RangeList};
use crate::parser::{parse_bracketed_host_list, LIST_SEPARATORS, RANGE_OPERATOR};
use crate::range::HostRange;

fn validate_numeric(input: &str) -> Result<()> {
    if !(input.starts_with('[') && input.ends_with(']')) {
        return Err(HostlistError::NumericNotBracketed {
            input: input.to_string(),
        });
    }
    if input.chars().any(char::is_alphabetic) {
        return Err(HostlistError::NumericAlphabetic {
            input: input.to_string(),
        });
    }
    if input.chars().any(char::is_whitespace) {
        return Err(HostlistError::NumericWhitespace {
            input: input.to_string(),
        });
    }

    let inner = &input[1..input.len() - 1];
    if inner.contains(&['[', ']'][..]) {
        return Err(HostlistError::invalid_range(
            input,
            "expected a single bracket expression",
        ));
    }
    Ok(())
}

fn parse_numeric(input: &str) -> Result<RangeList> {
    if input.is_empty() {
        return Ok(RangeList::default());
    }
    validate_numeric(input)?;
    parse_bracketed_host_list(input, LIST_SEPARATORS, RANGE_OPERATOR, true)
}

fn values(ranges: &RangeList) -> Vec<u64> {
    ranges
        .ranges()
        .iter()
        .flat_map(|range| range.lo()..=range.hi())
        .collect()
}

fn ranged_string(ranges: &RangeList) -> String {
    if ranges.is_empty() {
        return String::new();
    }
    let items: Vec<String> = ranges.ranges().iter().map(HostRange::num_str).collect();
    format!("[{}]", items.join(","))
}

fn deranged_string(ranges: &RangeList) -> String {
    values(ranges)
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn delete_value(ranges: &mut RangeList, num: u64) -> bool {
    match ranges.find_value(num) {
        Some(index) => ranges.delete_nth(index).is_ok(),
        None => false,
    }
}

/// An ordered, possibly duplicated list of numbers
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NumericList {
    list: HostList,
}

impl NumericList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a bracketed numeric expression such as `[0-3,7]`
    pub fn create(input: &str) -> Result<Self> {
        let ranges = parse_numeric(input)
            .map_err(|e| e.context(format!("creating numeric list from {input:?}")))?;
        Ok(Self {
            list: HostList::from_ranges(ranges),
        })
    }

    pub fn count(&self) -> usize {
        self.list.count()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Append a value
    pub fn add(&self, num: u64) {
        self.list.write().push_range(HostRange::numeric(num, num));
    }

    /// Remove the first occurrence of a value, returning whether it was present
    pub fn delete(&self, num: u64) -> bool {
        delete_value(&mut self.list.write(), num)
    }

    pub fn contains(&self, num: u64) -> bool {
        self.list.read().find_value(num).is_some()
    }

    /// Append every value of `other`
    pub fn merge(&self, other: &NumericList) {
        self.list.push_list(&other.list);
    }

    /// Replace the contents with those of `other`
    pub fn replace(&self, other: &NumericList) {
        self.list.replace_list(&other.list);
    }

    /// Every value in list order
    pub fn slice(&self) -> Vec<u64> {
        values(&self.list.read())
    }

    /// Bracketed form, e.g. `[0-3,7]`
    pub fn ranged_string(&self) -> String {
        ranged_string(&self.list.read())
    }

    /// Every value spelled out, e.g. `0,1,2,3,7`
    pub fn deranged_string(&self) -> String {
        deranged_string(&self.list.read())
    }
}

impl fmt::Display for NumericList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ranged_string())
    }
}

impl FromStr for NumericList {
    type Err = HostlistError;

    fn from_str(s: &str) -> Result<Self> {
        Self::create(s)
    }
}

impl Serialize for NumericList {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.ranged_string())
    }
}

impl<'de> Deserialize<'de> for NumericList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::create(&s).map_err(serde::de::Error::custom)
    }
}

/// A sorted, duplicate-free set of numbers
///
/// # Examples
///
/// ```rust
/// use hostlist::NumericSet;
///
/// let ranks = NumericSet::create("[5,0-3,2]").unwrap();
/// assert_eq!(ranks.to_string(), "[0-3,5]");
/// ranks.add(4);
/// assert_eq!(ranks.to_string(), "[0-5]");
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NumericSet {
    list: HostList,
}

impl NumericSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a bracketed numeric expression into canonical form
    pub fn create(input: &str) -> Result<Self> {
        let mut ranges = parse_numeric(input)
            .map_err(|e| e.context(format!("creating numeric set from {input:?}")))?;
        ranges.uniq();
        Ok(Self {
            list: HostList::from_ranges(ranges),
        })
    }

    /// Like [`create`](Self::create) but panics on invalid input
    pub fn must_create(input: &str) -> Self {
        Self::create(input).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Build a set from individual values
    pub fn from_values(values: impl IntoIterator<Item = u64>) -> Self {
        let mut ranges = RangeList::default();
        for num in values {
            ranges.push_range(HostRange::numeric(num, num));
        }
        ranges.uniq();
        Self {
            list: HostList::from_ranges(ranges),
        }
    }

    pub fn count(&self) -> usize {
        self.list.count()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Add a value; adding an existing member is a no-op
    pub fn add(&self, num: u64) {
        let mut inner = self.list.write();
        inner.push_range(HostRange::numeric(num, num));
        inner.uniq();
    }

    /// Remove a value, returning whether it was a member
    pub fn delete(&self, num: u64) -> bool {
        let mut inner = self.list.write();
        let removed = delete_value(&mut inner, num);
        inner.uniq();
        removed
    }

    pub fn contains(&self, num: u64) -> bool {
        self.list.read().find_value(num).is_some()
    }

    /// Add every member of `other`
    pub fn merge(&self, other: &NumericSet) {
        if std::ptr::eq(self, other) {
            return;
        }

        let ranges = other.list.snapshot();
        let mut inner = self.list.write();
        inner.push_list(&ranges);
        inner.uniq();
    }

    /// Replace the contents with those of `other`
    pub fn replace(&self, other: &NumericSet) {
        self.list.replace_list(&other.list);
        self.list.uniq();
    }

    /// Every member in ascending order
    pub fn slice(&self) -> Vec<u64> {
        values(&self.list.read())
    }

    /// Bracketed form, e.g. `[0-3,7]`
    pub fn ranged_string(&self) -> String {
        ranged_string(&self.list.read())
    }

    /// Every member spelled out, e.g. `0,1,2,3,7`
    pub fn deranged_string(&self) -> String {
        deranged_string(&self.list.read())
    }
}

impl fmt::Display for NumericSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ranged_string())
    }
}

impl FromStr for NumericSet {
    type Err = HostlistError;

    fn from_str(s: &str) -> Result<Self> {
        Self::create(s)
    }
}

impl Serialize for NumericSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.ranged_string())
    }
}

impl<'de> Deserialize<'de> for NumericSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::create(&s).map_err(serde::de::Error::custom)
    }
}
