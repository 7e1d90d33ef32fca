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

//! Ordered host lists
//!
//! [`HostList`] keeps hosts in insertion order and may hold duplicates until
//! [`HostList::uniq`] is called. The range bookkeeping lives in
//! [`RangeList`]; `HostList` adds a read-write lock so a shared instance can
//! be used from several threads.

use std::fmt;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::{HostlistError, Result};
use crate::parser::{parse_bracketed_host_list, parse_host_name, LIST_SEPARATORS, RANGE_OPERATOR};
use crate::range::{HostRange, Removal};

/// Unlocked sequence of ranges with a running host count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RangeList {
    ranges: Vec<HostRange>,
    host_count: usize,
}

impl RangeList {
    pub fn parse(input: &str) -> Result<Self> {
        parse_bracketed_host_list(input, LIST_SEPARATORS, RANGE_OPERATOR, false)
    }

    pub fn ranges(&self) -> &[HostRange] {
        &self.ranges
    }

    pub fn count(&self) -> usize {
        self.host_count
    }

    pub fn is_empty(&self) -> bool {
        self.host_count == 0
    }

    /// Append a range, extending the tail instead when it continues directly
    pub fn push_range(&mut self, mut range: HostRange) {
        self.host_count += range.count();

        if let Some(tail) = self.ranges.last_mut() {
            if tail.can_append(&mut range) {
                tail.append(&range);
                return;
            }
        }
        self.ranges.push(range);
    }

    pub fn push_host(&mut self, name: &str) -> Result<()> {
        let host = parse_host_name(name)?;
        self.push_range(host.into_range(name));
        Ok(())
    }

    pub fn push_list(&mut self, other: &RangeList) {
        for range in &other.ranges {
            self.push_range(range.clone());
        }
    }

    /// Sort into canonical order and merge overlapping or adjacent ranges.
    ///
    /// Runs are first split where their zero padding ends, so a value such as
    /// `node10` lands next to every other spelling of it (`node[08-12]`,
    /// `node[9-11]`) no matter which width it was parsed with.
    pub fn uniq(&mut self) {
        if self.ranges.is_empty() {
            return;
        }

        let mut ranges: Vec<HostRange> = self
            .ranges
            .drain(..)
            .flat_map(|range| {
                let (head, tail) = range.split_padding();
                std::iter::once(head).chain(tail)
            })
            .collect();
        ranges.sort();

        let mut merged: Vec<HostRange> = Vec::with_capacity(ranges.len());
        let mut duplicates = 0;
        for mut range in ranges {
            if let Some(last) = merged.last_mut() {
                if let Some(dups) = last.join(&mut range) {
                    duplicates += dups;
                    continue;
                }
            }
            merged.push(range);
        }
        rejoin_padding(&mut merged);

        self.ranges = merged;
        self.host_count -= duplicates;
        if duplicates > 0 {
            debug!(duplicates, hosts = self.host_count, "removed duplicate hosts");
        }
    }

    pub fn pop(&mut self) -> Result<String> {
        let Some(tail) = self.ranges.last_mut() else {
            return Err(HostlistError::Empty);
        };

        let host = if tail.count() > 1 {
            tail.pop_host()
        } else {
            let host = tail.nth_host(0);
            self.ranges.pop();
            host
        };
        self.host_count -= 1;
        Ok(host)
    }

    pub fn shift(&mut self) -> Result<String> {
        let Some(head) = self.ranges.first_mut() else {
            return Err(HostlistError::Empty);
        };

        let host = if head.count() > 1 {
            head.shift_host()
        } else {
            let host = head.nth_host(0);
            self.ranges.remove(0);
            host
        };
        self.host_count -= 1;
        Ok(host)
    }

    pub fn pop_range(&mut self) -> Result<String> {
        let range = self.ranges.pop().ok_or(HostlistError::Empty)?;
        self.host_count -= range.count();
        Ok(range.to_string())
    }

    pub fn shift_range(&mut self) -> Result<String> {
        if self.ranges.is_empty() {
            return Err(HostlistError::Empty);
        }
        let range = self.ranges.remove(0);
        self.host_count -= range.count();
        Ok(range.to_string())
    }

    pub fn nth(&self, index: usize) -> Result<String> {
        let mut offset = index;
        for range in &self.ranges {
            let count = range.count();
            if offset < count {
                return Ok(range.nth_host(offset));
            }
            offset -= count;
        }

        Err(HostlistError::IndexOutOfRange {
            index,
            count: self.host_count,
        })
    }

    /// Absolute index of `name`, if present
    pub fn find(&self, name: &str) -> Option<usize> {
        let mut base = 0;
        for range in &self.ranges {
            if let Some(offset) = range.contains_host(name) {
                return Some(base + offset);
            }
            base += range.count();
        }
        None
    }

    /// Absolute index of bare numeric value `num`, if present
    pub fn find_value(&self, num: u64) -> Option<usize> {
        let mut base = 0;
        for range in &self.ranges {
            if let Some(offset) = range.contains_value(num) {
                return Some(base + offset);
            }
            base += range.count();
        }
        None
    }

    pub fn delete_nth(&mut self, index: usize) -> Result<()> {
        let mut offset = index;
        for idx in 0..self.ranges.len() {
            let count = self.ranges[idx].count();
            if offset >= count {
                offset -= count;
                continue;
            }

            let num = self.ranges[idx].lo() + offset as u64;
            match self.ranges[idx].delete_host(num) {
                Removal::Emptied => {
                    self.ranges.remove(idx);
                }
                Removal::Shrunk => {}
                Removal::Split(tail) => self.ranges.insert(idx + 1, tail),
            }
            self.host_count -= 1;
            return Ok(());
        }

        Err(HostlistError::IndexOutOfRange {
            index,
            count: self.host_count,
        })
    }

    pub fn delete_host(&mut self, name: &str) -> Result<()> {
        let index = self.find(name).ok_or_else(|| HostlistError::NotFound {
            host: name.to_string(),
        })?;
        self.delete_nth(index)
    }

    /// Remove every host of `other` that is present, returning how many were removed
    pub fn delete(&mut self, other: &RangeList) -> Result<usize> {
        if self.is_empty() {
            return Err(HostlistError::Empty);
        }

        let mut scratch = other.clone();
        let mut removed = 0;
        while let Ok(host) = scratch.pop() {
            match self.delete_host(&host) {
                Ok(()) => removed += 1,
                Err(HostlistError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        debug!(removed, remaining = self.host_count, "deleted hosts");
        Ok(removed)
    }

    /// Whether every host of `other` is present
    pub fn within(&self, other: &RangeList) -> bool {
        other.hosts().all(|host| self.find(&host).is_some())
    }

    /// Hosts of `other` that are also present, in `other`'s order
    pub fn intersection(&self, other: &RangeList) -> RangeList {
        let mut result = RangeList::default();
        for range in &other.ranges {
            for num in range.lo()..=range.hi() {
                if self.find(&range.host_name(num)).is_some() {
                    result.push_range(range.slice_at(num));
                }
            }
        }
        result
    }

    pub fn hosts(&self) -> impl Iterator<Item = String> + '_ {
        self.ranges.iter().flat_map(|range| range.hosts())
    }

    /// Bracketed form, e.g. `node[1-4,7],login`
    pub fn ranged_string(&self) -> String {
        let mut out = String::new();
        let mut idx = 0;

        while idx < self.ranges.len() {
            if idx > 0 {
                out.push(',');
            }

            let first = &self.ranges[idx];
            let bracketed = first.count() > 1
                || self
                    .ranges
                    .get(idx + 1)
                    .is_some_and(|next| first.within(next));
            idx += 1;

            if !bracketed {
                out.push_str(&first.to_string());
                continue;
            }

            let mut nums = vec![first.num_str()];
            while let Some(next) = self.ranges.get(idx) {
                if !first.within(next) {
                    break;
                }
                nums.push(next.num_str());
                idx += 1;
            }

            out.push_str(first.prefix());
            out.push('[');
            out.push_str(&nums.join(","));
            out.push(']');
            out.push_str(first.suffix());
        }

        out
    }

    /// Every host spelled out, comma separated
    pub fn deranged_string(&self) -> String {
        self.hosts().collect::<Vec<_>>().join(",")
    }
}

/// Reattach each padded run to the unpadded run that continues it, undoing
/// the split made by [`RangeList::uniq`] where the two print as one range
fn rejoin_padding(ranges: &mut Vec<HostRange>) {
    let mut idx = 0;
    while idx < ranges.len() {
        let continuation = ranges
            .iter()
            .position(|other| ranges[idx].continues_padding(other));
        if let Some(pos) = continuation {
            let tail = ranges.remove(pos);
            if pos < idx {
                idx -= 1;
            }
            ranges[idx].append(&tail);
        }
        idx += 1;
    }
}

/// An ordered, possibly duplicated list of hosts
///
/// # Examples
///
/// ```rust
/// use hostlist::HostList;
///
/// let list = HostList::create("node[1-3],login").unwrap();
/// assert_eq!(list.count(), 4);
/// assert_eq!(list.pop().unwrap(), "login");
/// assert_eq!(list.to_string(), "node[1-3]");
/// ```
#[derive(Debug, Default)]
pub struct HostList {
    inner: RwLock<RangeList>,
}

impl HostList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a host list expression, keeping input order and duplicates
    pub fn create(input: &str) -> Result<Self> {
        Ok(Self::from_ranges(RangeList::parse(input)?))
    }

    /// Like [`create`](Self::create) but panics on invalid input
    pub fn must_create(input: &str) -> Self {
        Self::create(input).unwrap_or_else(|e| panic!("invalid host list {input:?}: {e}"))
    }

    pub(crate) fn from_ranges(ranges: RangeList) -> Self {
        Self {
            inner: RwLock::new(ranges),
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, RangeList> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, RangeList> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn snapshot(&self) -> RangeList {
        self.read().clone()
    }

    /// Number of hosts, counting duplicates
    pub fn count(&self) -> usize {
        self.read().count()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Parse `input` and append its hosts, returning how many were appended
    pub fn push(&self, input: &str) -> Result<usize> {
        let parsed = RangeList::parse(input)?;
        self.write().push_list(&parsed);
        Ok(parsed.count())
    }

    /// Append a single host name
    pub fn push_host(&self, name: &str) -> Result<()> {
        self.write().push_host(name)
    }

    /// Append every range of `other`
    ///
    /// `other` is copied before this list is locked, so at most one lock is
    /// held at a time and `list.push_list(&list)` doubles the list.
    pub fn push_list(&self, other: &HostList) {
        let ranges = other.snapshot();
        self.write().push_list(&ranges);
    }

    /// Replace the contents with a copy of `other`
    pub fn replace_list(&self, other: &HostList) {
        if std::ptr::eq(self, other) {
            return;
        }

        let ranges = other.snapshot();
        *self.write() = ranges;
    }

    /// Sort, deduplicate and merge into canonical form
    pub fn uniq(&self) {
        self.write().uniq();
    }

    /// Remove and return the last host
    pub fn pop(&self) -> Result<String> {
        self.write().pop()
    }

    /// Remove and return the first host
    pub fn shift(&self) -> Result<String> {
        self.write().shift()
    }

    /// Remove the last range, returned in bracketed form
    pub fn pop_range(&self) -> Result<String> {
        self.write().pop_range()
    }

    /// Remove the first range, returned in bracketed form
    pub fn shift_range(&self) -> Result<String> {
        self.write().shift_range()
    }

    /// Host at zero-based `index`
    pub fn nth(&self, index: usize) -> Result<String> {
        self.read().nth(index)
    }

    /// Zero-based index of `name`, if present
    pub fn find(&self, name: &str) -> Option<usize> {
        self.read().find(name)
    }

    pub fn delete_nth(&self, index: usize) -> Result<()> {
        self.write().delete_nth(index)
    }

    /// Remove one host by name, failing with [`HostlistError::NotFound`] if absent
    pub fn delete_host(&self, name: &str) -> Result<()> {
        self.write().delete_host(name)
    }

    /// Remove every host named by `hosts`; absent hosts are skipped.
    /// Returns the number of hosts removed.
    pub fn delete(&self, hosts: &str) -> Result<usize> {
        let parsed = RangeList::parse(hosts)?;
        self.write().delete(&parsed)
    }

    /// Whether every host named by `hosts` is in this list
    pub fn within(&self, hosts: &str) -> Result<bool> {
        let parsed = RangeList::parse(hosts)?;
        Ok(self.read().within(&parsed))
    }

    /// Hosts named by `hosts` that are also in this list
    pub fn intersects(&self, hosts: &str) -> Result<HostList> {
        let parsed = RangeList::parse(hosts)?;
        Ok(Self::from_ranges(self.read().intersection(&parsed)))
    }

    /// Bracketed form, e.g. `node[1-4]`
    pub fn ranged_string(&self) -> String {
        self.read().ranged_string()
    }

    /// Fully expanded, comma-separated form
    pub fn deranged_string(&self) -> String {
        self.read().deranged_string()
    }

    /// Every host name in list order
    pub fn slice(&self) -> Vec<String> {
        self.read().hosts().collect()
    }
}

impl Clone for HostList {
    fn clone(&self) -> Self {
        Self::from_ranges(self.snapshot())
    }
}

impl PartialEq for HostList {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        let ours = self.read();
        let theirs = other.read();
        ours.count() == theirs.count() && ours.hosts().eq(theirs.hosts())
    }
}

impl Eq for HostList {}

impl fmt::Display for HostList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ranged_string())
    }
}

impl FromStr for HostList {
    type Err = HostlistError;

    fn from_str(s: &str) -> Result<Self> {
        Self::create(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let list = HostList::default();
        assert!(list.is_empty());
        assert_eq!(list.count(), 0);
        assert_eq!(list.to_string(), "");
        assert_eq!(list.pop(), Err(HostlistError::Empty));
        assert_eq!(list.shift(), Err(HostlistError::Empty));
        assert_eq!(list.pop_range(), Err(HostlistError::Empty));
        assert_eq!(list.shift_range(), Err(HostlistError::Empty));
    }

    #[test]
    fn test_create_keeps_order_and_duplicates() {
        let list = HostList::create("node[5-6],node[1-2],node5").unwrap();
        assert_eq!(list.count(), 5);
        assert_eq!(list.to_string(), "node[5-6,1-2,5]");
    }

    #[test]
    fn test_push_appends_contiguous_hosts() {
        let list = HostList::new();
        for host in ["node1", "node2", "node3", "node4"] {
            list.push_host(host).unwrap();
        }
        assert_eq!(list.read().ranges().len(), 1);
        assert_eq!(list.to_string(), "node[1-4]");
    }

    #[test]
    fn test_push_returns_added_count() {
        let list = HostList::must_create("node1");
        assert_eq!(list.push("node[2-5],login").unwrap(), 5);
        assert_eq!(list.count(), 6);
        assert_eq!(list.to_string(), "node[1-5],login");
    }

    #[test]
    fn test_ranged_string_groups_adjacent_ranges() {
        let list = HostList::create("node1,node3,node[5-7].ib,login,gw[1-2]").unwrap();
        assert_eq!(list.to_string(), "node[1,3],node[5-7].ib,login,gw[1-2]");
    }

    #[test]
    fn test_ranged_string_separates_incompatible_widths() {
        let list = HostList::create("node[001-009],node[10-20]").unwrap();
        assert_eq!(list.to_string(), "node[001-009],node[10-20]");

        let list = HostList::create("node[1-4],node[10-20],node[08-09]").unwrap();
        assert_eq!(list.to_string(), "node[1-4,10-20],node[08-09]");
    }

    #[test]
    fn test_deranged_string() {
        let list = HostList::create("n[8-10],login").unwrap();
        assert_eq!(list.deranged_string(), "n8,n9,n10,login");
    }

    #[test]
    fn test_uniq_sorts_and_merges() {
        let list = HostList::create("node[5-8],node[1-4],node[3-6],login,login").unwrap();
        assert_eq!(list.count(), 14);

        list.uniq();
        assert_eq!(list.count(), 9);
        assert_eq!(list.to_string(), "login,node[1-8]");
    }

    #[test]
    fn test_uniq_is_idempotent() {
        let list = HostList::create("b[3-9],a2,b[1-4],b[010-012],b[7-11],a2").unwrap();
        list.uniq();
        let first = (list.to_string(), list.count());
        list.uniq();
        assert_eq!((list.to_string(), list.count()), first);
        assert_eq!(first, ("a2,b[1-11],b[010-012]".to_string(), 15));
    }

    #[test]
    fn test_uniq_merges_across_padding_boundary() {
        let list = HostList::create("node[08-12],node10").unwrap();
        list.uniq();
        assert_eq!(list.count(), 5);
        assert_eq!(list.to_string(), "node[08-12]");

        let list = HostList::create("node10,node09").unwrap();
        list.uniq();
        assert_eq!(list.to_string(), "node[09-10]");

        let list = HostList::create("node[10-12],node[05-12],node[9-11]").unwrap();
        list.uniq();
        assert_eq!(list.count(), 9);
        assert_eq!(list.deranged_string().matches("node10").count(), 1);
        list.uniq();
        assert_eq!(list.count(), 9);
    }

    #[test]
    fn test_uniq_keeps_padded_runs_apart() {
        let list = HostList::create("n[1-5],n[08-12],n[010-020]").unwrap();
        list.uniq();
        assert_eq!(list.count(), 21);
        assert_eq!(list.to_string(), "n[1-5],n[08-12],n[010-020]");
        assert_eq!(list.find("n10"), Some(7));
        assert_eq!(list.find("n010"), Some(10));
    }

    #[test]
    fn test_pop_and_shift() {
        let list = HostList::create("node[1-3],login").unwrap();
        assert_eq!(list.pop().unwrap(), "login");
        assert_eq!(list.pop().unwrap(), "node3");
        assert_eq!(list.shift().unwrap(), "node1");
        assert_eq!(list.count(), 1);
        assert_eq!(list.shift().unwrap(), "node2");
        assert!(list.is_empty());
        assert_eq!(list.pop(), Err(HostlistError::Empty));
    }

    #[test]
    fn test_pop_zero_numbered_host() {
        let list = HostList::create("node0").unwrap();
        assert_eq!(list.pop().unwrap(), "node0");
        assert!(list.read().ranges().is_empty());
        assert_eq!(list.count(), 0);
    }

    #[test]
    fn test_pop_and_shift_range() {
        let list = HostList::create("login,node[1-3],gw7").unwrap();
        assert_eq!(list.pop_range().unwrap(), "gw7");
        assert_eq!(list.shift_range().unwrap(), "login");
        assert_eq!(list.pop_range().unwrap(), "node[1-3]");
        assert_eq!(list.count(), 0);
    }

    #[test]
    fn test_nth() {
        let list = HostList::create("login,node[1-3]").unwrap();
        assert_eq!(list.nth(0).unwrap(), "login");
        assert_eq!(list.nth(3).unwrap(), "node3");
        assert_eq!(
            list.nth(4),
            Err(HostlistError::IndexOutOfRange { index: 4, count: 4 })
        );
    }

    #[test]
    fn test_find() {
        let list = HostList::create("login,node[1-3],10.0.0.[5-6]:10001").unwrap();
        assert_eq!(list.find("login"), Some(0));
        assert_eq!(list.find("node2"), Some(2));
        assert_eq!(list.find("10.0.0.6:10001"), Some(5));
        assert_eq!(list.find("node02"), None);
        assert_eq!(list.find("node4"), None);
    }

    #[test]
    fn test_delete_nth_splits_range() {
        let list = HostList::create("node[1-5]").unwrap();
        list.delete_nth(2).unwrap();
        assert_eq!(list.count(), 4);
        assert_eq!(list.to_string(), "node[1-2,4-5]");

        list.delete_nth(0).unwrap();
        assert_eq!(list.to_string(), "node[2,4-5]");

        assert!(matches!(
            list.delete_nth(3),
            Err(HostlistError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_delete_host() {
        let list = HostList::create("login,node[1-3]").unwrap();
        list.delete_host("login").unwrap();
        assert_eq!(list.to_string(), "node[1-3]");
        assert_eq!(
            list.delete_host("node9"),
            Err(HostlistError::NotFound {
                host: "node9".to_string()
            })
        );
    }

    #[test]
    fn test_delete_skips_missing_hosts() {
        let list = HostList::create("node[1-10]").unwrap();
        assert_eq!(list.delete("node[3-4],node20,login").unwrap(), 2);
        assert_eq!(list.to_string(), "node[1-2,5-10]");
    }

    #[test]
    fn test_delete_last_host_then_pop() {
        let list = HostList::create("node1").unwrap();
        assert_eq!(list.delete("node1").unwrap(), 1);
        assert_eq!(list.count(), 0);
        assert_eq!(list.pop(), Err(HostlistError::Empty));
        assert_eq!(list.delete("node1"), Err(HostlistError::Empty));
    }

    #[test]
    fn test_within_and_intersects() {
        let list = HostList::create("node[1-10],login").unwrap();
        assert!(list.within("node[2-3],login").unwrap());
        assert!(!list.within("node[9-11]").unwrap());

        let common = list.intersects("node[8-12],gw1,login").unwrap();
        assert_eq!(common.to_string(), "node[8-10],login");
        assert_eq!(common.count(), 4);
    }

    #[test]
    fn test_push_list_and_replace_list() {
        let list = HostList::create("node[1-2]").unwrap();
        let other = HostList::create("node[3-4]").unwrap();
        list.push_list(&other);
        assert_eq!(list.to_string(), "node[1-4]");

        list.push_list(&list);
        assert_eq!(list.count(), 8);

        list.replace_list(&other);
        assert_eq!(list, other);
        assert_eq!(list.to_string(), "node[3-4]");
    }

    #[test]
    fn test_clone_is_independent() {
        let list = HostList::create("node[1-2]").unwrap();
        let copy = list.clone();
        list.pop().unwrap();
        assert_eq!(copy.count(), 2);
        assert_eq!(list.count(), 1);
    }
}
