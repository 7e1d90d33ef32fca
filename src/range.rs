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

//! Host ranges: the atomic unit of a host list
//!
//! A [`HostRange`] is either a single host whose whole name is the prefix,
//! or a numeric interval `[lo, hi]` rendered between a shared prefix and
//! suffix with a fixed zero-padding width.

use std::cmp::Ordering;
use std::fmt;

/// Largest span (`hi - lo`) accepted for a single range
pub const MAX_RANGE: u64 = 16384;

/// Number of decimal digits needed to print `num`
pub(crate) fn digit_count(mut num: u64) -> usize {
    let mut digits = 1;
    while num >= 10 {
        num /= 10;
        digits += 1;
    }
    digits
}

/// Number of leading zeros printed when `num` is rendered at `width`
fn zero_padding(num: u64, width: usize) -> usize {
    width.saturating_sub(digit_count(num))
}

/// Outcome of removing a single value from a range
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Removal {
    /// The range held only that value and must be dropped
    Emptied,
    /// A boundary value was removed
    Shrunk,
    /// An interior value was removed; the trailing half is returned
    Split(HostRange),
}

/// A single host, or a run of numbered hosts sharing a prefix and suffix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostRange {
    prefix: String,
    suffix: String,
    lo: u64,
    hi: u64,
    width: usize,
    is_range: bool,
}

impl HostRange {
    /// A single host with no numeric component
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            prefix: name.into(),
            suffix: String::new(),
            lo: 0,
            hi: 0,
            width: 0,
            is_range: false,
        }
    }

    /// A numeric run `prefix[lo-hi]suffix`, padded to `width` digits
    pub(crate) fn new(
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        lo: u64,
        hi: u64,
        width: usize,
    ) -> Self {
        debug_assert!(lo <= hi, "range low bound {lo} above high bound {hi}");
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            lo,
            hi,
            width,
            is_range: true,
        }
    }

    /// A bare numeric run with no prefix, suffix or padding
    pub(crate) fn numeric(lo: u64, hi: u64) -> Self {
        Self::new("", "", lo, hi, 0)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn lo(&self) -> u64 {
        self.lo
    }

    pub fn hi(&self) -> u64 {
        self.hi
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_range(&self) -> bool {
        self.is_range
    }

    /// Number of hosts this range represents
    pub fn count(&self) -> usize {
        if self.is_range {
            (self.hi - self.lo) as usize + 1
        } else {
            1
        }
    }

    /// Render a numeric value with this range's padding
    pub(crate) fn format_num(&self, num: u64) -> String {
        format!("{:0width$}", num, width = self.width)
    }

    /// Full host name for numeric value `num`
    pub(crate) fn host_name(&self, num: u64) -> String {
        if self.is_range {
            format!("{}{}{}", self.prefix, self.format_num(num), self.suffix)
        } else {
            self.prefix.clone()
        }
    }

    /// Host name at zero-based `offset` within this range
    pub(crate) fn nth_host(&self, offset: usize) -> String {
        self.host_name(self.lo + offset as u64)
    }

    /// Every host in this range, in ascending order
    pub fn hosts(&self) -> impl Iterator<Item = String> + '_ {
        (self.lo..=self.hi).map(move |num| self.host_name(num))
    }

    /// Numeric portion as it appears inside brackets: `lo` or `lo-hi`
    pub(crate) fn num_str(&self) -> String {
        if self.lo == self.hi {
            self.format_num(self.lo)
        } else {
            format!("{}-{}", self.format_num(self.lo), self.format_num(self.hi))
        }
    }

    /// First value printed without leading zeros at this width, or `None`
    /// when every `u64` is padded
    fn unpadded_from(&self) -> Option<u64> {
        match self.width {
            0 | 1 => Some(0),
            width => u32::try_from(width - 1)
                .ok()
                .and_then(|exp| 10u64.checked_pow(exp)),
        }
    }

    /// Split a run into the values printed with leading zeros and the values
    /// printed without. The unpadded part gets width 0, so every unpadded run
    /// of a name sorts and merges together whatever width it was parsed with.
    pub(crate) fn split_padding(mut self) -> (HostRange, Option<HostRange>) {
        if !self.is_range {
            return (self, None);
        }
        let Some(boundary) = self.unpadded_from() else {
            return (self, None);
        };

        if self.lo >= boundary {
            self.width = 0;
            return (self, None);
        }
        if self.hi < boundary {
            return (self, None);
        }

        let tail = HostRange {
            lo: boundary,
            width: 0,
            ..self.clone()
        };
        self.hi = boundary - 1;
        (self, Some(tail))
    }

    /// Whether `other` is the unpadded run starting right where this padded
    /// run ends, e.g. `node[10-12]` after `node[08-09]`
    pub(crate) fn continues_padding(&self, other: &HostRange) -> bool {
        self.is_range
            && self.width >= 2
            && other.is_range
            && other.width == 0
            && self.prefix == other.prefix
            && self.suffix == other.suffix
            && self.unpadded_from().is_some_and(|boundary| {
                self.hi.checked_add(1) == Some(boundary) && other.lo == boundary
            })
    }

    fn same_name(&self, other: &HostRange) -> bool {
        self.is_range == other.is_range
            && self.prefix == other.prefix
            && self.suffix == other.suffix
    }

    /// True when both are runs that may share one pair of brackets
    pub(crate) fn within(&self, other: &HostRange) -> bool {
        self.is_range && other.is_range && self.same_name(other) && self.width_equivalent(other)
    }

    /// Whether the two widths pad the boundary values identically
    pub(crate) fn width_equivalent(&self, other: &HostRange) -> bool {
        self.width == other.width
            || zero_padding(self.lo, self.width) == zero_padding(self.lo, other.width)
            || zero_padding(other.lo, other.width) == zero_padding(other.lo, self.width)
    }

    /// Reconcile padding widths so the two ranges can be combined.
    ///
    /// When the widths differ but either low bound renders the same under
    /// both, one operand adopts the other's width and `true` is returned.
    /// The operand whose low bound is unaffected by the change is the one
    /// rewritten, so rendering never changes.
    pub(crate) fn combines_width(&mut self, other: &mut HostRange) -> bool {
        if self.width == other.width {
            return true;
        }
        if !self.width_equivalent(other) {
            return false;
        }

        if zero_padding(self.lo, self.width) != zero_padding(self.lo, other.width) {
            other.width = self.width;
        } else {
            self.width = other.width;
        }
        true
    }

    /// Whether `other` continues this range directly (`self.hi + 1 == other.lo`)
    pub(crate) fn can_append(&mut self, other: &mut HostRange) -> bool {
        self.is_range
            && other.is_range
            && self.prefix == other.prefix
            && self.suffix == other.suffix
            && self.hi.checked_add(1) == Some(other.lo)
            && self.combines_width(other)
    }

    /// Extend this range with `other` after a successful [`can_append`](Self::can_append)
    pub(crate) fn append(&mut self, other: &HostRange) {
        self.hi = other.hi;
    }

    /// Merge `other`, which must not sort before `self`, into this range.
    ///
    /// Returns the number of duplicate hosts eliminated, or `None` when the
    /// ranges cannot be merged.
    pub(crate) fn join(&mut self, other: &mut HostRange) -> Option<usize> {
        if !self.same_name(other) {
            return None;
        }
        if !self.is_range {
            return Some(1);
        }
        if other.lo < self.lo || !self.combines_width(other) {
            return None;
        }

        if self.hi.checked_add(1) == Some(other.lo) {
            self.hi = other.hi;
            Some(0)
        } else if self.hi >= other.lo {
            if self.hi < other.hi {
                let duplicated = (self.hi - other.lo + 1) as usize;
                self.hi = other.hi;
                Some(duplicated)
            } else {
                Some(other.count())
            }
        } else {
            None
        }
    }

    /// Offset of `name` within this range, if it is a member
    pub(crate) fn contains_host(&self, name: &str) -> Option<usize> {
        if !self.is_range {
            return (name == self.prefix).then_some(0);
        }

        let digits = name
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let num: u64 = digits.parse().ok()?;
        if num < self.lo || num > self.hi || self.format_num(num) != digits {
            return None;
        }
        Some((num - self.lo) as usize)
    }

    /// Offset of numeric value `num`, ignoring prefix, suffix and padding
    pub(crate) fn contains_value(&self, num: u64) -> Option<usize> {
        (self.is_range && num >= self.lo && num <= self.hi).then(|| (num - self.lo) as usize)
    }

    /// One-host range for numeric value `num` of this range
    pub(crate) fn slice_at(&self, num: u64) -> HostRange {
        HostRange {
            lo: num,
            hi: num,
            ..self.clone()
        }
    }

    /// Remove numeric value `num`, which must lie within this range
    pub(crate) fn delete_host(&mut self, num: u64) -> Removal {
        if !self.is_range || self.lo == self.hi {
            return Removal::Emptied;
        }

        if num == self.lo {
            self.lo += 1;
            Removal::Shrunk
        } else if num == self.hi {
            self.hi -= 1;
            Removal::Shrunk
        } else {
            let mut tail = self.clone();
            self.hi = num - 1;
            tail.lo = num + 1;
            Removal::Split(tail)
        }
    }

    /// Drop the highest host, returning its name. The range must hold more than one host.
    pub(crate) fn pop_host(&mut self) -> String {
        debug_assert!(self.count() > 1);
        let host = self.host_name(self.hi);
        self.hi -= 1;
        host
    }

    /// Drop the lowest host, returning its name. The range must hold more than one host.
    pub(crate) fn shift_host(&mut self) -> String {
        debug_assert!(self.count() > 1);
        let host = self.host_name(self.lo);
        self.lo += 1;
        host
    }
}

/// Canonical order: prefix, suffix, single hosts before runs, width, then
/// numeric position.
impl Ord for HostRange {
    fn cmp(&self, other: &Self) -> Ordering {
        self.prefix
            .cmp(&other.prefix)
            .then_with(|| self.suffix.cmp(&other.suffix))
            .then_with(|| self.is_range.cmp(&other.is_range))
            .then_with(|| self.width.cmp(&other.width))
            .then_with(|| self.lo.cmp(&other.lo))
            .then_with(|| self.hi.cmp(&other.hi))
    }
}

impl PartialOrd for HostRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for HostRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_range || self.lo == self.hi {
            write!(f, "{}", self.host_name(self.lo))
        } else {
            write!(f, "{}[{}]{}", self.prefix, self.num_str(), self.suffix)
        }
    }
}
