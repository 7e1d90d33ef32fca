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

//! Parser for bracketed host list expressions
//!
//! Input is split into top-level tokens (commas, spaces and tabs outside
//! brackets), and each token becomes one or more [`HostRange`] values:
//!
//! - `login` or `node7` is a single host, split by [`parse_host_name`]
//! - `node[1-4,9].dc1` becomes one range per bracketed item
//! - `rack[1-2]node[01-20]` expands the leading bracket into prefixes
//!   `rack1node`, `rack2node` and parses each of those again

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::error::{HostlistError, Result};
use crate::list::RangeList;
use crate::range::{HostRange, MAX_RANGE};

/// Characters separating top-level tokens
pub(crate) const LIST_SEPARATORS: &str = ", \t";

/// Operator between the bounds of a bracketed range
pub(crate) const RANGE_OPERATOR: char = '-';

/// Separator between items inside brackets
const RANGE_SEPARATOR: char = ',';

/// Maximum number of prefixes a single token may expand into when it
/// contains more than one bracket expression
pub const MAX_TOKEN_PREFIXES: usize = MAX_RANGE as usize + 1;

/// `prefixN`, `prefix-N` and `prefixN-N` style names
static HYPHENATED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9A-Za-z_]+-?)([0-9]+)?(.*)$").expect("hyphenated name pattern is valid")
});

/// Alphabetic prefix, optional number, anything else
static PLAIN_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]+)([0-9]+)?(.*)$").expect("plain name pattern is valid")
});

/// Dotted quad with optional trailer such as `:port`
static DOTTED_QUAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.)([0-9]{1,3})(.*)$")
        .expect("dotted quad pattern is valid")
});

/// A delimiter-free host name split into its components
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HostName {
    pub prefix: String,
    pub number: Option<u64>,
    pub width: usize,
    pub suffix: String,
}

impl HostName {
    /// Convert into a one-host range. Names without a number keep the whole
    /// token as their identity.
    pub fn into_range(self, token: &str) -> HostRange {
        match self.number {
            Some(num) => HostRange::new(self.prefix, self.suffix, num, num, self.width),
            None => HostRange::single(token),
        }
    }
}

/// One bracketed item: `lo` or `lo-hi`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub lo: u64,
    pub hi: u64,
    pub width: usize,
}

impl Span {
    fn count(&self) -> usize {
        (self.hi - self.lo) as usize + 1
    }
}

/// Return the next token and the unscanned remainder.
///
/// Leading separators are skipped. A separator only ends the token when it
/// appears outside brackets.
pub(crate) fn next_token<'a>(input: &'a str, separators: &str) -> (&'a str, &'a str) {
    let input = input.trim_start_matches(|c| separators.contains(c));
    let mut depth: i32 = 0;

    for (idx, ch) in input.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth -= 1,
            c if depth <= 0 && separators.contains(c) => {
                return (&input[..idx], &input[idx + c.len_utf8()..]);
            }
            _ => {}
        }
    }

    (input, "")
}

/// Split a single host name into prefix, number, width and suffix
pub(crate) fn parse_host_name(token: &str) -> Result<HostName> {
    let pattern = if token.contains('-') {
        &*HYPHENATED_NAME
    } else {
        &*PLAIN_NAME
    };

    let captures = pattern
        .captures(token)
        .or_else(|| DOTTED_QUAD.captures(token))
        .ok_or_else(|| HostlistError::invalid_hostname(token))?;

    let prefix = captures.get(1).map_or("", |m| m.as_str());
    if prefix.is_empty() {
        return Err(HostlistError::invalid_hostname(token));
    }

    let (number, width) = match captures.get(2) {
        Some(digits) => {
            let num = digits
                .as_str()
                .parse::<u64>()
                .map_err(|_| HostlistError::invalid_hostname(token))?;
            (Some(num), digits.as_str().len())
        }
        None => (None, 0),
    };

    Ok(HostName {
        prefix: prefix.to_string(),
        number,
        width,
        suffix: captures.get(3).map_or("", |m| m.as_str()).to_string(),
    })
}

/// Parse the contents of one bracket expression (e.g. `1-3,7,09-12`)
pub(crate) fn parse_ranges(contents: &str, op: char) -> Result<Vec<Span>> {
    if contents.trim().is_empty() {
        return Err(HostlistError::invalid_range(
            contents,
            "empty bracket expression",
        ));
    }

    contents
        .split(RANGE_SEPARATOR)
        .map(|item| parse_range_item(item.trim(), op))
        .collect()
}

fn parse_range_item(item: &str, op: char) -> Result<Span> {
    let mut bounds = item.split(op);
    let lo_str = bounds.next().unwrap_or_default();
    let hi_str = bounds.next();
    if bounds.next().is_some() {
        return Err(HostlistError::invalid_range(
            item,
            "more than one range operator",
        ));
    }

    let lo = parse_bound(lo_str, item)?;
    let hi = match hi_str {
        Some(hi_str) => parse_bound(hi_str, item)?,
        None => lo,
    };

    if hi < lo {
        return Err(HostlistError::invalid_range(
            item,
            "high bound is below low bound",
        ));
    }
    if hi - lo > MAX_RANGE {
        return Err(HostlistError::invalid_range(
            item,
            format!("span exceeds maximum of {MAX_RANGE}"),
        ));
    }

    Ok(Span {
        lo,
        hi,
        width: lo_str.len(),
    })
}

fn parse_bound(bound: &str, item: &str) -> Result<u64> {
    if bound.is_empty() || !bound.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HostlistError::invalid_range(
            item,
            format!("{bound:?} is not a non-negative integer"),
        ));
    }

    bound
        .parse()
        .map_err(|_| HostlistError::invalid_range(item, format!("{bound:?} is too large")))
}

/// Parse a complete host list expression into an unsorted range list.
///
/// With `name_optional` set (numeric lists) every token must be a bare
/// bracket expression and parsed ranges carry no padding.
pub(crate) fn parse_bracketed_host_list(
    input: &str,
    separators: &str,
    op: char,
    name_optional: bool,
) -> Result<RangeList> {
    let mut list = RangeList::default();
    let mut rest = input;

    loop {
        let (token, remainder) = next_token(rest, separators);
        if token.is_empty() {
            break;
        }
        rest = remainder;

        trace!(token, "parsing host list token");
        push_token(&mut list, token, op, name_optional, MAX_TOKEN_PREFIXES)?;
    }

    debug!(
        hosts = list.count(),
        ranges = list.ranges().len(),
        "parsed host list"
    );
    Ok(list)
}

fn push_token(
    list: &mut RangeList,
    token: &str,
    op: char,
    name_optional: bool,
    prefix_budget: usize,
) -> Result<()> {
    let Some(open) = token.find('[') else {
        if token.contains(']') {
            return Err(HostlistError::invalid_range(
                token,
                "unmatched closing bracket",
            ));
        }
        if name_optional {
            return Err(HostlistError::invalid_range(
                token,
                "expected a bracketed numeric range",
            ));
        }
        let host = parse_host_name(token)?;
        list.push_range(host.into_range(token));
        return Ok(());
    };

    let close = token[open..]
        .find(']')
        .map(|offset| open + offset)
        .ok_or_else(|| HostlistError::invalid_range(token, "unclosed bracket"))?;

    let prefix = &token[..open];
    let contents = &token[open + 1..close];
    let suffix = &token[close + 1..];

    if prefix.contains(']') {
        return Err(HostlistError::invalid_range(
            token,
            "unmatched closing bracket",
        ));
    }
    if prefix.is_empty() && !name_optional {
        return Err(HostlistError::invalid_hostname(token));
    }
    if contents.contains('[') {
        return Err(HostlistError::invalid_range(
            token,
            "nested brackets are not supported",
        ));
    }

    let spans = parse_ranges(contents, op)?;

    if suffix.contains('[') {
        return push_expanded(list, prefix, &spans, suffix, op, name_optional, prefix_budget);
    }
    if suffix.contains(']') {
        return Err(HostlistError::invalid_range(
            token,
            "unmatched closing bracket",
        ));
    }

    for span in spans {
        // numeric lists carry no padding
        let width = if name_optional { 0 } else { span.width };
        list.push_range(HostRange::new(prefix, suffix, span.lo, span.hi, width));
    }
    Ok(())
}

/// Expand the leading bracket of a multi-bracket token into new prefixes
fn push_expanded(
    list: &mut RangeList,
    prefix: &str,
    spans: &[Span],
    suffix: &str,
    op: char,
    name_optional: bool,
    prefix_budget: usize,
) -> Result<()> {
    let total: usize = spans.iter().map(Span::count).sum();
    if total > prefix_budget {
        return Err(HostlistError::invalid_range(
            &format!("{prefix}[...]{suffix}"),
            format!("expands to more than {MAX_TOKEN_PREFIXES} prefixes"),
        ));
    }

    let inner_budget = prefix_budget / total;
    for span in spans {
        for num in span.lo..=span.hi {
            let expanded = format!("{prefix}{num:0width$}{suffix}", width = span.width);
            push_token(list, &expanded, op, name_optional, inner_budget)?;
        }
    }
    Ok(())
}
