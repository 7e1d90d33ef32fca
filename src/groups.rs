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

//! Host sets bucketed by an arbitrary string key

use std::collections::BTreeMap;
use std::fmt;

use crate::error::Result;
use crate::set::HostSet;

/// Hosts grouped under string keys, enumerated in key order
///
/// # Examples
///
/// ```rust
/// use hostlist::HostGroups;
///
/// let mut groups = HostGroups::new();
/// groups.add_host("ok", "node1").unwrap();
/// groups.add_host("ok", "node2").unwrap();
/// groups.add_host("failed", "node7").unwrap();
///
/// assert_eq!(groups.keys(), vec!["failed", "ok"]);
/// assert_eq!(groups.get("ok").unwrap().to_string(), "node[1-2]");
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HostGroups(BTreeMap<String, HostSet>);

impl HostGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `host` into the set for `key`, creating the set on first use
    pub fn add_host(&mut self, key: &str, host: &str) -> Result<()> {
        let set = self.0.entry(key.to_string()).or_default();
        set.insert(host)?;
        Ok(())
    }

    /// Group keys in lexical order
    pub fn keys(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn get(&self, key: &str) -> Option<&HostSet> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HostSet)> {
        self.0.iter().map(|(key, set)| (key.as_str(), set))
    }
}

impl fmt::Display for HostGroups {
    /// Each group renders as a block: rule, member list, rule, key
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<(&str, String)> = self
            .iter()
            .map(|(key, set)| (key, set.ranged_string()))
            .collect();
        let padding = rendered
            .iter()
            .map(|(_, hosts)| hosts.len())
            .max()
            .unwrap_or(0);
        let rule = "-".repeat(padding);

        for (key, hosts) in &rendered {
            writeln!(f, "{rule}")?;
            writeln!(f, "{hosts:>padding$}")?;
            writeln!(f, "{rule}")?;
            writeln!(f, "{key}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_host_creates_groups() {
        let mut groups = HostGroups::new();
        assert!(groups.is_empty());

        groups.add_host("b", "node[1-2]").unwrap();
        groups.add_host("a", "login").unwrap();
        groups.add_host("b", "node3").unwrap();
        groups.add_host("b", "node1").unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups.keys(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(groups.get("b").unwrap().count(), 3);
        assert!(groups.get("c").is_none());
    }

    #[test]
    fn test_add_host_rejects_invalid() {
        let mut groups = HostGroups::new();
        assert!(groups.add_host("a", "node[3-1]").is_err());
    }

    #[test]
    fn test_display_blocks() {
        let mut groups = HostGroups::new();
        groups.add_host("zeta", "node[1-10]").unwrap();
        groups.add_host("alpha", "gw1").unwrap();

        let expected = "\
----------
       gw1
----------
alpha
----------
node[1-10]
----------
zeta
";
        assert_eq!(groups.to_string(), expected);
    }

    #[test]
    fn test_display_empty() {
        assert_eq!(HostGroups::new().to_string(), "");
    }
}
