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


//! Shared host lists and sets accessed from several threads

use std::sync::Arc;
use std::thread;

use hostlist::{HostList, HostSet, NumericSet};

#[test]
fn test_concurrent_set_inserts() {
    let set = Arc::new(HostSet::new());

    let handles: Vec<_> = (0..8u64)
        .map(|t| {
            let set = Arc::clone(&set);
            thread::spawn(move || {
                let lo = t * 100 + 1;
                set.insert(&format!("node[{lo}-{}]", lo + 99)).unwrap()
            })
        })
        .collect();

    let added: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(added, 800);
    assert_eq!(set.count(), 800);
    assert_eq!(set.to_string(), "node[1-800]");
}

#[test]
fn test_concurrent_push_and_read() {
    let list = Arc::new(HostList::new());

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let list = Arc::clone(&list);
            thread::spawn(move || {
                for n in 0..50 {
                    list.push_host(&format!("w{t}n{n}")).unwrap();
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let list = Arc::clone(&list);
            thread::spawn(move || {
                for _ in 0..50 {
                    let count = list.count();
                    assert!(count <= 200);
                    let _ = list.ranged_string();
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }

    assert_eq!(list.count(), 200);
    list.uniq();
    assert_eq!(list.count(), 200);
}

#[test]
fn test_opposing_merges_do_not_deadlock() {
    let a = Arc::new(HostSet::must_create("a[1-100]"));
    let b = Arc::new(HostSet::must_create("b[1-100]"));

    let forward = {
        let (a, b) = (Arc::clone(&a), Arc::clone(&b));
        thread::spawn(move || {
            for _ in 0..200 {
                a.merge_set(&b);
            }
        })
    };
    let backward = {
        let (a, b) = (Arc::clone(&a), Arc::clone(&b));
        thread::spawn(move || {
            for _ in 0..200 {
                b.merge_set(&a);
            }
        })
    };

    forward.join().unwrap();
    backward.join().unwrap();

    assert!(a.within("a[1-100],b[1-100]").unwrap());
    assert!(b.contains("b100"));
}

#[test]
fn test_concurrent_numeric_deletes() {
    let ranks = Arc::new(NumericSet::must_create("[0-999]"));

    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let ranks = Arc::clone(&ranks);
            thread::spawn(move || (0..250).filter(|n| ranks.delete(t * 250 + n)).count())
        })
        .collect();

    let removed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(removed, 1000);
    assert!(ranks.is_empty());
}
