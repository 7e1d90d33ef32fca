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


//! Numeric-only lists and sets through the public API

use hostlist::{create_numeric_list, create_numeric_set, HostlistError, NumericSet};

#[test]
fn test_numeric_set_canonical_form() {
    let set = create_numeric_set("[7,0-3,2-4]").unwrap();
    assert_eq!(set.to_string(), "[0-4,7]");
    assert_eq!(set.count(), 6);
    assert_eq!(set.slice(), vec![0, 1, 2, 3, 4, 7]);
}

#[test]
fn test_numeric_list_keeps_duplicates() {
    let list = create_numeric_list("[3,1,3]").unwrap();
    assert_eq!(list.count(), 3);
    assert_eq!(list.deranged_string(), "3,1,3");
}

#[test]
fn test_numeric_rejections_are_distinct() {
    let cases: [(&str, fn(&HostlistError) -> bool); 3] = [
        ("0-3", |e| matches!(e, HostlistError::NumericNotBracketed { .. })),
        ("[0-x]", |e| matches!(e, HostlistError::NumericAlphabetic { .. })),
        ("[0,\t1]", |e| matches!(e, HostlistError::NumericWhitespace { .. })),
    ];

    for (input, is_expected) in cases {
        let err = create_numeric_set(input).unwrap_err();
        assert!(is_expected(err.root()), "{input:?} gave {err}");
        assert!(err
            .to_string()
            .starts_with(&format!("creating numeric set from {input:?}")));
    }
}

#[test]
fn test_numeric_set_rank_bookkeeping() {
    let ranks = NumericSet::new();
    for rank in [4, 0, 2, 1, 3] {
        ranks.add(rank);
    }
    assert_eq!(ranks.to_string(), "[0-4]");

    assert!(ranks.delete(2));
    assert!(!ranks.contains(2));
    assert_eq!(ranks.to_string(), "[0-1,3-4]");

    ranks.merge(&NumericSet::must_create("[2,9]"));
    assert_eq!(ranks.to_string(), "[0-4,9]");
}

#[test]
#[should_panic]
fn test_numeric_must_create_panics() {
    NumericSet::must_create("[1-");
}
