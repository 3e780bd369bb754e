// This file is part of the terraform-provider-fortios project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
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

use std::cmp::Ordering;
use std::str::FromStr;

use super::tree::Node;

/// Ordering applied to imported lists of objects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortMode {
    /// Numbers compare numerically, and so do digit runs inside strings
    #[default]
    Natural,
    /// Plain string order of the rendered key
    Alphabetical,
    /// Keep the order of the remote API
    Preserve,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "true" | "natural" => Ok(SortMode::Natural),
            "alphabetical" => Ok(SortMode::Alphabetical),
            "false" => Ok(SortMode::Preserve),
            _ => Err(format!(
                "`{s}` is not a sort mode, expected one of `true`, `natural`, `alphabetical` or `false`"
            )),
        }
    }
}

/// Stable sort of object nodes by the value of their `key` field
pub fn sort_by_key(items: &mut [Node], key: &str, mode: SortMode) {
    if mode == SortMode::Preserve {
        return;
    }
    let key_of = |node: &Node| node.as_object().and_then(|fields| fields.get(key)).cloned();
    items.sort_by(|a, b| compare_keys(key_of(a).as_ref(), key_of(b).as_ref(), mode));
}

fn compare_keys(a: Option<&Node>, b: Option<&Node>, mode: SortMode) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match mode {
            SortMode::Alphabetical => a.render().cmp(&b.render()),
            _ => match (a, b) {
                (Node::Int(a), Node::Int(b)) => a.cmp(b),
                _ => natural_cmp(
                    a.render().as_deref().unwrap_or_default(),
                    b.render().as_deref().unwrap_or_default(),
                ),
            },
        },
    }
}

/// Compare strings, treating runs of ASCII digits as numbers (`port2` < `port10`)
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();
    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let x = take_digits(&mut a);
                let y = take_digits(&mut b);
                let ordering = x.len().cmp(&y.len()).then_with(|| x.cmp(&y));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                a.next();
                b.next();
            }
        }
    }
}

/// Consume a run of digits, without its leading zeros
fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        if !(digits.is_empty() && c == '0') {
            digits.push(c);
        }
    }
    digits
}
