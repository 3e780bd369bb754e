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

use std::net::Ipv4Addr;

use super::tree::Node;

/// Named normalization attached to a string field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    /// IPv4 network accepted as `a.b.c.d/len` or `a.b.c.d m.m.m.m`.
    /// FortiOS always answers with the mask form.
    Cidr,
}

impl Transform {
    /// Normalize a remote value, given the value currently held locally
    pub fn import(self, wire: String, prior: Option<&Node>) -> String {
        match self {
            Transform::Cidr => match prior.and_then(Node::as_str) {
                Some(prior) if same_network(prior, &wire) => prior.to_owned(),
                _ => wire,
            },
        }
    }

    /// Prepare a local value for the remote API
    pub fn export(self, local: &str) -> String {
        match self {
            Transform::Cidr => local.trim().to_owned(),
        }
    }
}

fn same_network(a: &str, b: &str) -> bool {
    match (parse_network(a), parse_network(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Parse an IPv4 network into its masked address and prefix length
fn parse_network(text: &str) -> Option<(Ipv4Addr, u32)> {
    let text = text.trim();
    let (addr, prefix) = if let Some((addr, len)) = text.split_once('/') {
        let len: u32 = len.trim().parse().ok()?;
        (addr.trim(), len)
    } else if let Some((addr, mask)) = text.split_once(char::is_whitespace) {
        let mask: Ipv4Addr = mask.trim().parse().ok()?;
        (addr.trim(), mask_len(mask)?)
    } else {
        (text, 32)
    };
    if prefix > 32 {
        return None;
    }
    let addr: Ipv4Addr = addr.parse().ok()?;
    let mask = u32::MAX.checked_shl(32 - prefix).unwrap_or(0);
    Some((Ipv4Addr::from(u32::from(addr) & mask), prefix))
}

fn mask_len(mask: Ipv4Addr) -> Option<u32> {
    let bits = u32::from(mask);
    let len = bits.leading_ones();
    // contiguous masks only
    if bits.checked_shl(len).unwrap_or(0) == 0 {
        Some(len)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("10.0.0.0/24", Some((Ipv4Addr::new(10, 0, 0, 0), 24)))]
    #[case("10.0.0.0 255.255.255.0", Some((Ipv4Addr::new(10, 0, 0, 0), 24)))]
    #[case("10.0.0.7/24", Some((Ipv4Addr::new(10, 0, 0, 0), 24)))]
    #[case("0.0.0.0 0.0.0.0", Some((Ipv4Addr::new(0, 0, 0, 0), 0)))]
    #[case("192.168.1.1", Some((Ipv4Addr::new(192, 168, 1, 1), 32)))]
    #[case("10.0.0.0 255.0.255.0", None)]
    #[case("10.0.0.0/33", None)]
    #[case("any", None)]
    fn networks(#[case] text: &str, #[case] expected: Option<(Ipv4Addr, u32)>) {
        assert_eq!(parse_network(text), expected);
    }

    #[test]
    fn cidr_keeps_local_spelling() {
        let prior = Node::from("10.0.0.0/24");
        let imported = Transform::Cidr.import("10.0.0.0 255.255.255.0".to_owned(), Some(&prior));
        assert_eq!(imported, "10.0.0.0/24");
    }

    #[test]
    fn cidr_reports_drift() {
        let prior = Node::from("10.0.0.0/24");
        let imported = Transform::Cidr.import("10.0.1.0 255.255.255.0".to_owned(), Some(&prior));
        assert_eq!(imported, "10.0.1.0 255.255.255.0");
        let imported = Transform::Cidr.import("10.0.1.0 255.255.255.0".to_owned(), None);
        assert_eq!(imported, "10.0.1.0 255.255.255.0");
    }
}
