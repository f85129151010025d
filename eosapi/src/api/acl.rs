//! Standard IPv4 access lists.
//!
//! ```text
//! ip access-list standard mgmt
//!    10 permit host 192.0.2.10 log
//!    20 permit 10.0.0.0/8
//!    30 deny any
//! ```

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use indexmap::IndexMap;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Entity, parent_pattern};
use crate::error::{Error, Result};
use crate::node::Node;
use crate::section;

const PREFIX: &str = "ip access-list standard";

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^ip access-list standard (\S+)$").unwrap());

static ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*(\d+)\s+(permit|deny)\s+(any|host\s+\S+|\S+\s+\d+\.\d+\.\d+\.\d+|\S+)(\s+log)?\s*$",
    )
    .unwrap()
});

/// Entry action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclAction {
    Permit,
    Deny,
}

impl AclAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Permit => "permit",
            Self::Deny => "deny",
        }
    }
}

impl fmt::Display for AclAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AclAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "permit" => Ok(Self::Permit),
            "deny" => Ok(Self::Deny),
            other => Err(Error::usage(format!("unknown ACL action '{other}'"))),
        }
    }
}

/// One sequenced entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclEntry {
    pub action: AclAction,
    pub srcaddr: String,
    pub srclen: u8,
    pub log: bool,
}

impl AclEntry {
    pub fn new(action: AclAction, srcaddr: impl Into<String>, srclen: u8) -> Self {
        Self {
            action,
            srcaddr: srcaddr.into(),
            srclen,
            log: false,
        }
    }

    pub fn log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    /// The entry as a CLI line without its sequence number.
    pub fn to_command(&self) -> String {
        let mut command = format!("{} {}/{}", self.action, self.srcaddr, self.srclen);
        if self.log {
            command.push_str(" log");
        }
        command
    }
}

/// A standard ACL and its entries keyed by sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardAcl {
    pub name: String,
    pub entries: IndexMap<u32, AclEntry>,
}

/// Parse the entries of an ACL block. Remarks and unrecognized lines are skipped.
pub fn parse_entries(block: &str) -> IndexMap<u32, AclEntry> {
    let mut entries = IndexMap::new();
    for caps in ENTRY_RE.captures_iter(block) {
        let Ok(seq) = caps[1].parse::<u32>() else {
            continue;
        };
        let Ok(action) = caps[2].parse::<AclAction>() else {
            continue;
        };
        let Some((srcaddr, srclen)) = parse_source(&caps[3]) else {
            debug!("skipping ACL entry with unparsed source '{}'", &caps[3]);
            continue;
        };
        entries.insert(
            seq,
            AclEntry {
                action,
                srcaddr,
                srclen,
                log: caps.get(4).is_some(),
            },
        );
    }
    entries
}

/// Normalize a source operand to address and prefix length.
fn parse_source(source: &str) -> Option<(String, u8)> {
    let mut parts = source.split_whitespace();
    let first = parts.next()?;
    let second = parts.next();

    match (first, second) {
        ("any", None) => Some(("0.0.0.0".to_string(), 32)),
        ("host", Some(addr)) => Some((addr.to_string(), 32)),
        (addr, Some(mask)) => {
            let mask = mask.parse::<Ipv4Addr>().ok()?;
            Some((addr.to_string(), u32::from(mask).count_ones() as u8))
        }
        (addr, None) => match addr.split_once('/') {
            Some((addr, len)) => Some((addr.to_string(), len.parse().ok()?)),
            None => Some((addr.to_string(), 32)),
        },
    }
}

/// Standard ACL API.
pub struct Acls<'a> {
    entity: Entity<'a>,
}

impl<'a> Acls<'a> {
    pub fn new(node: &'a mut Node) -> Self {
        Self {
            entity: Entity::new(node),
        }
    }

    /// The ACL named `name`, or `None` if it is not configured.
    pub async fn get(&mut self, name: &str) -> Result<Option<StandardAcl>> {
        let block = self.entity.get_block(&parent_pattern(PREFIX, name)).await?;
        Ok(block.map(|block| StandardAcl {
            name: name.to_string(),
            entries: parse_entries(&block),
        }))
    }

    /// Every standard ACL, keyed by name in config order.
    pub async fn get_all(&mut self) -> Result<IndexMap<String, StandardAcl>> {
        let config = self.entity.config().await?;
        let mut acls = IndexMap::new();
        for (caps, block) in section::blocks(config, &NAME_RE) {
            let name = caps[1].to_string();
            acls.entry(name.clone()).or_insert_with(|| StandardAcl {
                name,
                entries: parse_entries(block),
            });
        }
        Ok(acls)
    }

    pub async fn create(&mut self, name: &str) -> Result<bool> {
        self.entity.configure([format!("{PREFIX} {name}")]).await
    }

    pub async fn delete(&mut self, name: &str) -> Result<bool> {
        self.entity.configure([format!("no {PREFIX} {name}")]).await
    }

    pub async fn default(&mut self, name: &str) -> Result<bool> {
        self.entity.configure([format!("default {PREFIX} {name}")]).await
    }

    /// Append an entry, with an explicit sequence number when given.
    pub async fn add_entry(&mut self, name: &str, entry: &AclEntry, seqno: Option<u32>) -> Result<bool> {
        let line = match seqno {
            Some(seq) => format!("{} {}", seq, entry.to_command()),
            None => entry.to_command(),
        };
        self.entity
            .configure([format!("{PREFIX} {name}"), line, "exit".to_string()])
            .await
    }

    pub async fn remove_entry(&mut self, name: &str, seqno: u32) -> Result<bool> {
        self.entity
            .configure([
                format!("{PREFIX} {name}"),
                format!("no {seqno}"),
                "exit".to_string(),
            ])
            .await
    }

    /// Replace the entry at `seqno`.
    pub async fn update_entry(&mut self, name: &str, seqno: u32, entry: &AclEntry) -> Result<bool> {
        self.entity
            .configure([
                format!("{PREFIX} {name}"),
                format!("no {seqno}"),
                format!("{} {}", seqno, entry.to_command()),
                "exit".to_string(),
            ])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::*;
    use serde_json::json;

    const CONFIG: &str = "\
hostname sw1
ip access-list standard mgmt
   10 permit host 1.2.3.4 log
   20 permit 1.2.3.4 255.255.0.0 log
   30 deny any
ip access-list standard other
   10 remark lab only
   20 permit 10.0.0.0/8
ip access-list extended ext
   10 permit ip any any
interface Ethernet1
   no shutdown
";

    #[test]
    fn test_parse_entries_normalizes_sources() {
        let entries = parse_entries("10 permit host 1.2.3.4 log\n20 permit 1.2.3.4 255.255.0.0 log\n30 deny any\n");
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[&10],
            AclEntry::new(AclAction::Permit, "1.2.3.4", 32).log(true)
        );
        assert_eq!(
            entries[&20],
            AclEntry::new(AclAction::Permit, "1.2.3.4", 16).log(true)
        );
        assert_eq!(entries[&30], AclEntry::new(AclAction::Deny, "0.0.0.0", 32));
    }

    #[test]
    fn test_parse_entries_prefix_and_bare() {
        let entries = parse_entries("   10 remark x\n   20 permit 10.0.0.0/8\n   30 deny 192.0.2.1\n");
        assert_eq!(entries.keys().copied().collect::<Vec<_>>(), vec![20, 30]);
        assert_eq!(entries[&20].srclen, 8);
        assert_eq!(entries[&30].srclen, 32);
    }

    #[test]
    fn test_entry_to_command() {
        let entry = AclEntry::new(AclAction::Permit, "10.0.0.0", 8).log(true);
        assert_eq!(entry.to_command(), "permit 10.0.0.0/8 log");
    }

    #[tokio::test]
    async fn test_get() {
        let (mut node, _transport) = node_with_config(CONFIG);
        let acl = node.acls().get("mgmt").await.unwrap().unwrap();
        assert_eq!(acl.name, "mgmt");
        assert_eq!(acl.entries.len(), 3);
        assert!(node.acls().get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_all_standard_only() {
        let (mut node, transport) = node_with_config(CONFIG);
        let acls = node.acls().get_all().await.unwrap();
        assert_eq!(acls.keys().collect::<Vec<_>>(), vec!["mgmt", "other"]);
        assert_eq!(
            Some(&acls["mgmt"]),
            node.acls().get("mgmt").await.unwrap().as_ref()
        );
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_add_and_update_entry() {
        let (mut node, transport) = scripted_node();
        push_applied(&transport, 3);
        push_applied(&transport, 4);

        let entry = AclEntry::new(AclAction::Deny, "192.0.2.0", 24);
        assert!(node.acls().add_entry("mgmt", &entry, Some(40)).await.unwrap());
        assert_eq!(
            transport.cmds(0),
            json!(["enable", "configure", "ip access-list standard mgmt", "40 deny 192.0.2.0/24", "exit"])
        );

        assert!(node.acls().update_entry("mgmt", 10, &entry.log(true)).await.unwrap());
        assert_eq!(
            transport.cmds(1),
            json!([
                "enable",
                "configure",
                "ip access-list standard mgmt",
                "no 10",
                "10 deny 192.0.2.0/24 log",
                "exit"
            ])
        );
    }

    #[tokio::test]
    async fn test_create_delete_default() {
        let (mut node, transport) = scripted_node();
        push_applied(&transport, 1);
        push_applied(&transport, 1);
        push_applied(&transport, 1);
        push_applied(&transport, 3);

        node.acls().create("t").await.unwrap();
        node.acls().delete("t").await.unwrap();
        node.acls().default("t").await.unwrap();
        node.acls().remove_entry("t", 10).await.unwrap();

        assert_eq!(transport.cmds(0)[2], json!("ip access-list standard t"));
        assert_eq!(transport.cmds(1)[2], json!("no ip access-list standard t"));
        assert_eq!(transport.cmds(2)[2], json!("default ip access-list standard t"));
        assert_eq!(transport.cmds(3)[3], json!("no 10"));
    }
}
