//! VLAN database.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Entity, Setting};
use crate::error::{Error, Result};
use crate::node::Node;
use crate::section;

static VLAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^vlan (\d[\d,\-]*)$").unwrap());
static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s+name\s+(.+?)\s*$").unwrap());
static STATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s+state\s+(\S+)").unwrap());
static TRUNK_GROUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s+trunk group\s+(\S+)").unwrap());

/// A configured VLAN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlanConfig {
    pub vlan_id: u16,
    pub name: String,
    pub state: String,
    pub trunk_groups: BTreeSet<String>,
}

impl VlanConfig {
    /// Parse a `vlan <id>` block.
    pub fn parse(vlan_id: u16, block: &str) -> Self {
        let first = |re: &Regex| re.captures(block).map(|caps| caps[1].to_string());
        Self {
            vlan_id,
            name: first(&NAME_RE).unwrap_or_default(),
            state: first(&STATE_RE).unwrap_or_else(|| "active".to_string()),
            trunk_groups: TRUNK_GROUP_RE
                .captures_iter(block)
                .map(|caps| caps[1].to_string())
                .collect(),
        }
    }

    /// Trunk groups as a comma-joined string.
    pub fn trunk_groups_joined(&self) -> String {
        self.trunk_groups
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Reject ids outside 1-4094 before anything is sent.
fn check_vid(vid: u16) -> Result<()> {
    if (1..=4094).contains(&vid) {
        Ok(())
    } else {
        Err(Error::usage(format!("invalid VLAN id {vid}, expected 1-4094")))
    }
}

/// VLAN API.
pub struct Vlans<'a> {
    entity: Entity<'a>,
}

impl<'a> Vlans<'a> {
    pub fn new(node: &'a mut Node) -> Self {
        Self {
            entity: Entity::new(node),
        }
    }

    /// A single VLAN, including ones listed only in a compressed range line.
    pub async fn get(&mut self, vid: u16) -> Result<Option<VlanConfig>> {
        Ok(self.get_all().await?.shift_remove(&vid))
    }

    /// Every VLAN keyed by id, in config order.
    ///
    /// VLANs without sub-config appear on range lines such as
    /// `vlan 10-12,20`; each id there gets a default record.
    pub async fn get_all(&mut self) -> Result<IndexMap<u16, VlanConfig>> {
        Ok(parse_vlans(self.entity.config().await?))
    }

    pub async fn create(&mut self, vid: u16) -> Result<bool> {
        check_vid(vid)?;
        self.entity.configure([format!("vlan {vid}")]).await
    }

    pub async fn delete(&mut self, vid: u16) -> Result<bool> {
        check_vid(vid)?;
        self.entity.configure([format!("no vlan {vid}")]).await
    }

    pub async fn default(&mut self, vid: u16) -> Result<bool> {
        check_vid(vid)?;
        self.entity.configure([format!("default vlan {vid}")]).await
    }

    pub async fn set_name(&mut self, vid: u16, name: Setting<'_>) -> Result<bool> {
        self.configure_vlan(vid, vec![name.command("name")]).await
    }

    /// Set the state, `active` or `suspend`.
    pub async fn set_state(&mut self, vid: u16, state: Setting<'_>) -> Result<bool> {
        self.configure_vlan(vid, vec![state.command("state")]).await
    }

    /// Make the VLAN's trunk groups exactly `groups`.
    ///
    /// Only the difference from the current config is sent; returns
    /// `Ok(false)` when nothing changes.
    pub async fn set_trunk_groups(&mut self, vid: u16, groups: &[&str]) -> Result<bool> {
        check_vid(vid)?;
        let current = self
            .get(vid)
            .await?
            .map(|vlan| vlan.trunk_groups)
            .unwrap_or_default();
        let wanted: BTreeSet<String> = groups.iter().map(|g| g.to_string()).collect();

        let mut commands: Vec<String> = wanted
            .difference(&current)
            .map(|g| format!("trunk group {g}"))
            .collect();
        commands.extend(current.difference(&wanted).map(|g| format!("no trunk group {g}")));

        if commands.is_empty() {
            return Ok(false);
        }
        self.configure_vlan(vid, commands).await
    }

    pub async fn add_trunk_group(&mut self, vid: u16, group: &str) -> Result<bool> {
        self.configure_vlan(vid, vec![format!("trunk group {group}")])
            .await
    }

    pub async fn remove_trunk_group(&mut self, vid: u16, group: &str) -> Result<bool> {
        self.configure_vlan(vid, vec![format!("no trunk group {group}")])
            .await
    }

    async fn configure_vlan(&mut self, vid: u16, commands: Vec<String>) -> Result<bool> {
        check_vid(vid)?;
        let mut batch = vec![format!("vlan {vid}")];
        batch.extend(commands);
        self.entity.configure(batch).await
    }
}

/// Parse every `vlan` block in a running config.
pub fn parse_vlans(config: &str) -> IndexMap<u16, VlanConfig> {
    let mut vlans = IndexMap::new();
    for (caps, block) in section::blocks(config, &VLAN_RE) {
        for vid in expand_vlan_list(&caps[1]) {
            vlans
                .entry(vid)
                .or_insert_with(|| VlanConfig::parse(vid, block));
        }
    }
    vlans
}

/// Expand an EOS VLAN list such as `10-12,20` into ids, skipping
/// malformed or out-of-range parts.
fn expand_vlan_list(list: &str) -> Vec<u16> {
    let mut ids = Vec::new();
    for part in list.split(',') {
        let (lo, hi) = match part.split_once('-') {
            Some((lo, hi)) => (lo.parse::<u16>(), hi.parse::<u16>()),
            None => (part.parse::<u16>(), part.parse::<u16>()),
        };
        let (Ok(lo), Ok(hi)) = (lo, hi) else {
            continue;
        };
        ids.extend((lo..=hi).filter(|vid| check_vid(*vid).is_ok()));
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    const CONFIG: &str = "\
vlan internal order ascending range 1006 1199
vlan 1
   name default
   state active
vlan 10
   name servers
   state suspend
   trunk group mlagpeer
   trunk group anet
interface Ethernet1
   no shutdown
";

    #[test]
    fn test_parse_normalizes_trunk_groups() {
        let block = section::section(CONFIG, "^vlan 10$").unwrap();
        let vlan = VlanConfig::parse(10, &block);
        assert_eq!(vlan.name, "servers");
        assert_eq!(vlan.state, "suspend");
        assert_eq!(
            vlan.trunk_groups.iter().collect::<Vec<_>>(),
            vec!["anet", "mlagpeer"]
        );
        assert_eq!(vlan.trunk_groups_joined(), "anet,mlagpeer");
    }

    #[tokio::test]
    async fn test_get_and_get_all() {
        let (mut node, transport) = node_with_config(CONFIG);
        let vlan = node.vlans().get(1).await.unwrap().unwrap();
        assert_eq!(vlan.name, "default");
        assert!(vlan.trunk_groups.is_empty());
        assert!(node.vlans().get(20).await.unwrap().is_none());

        let all = node.vlans().get_all().await.unwrap();
        assert_eq!(all.keys().copied().collect::<Vec<_>>(), vec![1, 10]);
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_compressed_range_lines() {
        let config = "\
vlan 10
   name servers
vlan 20-22,30,4090-4099
vlan 40
   state suspend
";
        let vlans = parse_vlans(config);
        assert_eq!(
            vlans.keys().copied().collect::<Vec<_>>(),
            vec![10, 20, 21, 22, 30, 4090, 4091, 4092, 4093, 4094, 40]
        );
        assert_eq!(vlans[&10].name, "servers");
        assert_eq!(vlans[&21].name, "");
        assert_eq!(vlans[&21].state, "active");
        assert_eq!(vlans[&40].state, "suspend");
    }

    #[tokio::test]
    async fn test_get_vlan_from_range_line() {
        let (mut node, _transport) = node_with_config("vlan 1\n   name default\nvlan 100-102\n");
        let vlan = node.vlans().get(101).await.unwrap().unwrap();
        assert_eq!(vlan.vlan_id, 101);
        assert!(vlan.trunk_groups.is_empty());
        assert!(node.vlans().get(103).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_trunk_groups_sends_difference() {
        let (mut node, transport) = node_with_config(CONFIG);
        push_applied(&transport, 3);

        let applied = node
            .vlans()
            .set_trunk_groups(10, &["anet", "storage"])
            .await
            .unwrap();
        assert!(applied);
        assert_eq!(
            transport.cmds(1),
            json!([
                "enable",
                "configure",
                "vlan 10",
                "trunk group storage",
                "no trunk group mlagpeer"
            ])
        );
    }

    #[tokio::test]
    async fn test_set_trunk_groups_no_change() {
        let (mut node, transport) = node_with_config(CONFIG);
        let applied = node
            .vlans()
            .set_trunk_groups(10, &["mlagpeer", "anet"])
            .await
            .unwrap();
        assert!(!applied);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_setters_and_lifecycle() {
        let (mut node, transport) = scripted_node();
        push_applied(&transport, 1);
        push_applied(&transport, 2);
        push_applied(&transport, 2);
        push_applied(&transport, 1);

        node.vlans().create(20).await.unwrap();
        node.vlans().set_name(20, Setting::Value("web")).await.unwrap();
        node.vlans().set_state(20, Setting::Default).await.unwrap();
        node.vlans().delete(20).await.unwrap();

        assert_eq!(transport.cmds(0)[2], json!("vlan 20"));
        assert_eq!(transport.cmds(1), json!(["enable", "configure", "vlan 20", "name web"]));
        assert_eq!(transport.cmds(2)[3], json!("default state"));
        assert_eq!(transport.cmds(3)[2], json!("no vlan 20"));
    }

    #[tokio::test]
    async fn test_invalid_vid_rejected() {
        let (mut node, transport) = scripted_node();
        let err = node.vlans().create(5000).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        let err = node.vlans().add_trunk_group(0, "x").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(transport.requests().is_empty());
    }
}
