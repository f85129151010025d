//! Global system settings: hostname, IP routing and banners.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Entity, Setting};
use crate::connection::Command;
use crate::error::Result;
use crate::node::Node;

static HOSTNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^hostname\s+(\S+)\s*$").unwrap());
static IPROUTING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^ip routing\s*$").unwrap());
static MOTD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?ms)^banner motd\n(.*?)^EOF$").unwrap());
static LOGIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?ms)^banner login\n(.*?)^EOF$").unwrap());

/// Which login banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    Login,
    Motd,
}

impl Banner {
    fn verb(self) -> &'static str {
        match self {
            Self::Login => "banner login",
            Self::Motd => "banner motd",
        }
    }
}

/// Parsed system settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemConfig {
    pub hostname: String,
    pub iprouting: bool,
    pub banner_motd: Option<String>,
    pub banner_login: Option<String>,
}

impl SystemConfig {
    /// Parse settings from a full running config.
    pub fn parse(config: &str) -> Self {
        let banner = |re: &Regex| {
            re.captures(config)
                .map(|caps| caps[1].trim_end_matches('\n').to_string())
        };
        Self {
            hostname: HOSTNAME_RE
                .captures(config)
                .map(|caps| caps[1].to_string())
                .unwrap_or_default(),
            iprouting: IPROUTING_RE.is_match(config),
            banner_motd: banner(&MOTD_RE),
            banner_login: banner(&LOGIN_RE),
        }
    }
}

/// System settings API.
pub struct System<'a> {
    entity: Entity<'a>,
}

impl<'a> System<'a> {
    pub fn new(node: &'a mut Node) -> Self {
        Self {
            entity: Entity::new(node),
        }
    }

    pub async fn get(&mut self) -> Result<SystemConfig> {
        Ok(SystemConfig::parse(self.entity.config().await?))
    }

    pub async fn set_hostname(&mut self, hostname: Setting<'_>) -> Result<bool> {
        self.entity.configure([hostname.command("hostname")]).await
    }

    /// Enable or disable IPv4 routing.
    pub async fn set_iprouting(&mut self, enable: bool) -> Result<bool> {
        let command = if enable {
            Setting::Value("")
        } else {
            Setting::Disable
        };
        self.entity.configure([command.command("ip routing")]).await
    }

    /// Set a banner. The text is sent as command input so it may span lines.
    pub async fn set_banner(&mut self, banner: Banner, text: Setting<'_>) -> Result<bool> {
        let command = match text {
            Setting::Value(text) if !text.is_empty() => Command::with_input(banner.verb(), text),
            other => Command::from(other.command(banner.verb())),
        };
        self.entity.configure([command]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::*;
    use serde_json::json;

    const CONFIG: &str = "\
hostname leaf1
ip routing
banner motd
Authorized access only
Second line
EOF
interface Ethernet1
   no shutdown
";

    #[test]
    fn test_parse() {
        let system = SystemConfig::parse(CONFIG);
        assert_eq!(system.hostname, "leaf1");
        assert!(system.iprouting);
        assert_eq!(
            system.banner_motd.as_deref(),
            Some("Authorized access only\nSecond line")
        );
        assert_eq!(system.banner_login, None);
    }

    #[test]
    fn test_parse_routing_disabled() {
        let system = SystemConfig::parse("hostname x\nno ip routing\n");
        assert!(!system.iprouting);
    }

    #[tokio::test]
    async fn test_get_reads_running_config() {
        let (mut node, _transport) = node_with_config(CONFIG);
        let system = node.system().get().await.unwrap();
        assert_eq!(system.hostname, "leaf1");
    }

    #[tokio::test]
    async fn test_setters() {
        let (mut node, transport) = scripted_node();
        for _ in 0..4 {
            push_applied(&transport, 1);
        }

        node.system().set_hostname(Setting::Value("sw2")).await.unwrap();
        node.system().set_iprouting(false).await.unwrap();
        node.system()
            .set_banner(Banner::Login, Setting::Value("hello\nworld"))
            .await
            .unwrap();
        node.system().set_banner(Banner::Motd, Setting::Default).await.unwrap();

        assert_eq!(transport.cmds(0)[2], json!("hostname sw2"));
        assert_eq!(transport.cmds(1)[2], json!("no ip routing"));
        assert_eq!(
            transport.cmds(2)[2],
            json!({"cmd": "banner login", "input": "hello\nworld"})
        );
        assert_eq!(transport.cmds(3)[2], json!("default banner motd"));
    }
}
