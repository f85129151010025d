//! Arista EOS inventory example
//!
//! Connects to a switch over eAPI, prints device facts, a batch of typed
//! show commands and a few parsed config features. Optionally opens a
//! named config session, prints its diff and aborts it.
//!
//! # Prerequisites
//!
//! - EOS device with `management api http-commands` enabled
//! - Credentials with privilege to run `enable`
//!
//! # Usage
//!
//! ```bash
//! cargo run --example eos_info -- --host switch1 --user admin --password secret
//! ```
//!
//! Using a profile from eapi.conf:
//! ```bash
//! cargo run --example eos_info -- --profile leaf1
//! ```

use std::env;
use std::time::Duration;

use eosapi::show::{ShowHostname, ShowLldpNeighbors, ShowVersion};
use eosapi::{Encoding, Node, NodeBuilder, TransportKind};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    println!("=== eosapi EOS Info Example ===\n");
    let mut node = connect(&args)?;
    println!("Endpoint: {}\n", node.connection().endpoint());

    // --- Device facts ---
    println!("--- Device Facts ---\n");
    let version = node.version().await?;
    println!("Model:   {}", version.model_name);
    println!("Version: {}", version.version_number());
    println!("Serial:  {}", version.serial_number);
    println!();

    // --- Batched show commands ---
    println!("--- Batched Show Commands ---\n");
    let mut hostname = ShowHostname::default();
    let mut lldp = ShowLldpNeighbors::default();
    let mut full_version = ShowVersion::default();
    {
        let mut handle = node.get_handle(Encoding::Json);
        handle.add_command(&mut hostname)?;
        handle.add_command(&mut lldp)?;
        handle.add_command(&mut full_version)?;
        handle.call().await?;
        handle.close();
    }
    println!("Hostname: {} ({})", hostname.hostname, hostname.fqdn);
    println!("LLDP neighbors: {}", lldp.lldp_neighbors.len());
    for neighbor in &lldp.lldp_neighbors {
        println!(
            "  {:<14} -> {} {}",
            neighbor.port, neighbor.neighbor_device, neighbor.neighbor_port
        );
    }
    println!();

    // --- Parsed config ---
    println!("--- Parsed Config ---\n");
    for (vid, vlan) in node.vlans().get_all().await? {
        println!(
            "vlan {:<5} name={:<16} state={:<8} trunk groups=[{}]",
            vid,
            vlan.name,
            vlan.state,
            vlan.trunk_groups_joined()
        );
    }
    let interfaces = node.interfaces().get_all().await?;
    let down = interfaces.values().filter(|i| i.shutdown).count();
    println!("interfaces: {} configured, {} shut down", interfaces.len(), down);
    println!();

    // --- Config session demo ---
    if let Some(name) = &args.session {
        println!("--- Config Session Demo ---\n");
        let mut session = node.config_session(name).await?;
        session.config(["interface Loopback999", "description eosapi-demo"]).await?;

        let diff = session.diff().await?;
        if diff.trim().is_empty() {
            println!("No pending changes in session");
        } else {
            println!("Session diff:\n{}", diff);
        }

        session.abort().await?;
        println!("Config session aborted (demo mode)");
    }

    println!("Done!");
    Ok(())
}

fn connect(args: &Args) -> eosapi::Result<Node> {
    if let Some(profile) = &args.profile {
        println!("Connecting with profile '{}'...", profile);
        return eosapi::connect_to(profile);
    }

    println!("Connecting to {} over {}...", args.host, args.transport);
    let mut builder = NodeBuilder::new(&args.host)
        .transport(args.transport)
        .username(&args.user)
        .password(args.password.as_deref().unwrap_or_default())
        .timeout(Duration::from_secs(args.timeout));

    if let Some(port) = args.port {
        builder = builder.port(port);
    }
    if args.insecure {
        builder = builder.danger_disable_certificate_verification();
    }
    builder.build()
}

/// Simple argument parser
struct Args {
    host: String,
    port: Option<u16>,
    transport: TransportKind,
    user: String,
    password: Option<String>,
    profile: Option<String>,
    timeout: u64,
    insecure: bool,
    session: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut parsed = Self {
            host: "localhost".to_string(),
            port: None,
            transport: TransportKind::Https,
            user: env::var("USER").unwrap_or_else(|_| "admin".to_string()),
            password: None,
            profile: None,
            timeout: 30,
            insecure: false,
            session: None,
        };

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1).cloned();
            match args[i].as_str() {
                "--host" | "-h" => {
                    parsed.host = value.unwrap_or(parsed.host);
                    i += 1;
                }
                "--port" | "-p" => {
                    parsed.port = value.and_then(|v| v.parse().ok());
                    i += 1;
                }
                "--transport" | "-T" => {
                    if let Some(kind) = value.and_then(|v| v.parse().ok()) {
                        parsed.transport = kind;
                    }
                    i += 1;
                }
                "--user" | "-u" => {
                    parsed.user = value.unwrap_or(parsed.user);
                    i += 1;
                }
                "--password" | "-P" => {
                    parsed.password = value;
                    i += 1;
                }
                "--profile" => {
                    parsed.profile = value;
                    i += 1;
                }
                "--timeout" | "-t" => {
                    parsed.timeout = value.and_then(|v| v.parse().ok()).unwrap_or(30);
                    i += 1;
                }
                "--session" | "-s" => {
                    parsed.session = value;
                    i += 1;
                }
                "--insecure" | "-k" => parsed.insecure = true,
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                _ => {}
            }
            i += 1;
        }
        parsed
    }

    fn print_help() {
        println!(
            r#"eosapi EOS info example

Prints device facts, LLDP neighbors, VLANs and interface state over eAPI.

USAGE:
    cargo run --example eos_info -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>          Target host [default: localhost]
    -p, --port <PORT>          TCP port [default: per transport]
    -T, --transport <KIND>     http, https, http_local or socket [default: https]
    -u, --user <USER>          Username [default: $USER]
    -P, --password <PASS>      Password
        --profile <NAME>       Use a connection profile from eapi.conf
    -t, --timeout <SECS>       Request timeout [default: 30]
    -k, --insecure             Skip TLS certificate verification
    -s, --session <NAME>       Demo a named config session (aborted)
    --help                     Print this help message

EXAMPLES:
    cargo run --example eos_info -- --host switch1 --user admin --password secret -k
    EAPI_CONF=./eapi.conf cargo run --example eos_info -- --profile leaf1
    RUST_LOG=debug cargo run --example eos_info -- --host switch1 --user admin --password secret
"#
        );
    }
}
