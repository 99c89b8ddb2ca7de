//! Router audit example: connect to an OpenWrt router and run every
//! diagnostic once.
//!
//! # Prerequisites
//!
//! - An OpenWrt router (or VM) reachable over SSH
//! - Root password
//!
//! # Usage
//!
//! ```bash
//! cargo run --example router_audit -- --host 192.168.1.1 --user root --password secret
//! ```

use std::env;
use std::time::Duration;

use routerscope::{HostKeyVerification, RouterManager, RouterTarget};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug to see every command)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let Some(password) = args.password else {
        eprintln!("Error: --password is required");
        std::process::exit(1);
    };

    let mut builder = RouterManager::builder()
        .command_timeout(Duration::from_secs(args.timeout))
        .environment(env::var("ROUTERSCOPE_ENV").unwrap_or_else(|_| "development".to_string()));
    if args.insecure {
        builder = builder.host_key_verification(HostKeyVerification::Disabled);
    }
    let manager = builder.build()?;

    println!("Connecting to {}:{}...", args.host, args.port);
    let connection = manager
        .connect(RouterTarget::new(&args.host, &args.user, password).port(args.port))
        .await?;
    let id = connection.connection_id.to_string();

    let info = &connection.router_info;
    println!("Connected as {id}");
    println!("  hostname: {}", info.hostname);
    println!("  version:  {}", info.version);
    println!("  uptime:   {}", info.uptime);

    let stats = manager.stats(&id).await?;
    println!(
        "\nCPU {}%  memory {}%  storage {}%",
        stats.cpu, stats.memory, stats.storage
    );

    println!("\nDevices:");
    for device in manager.devices(&id).await? {
        println!(
            "  {:>3}  {:<20} {:<16} {}  (lease until {})",
            device.id, device.name, device.ip, device.mac, device.lease_expiry
        );
    }

    println!("\nAudit:");
    for finding in manager.audit(&id).await? {
        println!(
            "  [{:?}] {}: {}",
            finding.status, finding.category, finding.message
        );
    }

    println!("\nHealth: {}", serde_json::to_string_pretty(&manager.health())?);

    manager.shutdown().await;
    println!("Done!");
    Ok(())
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    timeout: u64,
    insecure: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "192.168.1.1".to_string();
        let mut port = 22u16;
        let mut user = "root".to_string();
        let mut password = None;
        let mut timeout = 10u64;
        let mut insecure = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    i += 1;
                    if i < args.len() {
                        host = args[i].clone();
                    }
                }
                "--port" | "-p" => {
                    i += 1;
                    if i < args.len() {
                        port = args[i].parse().unwrap_or(22);
                    }
                }
                "--user" | "-u" => {
                    i += 1;
                    if i < args.len() {
                        user = args[i].clone();
                    }
                }
                "--password" | "-P" => {
                    i += 1;
                    if i < args.len() {
                        password = Some(args[i].clone());
                    }
                }
                "--timeout" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        timeout = args[i].parse().unwrap_or(10);
                    }
                }
                "--insecure" => insecure = true,
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                }
            }
            i += 1;
        }

        Self {
            host,
            port,
            user,
            password,
            timeout,
            insecure,
        }
    }

    fn print_help() {
        println!(
            r#"routerscope router_audit example

USAGE:
    cargo run --example router_audit -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>        Router address [default: 192.168.1.1]
    -p, --port <PORT>        SSH port [default: 22]
    -u, --user <USER>        Username [default: root]
    -P, --password <PASS>    Password for authentication
    -t, --timeout <SECS>     Per-command timeout [default: 10]
    --insecure               Skip host key verification
    --help                   Print this help message
"#
        );
    }
}
