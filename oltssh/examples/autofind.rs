//! Autofind example: list ONTs the OLT has discovered but not registered
//!
//! # Usage
//!
//! ```bash
//! cargo run --example autofind -- --host 10.10.0.2 --user admin --password secret
//! ```
//!
//! Through a jump host:
//! ```bash
//! cargo run --example autofind -- --host 10.10.0.2 --user admin --password secret \
//!     --jump bastion.example.net --jump-user ops --jump-password hop-secret
//! ```

use std::env;
use std::time::Duration;

use oltssh::SessionBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let Some(password) = &args.password else {
        eprintln!("Error: Must provide --password");
        std::process::exit(1);
    };

    println!("Connecting to {}:{}...", args.host, args.port);

    let mut builder = SessionBuilder::new(&args.host)
        .port(args.port)
        .username(&args.user)
        .password(password)
        .timeout(Duration::from_secs(args.timeout))
        .enter_config_mode(true);

    if let Some(jump) = &args.jump {
        builder = builder.jump_host(
            jump,
            args.jump_port,
            args.jump_user.as_deref().unwrap_or(&args.user),
            args.jump_password.as_deref().unwrap_or(password),
        );
    }

    let mut session = builder.connect().await?;
    println!("Connected, session is in {}", session.level());

    let onts = session.list_unmanaged_onts().await?;
    if onts.is_empty() {
        println!("No unregistered ONTs found");
    } else {
        println!("{:<6} {:<10} {:<18} {:<12} {}", "NUMBER", "F/S/P", "SERIAL", "VENDOR", "FOUND");
        println!("{}", "-".repeat(70));
        for ont in &onts {
            println!(
                "{:<6} {:<10} {:<18} {:<12} {}",
                ont.number,
                ont.fsp.to_string(),
                ont.serial_number(),
                ont.vendor_id,
                ont.autofind_time
            );
        }
    }

    println!("\nClosing session...");
    session.close().await?;
    println!("Done!");

    Ok(())
}

/// Simple argument parser
struct Args {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    jump: Option<String>,
    jump_port: u16,
    jump_user: Option<String>,
    jump_password: Option<String>,
    timeout: u64,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut parsed = Self {
            host: "localhost".to_string(),
            port: 22,
            user: env::var("USER").unwrap_or_else(|_| "root".to_string()),
            password: None,
            jump: None,
            jump_port: 22,
            jump_user: None,
            jump_password: None,
            timeout: 30,
        };

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1).cloned();
            match args[i].as_str() {
                "--host" | "-h" => parsed.host = value.unwrap_or(parsed.host),
                "--port" | "-p" => parsed.port = value.and_then(|v| v.parse().ok()).unwrap_or(22),
                "--user" | "-u" => parsed.user = value.unwrap_or(parsed.user),
                "--password" | "-P" => parsed.password = value,
                "--jump" => parsed.jump = value,
                "--jump-port" => {
                    parsed.jump_port = value.and_then(|v| v.parse().ok()).unwrap_or(22)
                }
                "--jump-user" => parsed.jump_user = value,
                "--jump-password" => parsed.jump_password = value,
                "--timeout" | "-t" => {
                    parsed.timeout = value.and_then(|v| v.parse().ok()).unwrap_or(30)
                }
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {}", other);
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }

        parsed
    }

    fn print_help() {
        println!(
            r#"oltssh autofind example

USAGE:
    cargo run --example autofind -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>            OLT address [default: localhost]
    -p, --port <PORT>            SSH port [default: 22]
    -u, --user <USER>            Username [default: $USER]
    -P, --password <PASS>        Password for authentication
    --jump <HOST>                Jump host address
    --jump-port <PORT>           Jump host SSH port [default: 22]
    --jump-user <USER>           Jump host username [default: --user]
    --jump-password <PASS>       Jump host password [default: --password]
    -t, --timeout <SECS>         Connection timeout [default: 30]
    --help                       Print this help message
"#
        );
    }
}
