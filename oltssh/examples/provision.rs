//! Provisioning example: register an ONT and give it service
//!
//! Registers the ONT on a PON port, sets its native VLAN, adds a service
//! port and prints the optical readings.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example provision -- --host 10.10.0.2 --user admin --password secret \
//!     --fsp 0/1/3 --serial 48575443A1B2C3D4 --vlan 100 --description "Customer 42"
//! ```

use std::env;

use oltssh::{FrameSlotPort, SessionBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let arg = |name: &str| {
        args.iter()
            .position(|a| a == name)
            .and_then(|i| args.get(i + 1))
            .cloned()
    };

    let (Some(host), Some(user), Some(password), Some(fsp), Some(serial), Some(vlan)) = (
        arg("--host"),
        arg("--user"),
        arg("--password"),
        arg("--fsp"),
        arg("--serial"),
        arg("--vlan"),
    ) else {
        eprintln!(
            "USAGE: provision --host <HOST> --user <USER> --password <PASS> \
             --fsp <F/S/P> --serial <SN> --vlan <VLAN> [--description <TEXT>]"
        );
        std::process::exit(1);
    };
    let fsp: FrameSlotPort = fsp.parse()?;
    let vlan: u32 = vlan.parse()?;
    let description = arg("--description").unwrap_or_default();

    let mut session = SessionBuilder::new(host)
        .username(user)
        .password(password)
        .enter_config_mode(true)
        .connect()
        .await?;

    session.enter_interface(fsp.frame, fsp.slot).await?;
    let ont_id = session.add_ont(fsp.port, &serial, &description).await?;
    println!("Registered {} as ONT {} on {}", serial, ont_id, fsp);

    session.add_native_vlan(fsp.port, ont_id).await?;

    let optical = session.get_optical_info(fsp.port, ont_id).await?;
    println!("Rx power: {} dBm", optical.rx_optical_power);
    println!("Tx power: {} dBm", optical.tx_optical_power);
    println!("Temperature: {} C", optical.temperature);

    // Service ports are configured from global config mode
    session.leave(false).await?;
    session
        .add_service_port(vlan, fsp.frame, fsp.slot, fsp.port, ont_id)
        .await?;

    for port in session
        .list_service_ports(fsp.frame, fsp.slot, fsp.port, ont_id)
        .await?
    {
        println!("Service port {} on VLAN {}", port.index, port.vlan);
    }

    session.close().await?;
    Ok(())
}
