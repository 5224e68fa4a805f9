//! Identification example
//!
//! Prints module information, then matches fingers until Ctrl-C.

use std::time::Duration;

use gtfp::{Device, LedState, SerialTransport};
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let port = std::env::var("GTFP_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let device = Device::open_serial(port, SerialTransport::DEFAULT_BAUD_RATE)?;

    let info = device.open_with_info().await?;
    match info.release_date() {
        Some(date) => println!("Module released {} (sensor 0x{:02X})", date, info.sensor_type),
        None => println!("Module sensor 0x{:02X}", info.sensor_type),
    }
    println!("{}", device.get_fw_version().await?);
    println!("{} users enrolled", device.get_user_count().await?);

    device.set_led(LedState::On).await?;

    loop {
        if !device.is_finger_pressed().await? {
            sleep(Duration::from_millis(200)).await;
            continue;
        }

        match device.identify().await {
            Ok(Some(user_id)) => println!("Matched user {}", user_id),
            Ok(None) => println!("No match"),
            Err(e) if e.is_recoverable() => println!("Try again: {}", e),
            Err(e) => return Err(e.into()),
        }
    }
}
