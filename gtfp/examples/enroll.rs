//! Enrollment example
//!
//! Enrolls the next free user ID, prompting for each of the eight samples.
//!
//! ```text
//! GTFP_PORT=/dev/ttyUSB0 RUST_LOG=gtfp=debug cargo run --example enroll
//! ```

use gtfp::{Device, EnrollState, FailureReason, SerialTransport};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let port = std::env::var("GTFP_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let device = Device::open_serial(port, SerialTransport::DEFAULT_BAUD_RATE)?;
    device.open().await?;

    let user_id = device.get_entry_id().await?;
    println!("Enrolling user {}", user_id);

    let state = device
        .enroll(user_id, |sample| {
            if sample == 0 {
                println!("Place your finger on the sensor");
            } else {
                println!("Lift and place the same finger again ({}/8)", sample + 1);
            }
        })
        .await?;

    match state {
        EnrollState::Completed => println!("Enrolled as user {}", user_id),
        EnrollState::Failed(FailureReason::Quality(status)) => {
            println!("Capture rejected ({}), please try again", status)
        }
        other => println!("Enrollment stopped: {}", other),
    }

    device.close().await?;

    Ok(())
}
