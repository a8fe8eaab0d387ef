//! Sample driver: arms a handful of message fuses and polls until all fired.

use std::time::Duration;

use fusebox_core::{DriverConfig, FuseContainer, FuseError, FuseboxConfig, SystemClock};

/// Messages and delays (seconds) armed by the demo
pub const SAMPLE_FUSES: [(&str, u64); 6] = [
    ("Ten (10) second delay", 10),
    ("Five (5) second delay", 5),
    ("One (1) second delay", 1),
    ("Twelve (12) second delay", 12),
    ("Six (6) second delay", 6),
    ("Eight (8) second delay", 8),
];

pub async fn run(config: &FuseboxConfig) -> Result<(), FuseError> {
    let mut fuses = FuseContainer::with_config(config.container, SystemClock)?;
    for (message, secs) in SAMPLE_FUSES {
        fuses.add_secs(message.to_string(), secs, print_fired)?;
    }
    println!("armed {} fuses", fuses.len());

    drive(&mut fuses, &config.driver).await;

    let mut handle = Some(fuses);
    FuseContainer::close_handle(&mut handle);
    Ok(())
}

/// Poll every `tick_interval_ms` until the container is empty
pub async fn drive(fuses: &mut FuseContainer<String>, driver: &DriverConfig) {
    let tick = Duration::from_millis(driver.tick_interval_ms.max(1));
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    while !fuses.is_empty() {
        interval.tick().await;
        let fired = fuses.poll_all();
        if fired > 0 && driver.log_fired {
            tracing::info!(fired, live = fuses.len(), "fuses fired");
        }
    }
}

pub fn print_fired(message: String) {
    println!("[{}] {}", chrono::Local::now().format("%H:%M:%S"), message);
}
