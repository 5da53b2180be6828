//! Print software version and navigation fixes from a receiver.
//!
//! Usage: `cargo run --example print-telemetry -- /dev/ttyUSB0`

use std::sync::atomic::{AtomicUsize, Ordering};

use skytraq::link::{connect_serial, CancelToken, Handlers, LinkConfig};
use skytraq::transport::SerialConfig;

const MAX_FIXES: usize = 10;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyUSB0".to_string());

    let mut link = connect_serial(&SerialConfig::new(port), LinkConfig::default())?;
    let cancel = CancelToken::new();
    let fixes = AtomicUsize::new(0);

    let mut handlers = Handlers::new()
        .on_software_version(|version| println!("{version}"))
        .on_navigation(|nav| {
            println!(
                "fix={} satellites={} lat={} lon={} alt={}",
                nav.fix, nav.satellite_count, nav.latitude, nav.longitude, nav.altitude
            );
            if fixes.fetch_add(1, Ordering::Relaxed) + 1 >= MAX_FIXES {
                cancel.cancel();
            }
        });

    link.run(&mut handlers, &cancel)?;
    drop(handlers);
    link.close()?;
    Ok(())
}
