//! Reads a CO2 monitor on a background thread and prints the latest values
//! every few seconds. Requires such a device and read/write access to its
//! hidraw node.
//!
//! ```text
//! cargo run --example watch-device -- /dev/hidraw0
//! ```

#[cfg(target_os = "linux")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::sync::Arc;
    use std::time::Duration;

    use co2mon::monitor::{connect, render_prometheus, spawn, Readings};

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/hidraw0".to_string());

    let source = connect(&path)?;
    let readings = Arc::new(Readings::new());
    let handle = spawn(source, Arc::clone(&readings))?;

    for _ in 0..10 {
        std::thread::sleep(Duration::from_secs(3));
        if handle.is_finished() {
            break;
        }
        print!("{}", render_prometheus(&readings.snapshot())?);
    }

    handle.stop();
    handle.join()?;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn main() {
    eprintln!("watch-device needs Linux hidraw");
}
