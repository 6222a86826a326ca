// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Polls an SGP30 once per second and prints the baseline once per minute.
//!
//! Run with `RUST_LOG=debug cargo run --example console` to see bus traffic.

use std::thread;
use std::time::{Duration, Instant};

use log::{error, info};
use sgp30_i2c::{Config, Sgp30};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut sgp = Sgp30::new(Config::default())?;
    sgp.init()?;
    info!("sgp30 serial {:#014x}", sgp.serial_id());

    let mut last_baseline = Instant::now();
    loop {
        thread::sleep(Duration::from_secs(1));

        match sgp.measure() {
            Ok(quality) => info!("Measurement: {}", quality),
            Err(e) => error!("failed to measure: {}", e),
        }

        if last_baseline.elapsed() >= Duration::from_secs(60) {
            last_baseline = Instant::now();
            match sgp.get_baseline() {
                Ok(base) => info!("Baseline: eCO2 - {:#06x}, TVOC - {:#06x}", base.eco2, base.tvoc),
                Err(e) => error!("failed to get baseline: {}", e),
            }
        }
    }
}
