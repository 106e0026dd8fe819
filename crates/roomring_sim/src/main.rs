//! Roomwalk - headless room ring driver
//!
//! Walks a scripted agent around a room ring and logs every room swap.
//!
//! Run with: cargo run -p roomring_sim -- [config.toml]

mod sim_config;
mod walk;

use sim_config::SimConfig;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args().nth(1);
    let config = match SimConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    config.print_summary();

    match walk::run(&config) {
        Ok(report) => {
            log::info!(
                "Walk finished: {} ticks, {} swaps",
                report.stats.ticks,
                report.stats.swaps
            );
            for (slot, template) in &report.final_rooms {
                log::info!("  slot {}: {}", slot, template);
            }
            if report.leaked > 0 {
                log::warn!("{} rooms still live after teardown", report.leaked);
            }
        }
        Err(e) => {
            log::error!("Walk failed: {}", e);
            std::process::exit(1);
        }
    }
}
