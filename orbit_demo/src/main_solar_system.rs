//! Solar system demo
//!
//! Usage: `solar_system [config.toml|config.ron]`

use std::path::PathBuf;

use orbit_demo::harness::run_demo;
use orbit_demo::content::DemoContent;
use orbit_demo::solar_system::SolarSystem;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);

    // Helpers appear one second in
    let mut app = SolarSystem::new(Some(60));
    let summary = run_demo("solar system", &mut app, DemoContent::default(), config_path.as_deref())?;

    if let Some(nodes) = app.nodes() {
        log::info!("Moon node {:?} finished at t={:.2}s", nodes.moon, summary.final_time);
    }
    Ok(())
}
