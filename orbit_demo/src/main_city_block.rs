//! City block demo
//!
//! Usage: `city_block [config.toml|config.ron]`

use std::path::PathBuf;

use orbit_demo::city_block::CityBlock;
use orbit_demo::content::DemoContent;
use orbit_demo::harness::run_demo;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);

    let mut app = CityBlock::with_default_script();
    run_demo("city block", &mut app, DemoContent::default(), config_path.as_deref())?;

    if app.rejected() > 0 {
        log::warn!("{} control panel edit(s) were refused", app.rejected());
    }
    Ok(())
}
