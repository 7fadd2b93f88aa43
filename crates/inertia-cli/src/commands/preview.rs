use anyhow::Result;

use inertia_core::engine::preview_transform;
use inertia_core::AppConfig;

pub fn run(config: &AppConfig, delta: f64) -> Result<()> {
    let base_speed = config.tunables().base_speed;
    let pixels = preview_transform(delta, base_speed);
    println!("{} tick(s) at speed {:.1} -> {:.1} px", delta, base_speed, pixels);
    Ok(())
}
