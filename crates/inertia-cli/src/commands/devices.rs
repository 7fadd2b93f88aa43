use anyhow::Result;

use inertia_core::AppConfig;
use inertia_evdev::list_wheel_devices;

pub fn run(config: &AppConfig) -> Result<()> {
    let devices = list_wheel_devices(&config.devices.virtual_name);

    if devices.is_empty() {
        println!("No scroll wheel devices found.");
        println!("\nMake sure you can read /dev/input/event* (e.g. add yourself to the 'input' group).");
        return Ok(());
    }

    println!("Scroll wheel devices ({}):\n", devices.len());

    for device in &devices {
        let grabbed = if config.devices.paths.is_empty() || config.devices.paths.contains(&device.path) {
            ""
        } else {
            " [not configured]"
        };
        let resolution = if device.hi_res { "hi-res" } else { "detent only" };

        println!("  {} - {}{}", device.path.display(), device.name, grabbed);
        println!("    Wheel: {}", resolution);
    }

    Ok(())
}
