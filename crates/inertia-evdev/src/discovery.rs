//! Scroll wheel device discovery

use std::path::{Path, PathBuf};

use evdev::{AttributeSetRef, Device, RelativeAxisType};
use tracing::{debug, warn};

use inertia_core::{Error, Result};

/// A pointer device with a vertical wheel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelDevice {
    pub path: PathBuf,
    pub name: String,
    /// Reports `REL_WHEEL_HI_RES`
    pub hi_res: bool,
}

/// Whether a device should be grabbed
///
/// Needs a vertical wheel and pointer motion; our own virtual pointer is
/// never a candidate.
pub fn qualifies(
    name: Option<&str>,
    axes: Option<&AttributeSetRef<RelativeAxisType>>,
    virtual_name: &str,
) -> bool {
    if name == Some(virtual_name) {
        return false;
    }
    axes.is_some_and(|axes| {
        axes.contains(RelativeAxisType::REL_WHEEL)
            && (axes.contains(RelativeAxisType::REL_X) || axes.contains(RelativeAxisType::REL_Y))
    })
}

fn describe(path: &Path, device: &Device) -> WheelDevice {
    WheelDevice {
        path: path.to_path_buf(),
        name: device.name().unwrap_or("unknown").to_string(),
        hi_res: device
            .supported_relative_axes()
            .is_some_and(|axes| axes.contains(RelativeAxisType::REL_WHEEL_HI_RES)),
    }
}

fn candidates(virtual_name: &str) -> Vec<(PathBuf, Device)> {
    let mut found: Vec<_> = evdev::enumerate()
        .filter(|(_, device)| {
            qualifies(device.name(), device.supported_relative_axes(), virtual_name)
        })
        .collect();
    found.sort_by(|a, b| a.0.cmp(&b.0));
    found
}

/// Wheel devices visible to this process
pub fn list_wheel_devices(virtual_name: &str) -> Vec<WheelDevice> {
    candidates(virtual_name)
        .iter()
        .map(|(path, device)| describe(path, device))
        .collect()
}

/// Open the configured devices, or every candidate when none are configured
pub fn open_devices(paths: &[PathBuf], virtual_name: &str) -> Result<Vec<(PathBuf, Device)>> {
    if paths.is_empty() {
        let found = candidates(virtual_name);
        for (path, device) in &found {
            debug!(path = %path.display(), name = ?device.name(), "Found wheel device");
        }
        return Ok(found);
    }

    paths
        .iter()
        .map(|path| {
            let device = Device::open(path).map_err(|e| {
                Error::FilterInstall(format!("cannot open {}: {}", path.display(), e))
            })?;
            if !qualifies(device.name(), device.supported_relative_axes(), virtual_name) {
                warn!(path = %path.display(), "Configured device has no scroll wheel");
            }
            Ok((path.clone(), device))
        })
        .collect()
}
