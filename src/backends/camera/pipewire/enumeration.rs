// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire camera enumeration
//!
//! Cameras are discovered by parsing `pw-cli ls Node`. The libcamera
//! location property is only exposed by `pw-cli info`, so it is queried
//! per node.

use super::super::types::{CameraDevice, CameraLocation, Facing};
use tracing::{debug, info, warn};

/// Whether GStreamer and its pipewiresrc element are usable
pub fn is_pipewire_available() -> bool {
    if gstreamer::init().is_err() {
        warn!("GStreamer init failed");
        return false;
    }

    gstreamer::ElementFactory::make("pipewiresrc")
        .build()
        .is_ok()
}

/// Enumerate cameras using PipeWire
///
/// Falls back to a single auto-selected device when pw-cli is unavailable
/// or reports no video sources.
pub fn enumerate_pipewire_cameras() -> Option<Vec<CameraDevice>> {
    if !is_pipewire_available() {
        debug!("pipewiresrc not available");
        return None;
    }

    let cameras = std::process::Command::new("pw-cli")
        .args(["ls", "Node"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| parse_pw_cli_nodes(&String::from_utf8_lossy(&output.stdout)))
        .unwrap_or_default();

    if cameras.is_empty() {
        info!("Using PipeWire auto-selection (default camera)");
        return Some(vec![CameraDevice::default_device()]);
    }

    let cameras = cameras
        .into_iter()
        .map(|mut camera| {
            if let Some(node_id) = camera.node_id.as_deref() {
                camera.location = query_node_location(node_id);
            }
            camera
        })
        .collect::<Vec<_>>();

    debug!(count = cameras.len(), "Enumerated cameras via pw-cli");
    Some(cameras)
}

/// Partial node record while scanning pw-cli output
#[derive(Default)]
struct NodeRecord {
    id: Option<String>,
    serial: Option<String>,
    name: Option<String>,
    is_video_source: bool,
}

impl NodeRecord {
    fn into_device(self) -> Option<CameraDevice> {
        if !self.is_video_source {
            return None;
        }
        let id = self.id?;
        let name = self.name?;

        let path = match self.serial {
            Some(serial) => format!("pipewire-serial-{}", serial),
            None => format!("pipewire-{}", id),
        };

        debug!(id = %id, name = %name, path = %path, "Found video camera");
        Some(CameraDevice {
            name,
            path,
            node_id: Some(id),
            location: CameraLocation::Unknown,
        })
    }
}

/// Parse the output of `pw-cli ls Node` into video source devices
pub(crate) fn parse_pw_cli_nodes(output: &str) -> Vec<CameraDevice> {
    let mut cameras = Vec::new();
    let mut current = NodeRecord::default();

    for line in output.lines() {
        let trimmed = line.trim();

        // "id 76, type PipeWire:Interface:Node/3"
        if trimmed.starts_with("id ") && trimmed.contains("type PipeWire:Interface:Node") {
            cameras.extend(std::mem::take(&mut current).into_device());

            current.id = trimmed
                .strip_prefix("id ")
                .and_then(|rest| rest.split(',').next())
                .map(|id| id.trim().to_string());
            continue;
        }

        if trimmed.contains("media.class") && trimmed.contains("\"Video/Source\"") {
            current.is_video_source = true;
        } else if trimmed.contains("object.serial") {
            current.serial = extract_quoted_value(trimmed);
        } else if trimmed.contains("node.description") {
            current.name = extract_quoted_value(trimmed);
        }
    }

    cameras.extend(current.into_device());
    cameras
}

/// Extract quoted value from a property line (e.g., 'property = "value"' -> "value")
fn extract_quoted_value(line: &str) -> Option<String> {
    let start = line.find('"')?;
    let end = line[start + 1..].find('"')?;
    Some(line[start + 1..start + 1 + end].to_string())
}

/// Find a quoted property in `pw-cli info` output
pub(crate) fn find_property(output: &str, key: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| {
            line.trim_start_matches('*')
                .trim_start()
                .starts_with(key)
        })
        .and_then(extract_quoted_value)
}

fn query_node_location(node_id: &str) -> CameraLocation {
    let output = match std::process::Command::new("pw-cli")
        .args(["info", node_id])
        .output()
    {
        Ok(output) if output.status.success() => output,
        _ => {
            debug!(node_id, "Failed to query node info for location");
            return CameraLocation::Unknown;
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    match find_property(&stdout, "api.libcamera.location") {
        Some(value) => {
            debug!(node_id, location = %value, "Found location from pw-cli info");
            CameraLocation::from_property(&value)
        }
        None => CameraLocation::Unknown,
    }
}

/// Pick the device for the requested facing
///
/// Uses the reported location when present. Without location data the
/// first device is treated as the back camera and the second as the front.
pub fn select_device(devices: &[CameraDevice], facing: Facing) -> Option<&CameraDevice> {
    let wanted = match facing {
        Facing::Back => CameraLocation::Back,
        Facing::Front => CameraLocation::Front,
    };

    if let Some(device) = devices.iter().find(|d| d.location == wanted) {
        return Some(device);
    }

    match facing {
        Facing::Back => devices
            .iter()
            .find(|d| d.location != CameraLocation::Front)
            .or_else(|| devices.first()),
        Facing::Front => devices.get(1).or_else(|| devices.first()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PW_CLI_LS: &str = r#"
	id 31, type PipeWire:Interface:Node/3
 		object.serial = "31"
 		factory.id = "10"
 		node.description = "Dummy-Driver"
 		node.name = "Dummy-Driver"
 		media.class = "Audio/Sink"
	id 76, type PipeWire:Interface:Node/3
 		object.serial = "2146"
 		object.path = "libcamera:0"
 		node.description = "Integrated Rear Camera"
 		node.name = "libcamera_input.rear"
 		media.class = "Video/Source"
	id 77, type PipeWire:Interface:Node/3
 		node.description = "Integrated Front Camera"
 		node.name = "libcamera_input.front"
 		media.class = "Video/Source"
"#;

    fn device(name: &str, location: CameraLocation) -> CameraDevice {
        CameraDevice {
            name: name.to_string(),
            path: format!("pipewire-{}", name),
            node_id: None,
            location,
        }
    }

    #[test]
    fn test_parse_video_sources_only() {
        let cameras = parse_pw_cli_nodes(PW_CLI_LS);
        assert_eq!(cameras.len(), 2);

        assert_eq!(cameras[0].name, "Integrated Rear Camera");
        assert_eq!(cameras[0].path, "pipewire-serial-2146");
        assert_eq!(cameras[0].node_id.as_deref(), Some("76"));

        // No serial: falls back to node id
        assert_eq!(cameras[1].path, "pipewire-77");
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_pw_cli_nodes("").is_empty());
    }

    #[test]
    fn test_find_property_in_info() {
        let info = "id: 76\n  properties:\n*\t\tapi.libcamera.location = \"front\"\n";
        assert_eq!(
            find_property(info, "api.libcamera.location").as_deref(),
            Some("front")
        );
        assert_eq!(find_property(info, "api.libcamera.rotation"), None);
    }

    #[test]
    fn test_select_by_location() {
        let devices = vec![
            device("front", CameraLocation::Front),
            device("back", CameraLocation::Back),
        ];
        assert_eq!(select_device(&devices, Facing::Back).map(|d| d.name.as_str()), Some("back"));
        assert_eq!(select_device(&devices, Facing::Front).map(|d| d.name.as_str()), Some("front"));
    }

    #[test]
    fn test_select_without_location() {
        let devices = vec![
            device("first", CameraLocation::Unknown),
            device("second", CameraLocation::Unknown),
        ];
        assert_eq!(select_device(&devices, Facing::Back).map(|d| d.name.as_str()), Some("first"));
        assert_eq!(select_device(&devices, Facing::Front).map(|d| d.name.as_str()), Some("second"));
    }

    #[test]
    fn test_select_single_device_serves_both() {
        let devices = vec![device("only", CameraLocation::External)];
        assert_eq!(select_device(&devices, Facing::Back).map(|d| d.name.as_str()), Some("only"));
        assert_eq!(select_device(&devices, Facing::Front).map(|d| d.name.as_str()), Some("only"));
        assert!(select_device(&[], Facing::Back).is_none());
    }

    #[test]
    fn test_select_back_skips_front_only_camera() {
        let devices = vec![
            device("selfie", CameraLocation::Front),
            device("usb", CameraLocation::External),
        ];
        assert_eq!(select_device(&devices, Facing::Back).map(|d| d.name.as_str()), Some("usb"));
    }
}
