//! Window-to-viewport coordinate transform and pixel scaling (spec component
//! C6).

use crate::header::DecodedHeader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMode {
    Anisotropic,
    Other(u16),
}

impl From<u16> for MapMode {
    fn from(v: u16) -> Self {
        if v == 8 {
            MapMode::Anisotropic
        } else {
            MapMode::Other(v)
        }
    }
}

/// Window/viewport extents, origins, and the global pixel scale. `SETMAPMODE`
/// is recorded but - per spec §4.6/§9 - never changes how the transform is
/// computed; every mode is treated anisotropically.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub window_org_x: f64,
    pub window_org_y: f64,
    pub window_ext_x: f64,
    pub window_ext_y: f64,
    pub viewport_org_x: f64,
    pub viewport_org_y: f64,
    pub viewport_ext_x: f64,
    pub viewport_ext_y: f64,
    pub map_mode: MapMode,
    pub scaling: f64,
}

/// Resolved output canvas size, in pixels.
#[derive(Debug, Clone, Copy)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl Transform {
    /// Derives the initial transform and canvas size from the decoded
    /// header and the caller's requested image dimensions (spec §4.6).
    pub fn initial(header: &DecodedHeader, req_width: f64, req_height: f64) -> (Self, CanvasSize) {
        match header.placeable {
            Some(placeable) => {
                let window_org_x = placeable.dst.left as f64;
                let window_org_y = placeable.dst.top as f64;
                let window_ext_x = (placeable.dst.right - placeable.dst.left) as f64;
                let window_ext_y = (placeable.dst.bottom - placeable.dst.top) as f64;

                let (scaling, width, height) = if req_width > 0.0 && req_height > 0.0 {
                    let scale_x = req_width / window_ext_x;
                    let scale_y = req_height / window_ext_y;
                    (scale_x.min(scale_y), req_width, req_height)
                } else if req_width > 0.0 {
                    let scaling = req_width / window_ext_x;
                    (scaling, req_width, window_ext_y * scaling)
                } else if req_height > 0.0 {
                    let scaling = req_height / window_ext_y;
                    (scaling, window_ext_x * scaling, req_height)
                } else {
                    let scaling = 96.0 / placeable.inch as f64;
                    (scaling, window_ext_x * scaling, window_ext_y * scaling)
                };

                let transform = Transform {
                    window_org_x,
                    window_org_y,
                    window_ext_x,
                    window_ext_y,
                    viewport_org_x: window_org_x,
                    viewport_org_y: window_org_y,
                    viewport_ext_x: window_ext_x,
                    viewport_ext_y: window_ext_y,
                    map_mode: MapMode::Anisotropic,
                    scaling,
                };
                (transform, CanvasSize { width, height })
            }
            None => {
                let transform = Transform {
                    window_org_x: 0.0,
                    window_org_y: 0.0,
                    window_ext_x: 1000.0,
                    window_ext_y: 1000.0,
                    viewport_org_x: 0.0,
                    viewport_org_y: 0.0,
                    viewport_ext_x: 1000.0,
                    viewport_ext_y: 1000.0,
                    map_mode: MapMode::Anisotropic,
                    scaling: 1.0,
                };
                (
                    transform,
                    CanvasSize {
                        width: 1000.0,
                        height: 1000.0,
                    },
                )
            }
        }
    }

    pub fn scale_x(&self, x: i16) -> f64 {
        let x = x as f64;
        let mapped = if self.window_ext_x != 0.0 {
            (x - self.window_org_x) * (self.viewport_ext_x / self.window_ext_x)
                + self.viewport_org_x
        } else {
            x
        };
        mapped * self.scaling
    }

    pub fn scale_y(&self, y: i16) -> f64 {
        let y = y as f64;
        let mapped = if self.window_ext_y != 0.0 {
            (y - self.window_org_y) * (self.viewport_ext_y / self.window_ext_y)
                + self.viewport_org_y
        } else {
            y
        };
        mapped * self.scaling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{decode, PLACEABLE_MAGIC};

    fn placeable_header_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&PLACEABLE_MAGIC.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&0i16.to_le_bytes());
        bytes.extend_from_slice(&0i16.to_le_bytes());
        bytes.extend_from_slice(&100i16.to_le_bytes());
        bytes.extend_from_slice(&200i16.to_le_bytes());
        bytes.extend_from_slice(&1440u16.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // Type
        bytes.extend_from_slice(&9u16.to_le_bytes()); // HeaderSize
        bytes.extend_from_slice(&0x0300u16.to_le_bytes()); // Version
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes
    }

    #[test]
    fn coordinate_mapping_is_linear() {
        let header = decode(&placeable_header_bytes()).unwrap();
        let (t, _) = Transform::initial(&header, 0.0, 0.0);
        let d = t.scale_x(10) - t.scale_x(4);
        let expected = (10.0 - 4.0) * (t.viewport_ext_x / t.window_ext_x) * t.scaling;
        assert!((d - expected).abs() < 1e-9);
    }

    #[test]
    fn dpi_fallback_targets_96_dpi() {
        let header = decode(&placeable_header_bytes()).unwrap();
        let (t, size) = Transform::initial(&header, 0.0, 0.0);
        assert!((t.scaling - 96.0 / 1440.0).abs() < 1e-9);
        assert!((size.width - 100.0 * t.scaling).abs() < 1e-9);
        assert!((size.height - 200.0 * t.scaling).abs() < 1e-9);
    }

    #[test]
    fn both_dimensions_requested_uses_the_smaller_scale() {
        let header = decode(&placeable_header_bytes()).unwrap();
        let (t, size) = Transform::initial(&header, 50.0, 50.0);
        assert_eq!(size.width, 50.0);
        assert_eq!(size.height, 50.0);
        assert!((t.scaling - (50.0f64 / 100.0).min(50.0 / 200.0)).abs() < 1e-9);
    }

    #[test]
    fn no_placeable_header_uses_1000_unit_default() {
        let transform = Transform {
            window_org_x: 0.0,
            window_org_y: 0.0,
            window_ext_x: 1000.0,
            window_ext_y: 1000.0,
            viewport_org_x: 0.0,
            viewport_org_y: 0.0,
            viewport_ext_x: 1000.0,
            viewport_ext_y: 1000.0,
            map_mode: MapMode::Anisotropic,
            scaling: 1.0,
        };
        assert_eq!(transform.scale_x(500), 500.0);
    }
}
