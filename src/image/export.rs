//! Rendering a transformed image into a standalone bitmap
//!
//! The output surface is the axis-aligned bounding box of the rotated image.
//! `ExportPlan` describes the canvas calls a host makes; `rasterize` performs
//! the same mapping on raw RGBA data.

use ::image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use super::transform::ImageTransformState;
use crate::error::EditorError;
use crate::models::{Point, Rect, Size};

/// Bounding box of a `width × height` box rotated by `rotation_degrees`
pub fn export_size(width: f64, height: f64, rotation_degrees: f64) -> Size {
    let (sin, cos) = rotation_degrees.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    Size::new(width * cos + height * sin, width * sin + height * cos)
}

/// Canvas recipe: size the surface, translate, rotate, draw centered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPlan {
    pub surface: Size,
    pub translate: Point,
    pub rotation_degrees: f64,
    /// Destination rect in the translated, rotated frame
    pub draw: Rect,
}

impl ExportPlan {
    pub fn for_state(state: &ImageTransformState) -> Self {
        let surface = export_size(state.width, state.height, state.rotation_degrees);
        Self {
            surface,
            translate: Point::new(surface.width / 2.0, surface.height / 2.0),
            rotation_degrees: state.rotation_degrees,
            draw: Rect::new(-state.width / 2.0, -state.height / 2.0, state.width, state.height),
        }
    }

    /// Integer surface dimensions (at least 1×1)
    pub fn pixel_size(&self) -> (u32, u32) {
        (to_pixels(self.surface.width), to_pixels(self.surface.height))
    }
}

fn to_pixels(v: f64) -> u32 {
    v.round().max(1.0) as u32
}

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Wrap raw RGBA bytes, checking the length matches `width × height`
pub fn rgba_from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<RgbaImage, EditorError> {
    let len = pixels.len();
    RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
        EditorError::invalid_argument(
            "export",
            format!(
                "expected {} bytes for {}x{}, got {}",
                width as usize * height as usize * 4,
                width,
                height,
                len
            ),
        )
    })
}

/// Draw `source`, scaled to the plan's draw size and rotated, into a new surface
///
/// Nearest-neighbour sampling; pixels outside the rotated image stay
/// transparent.
pub fn rasterize(source: &RgbaImage, plan: &ExportPlan) -> RgbaImage {
    let (out_w, out_h) = plan.pixel_size();
    let mut out = RgbaImage::from_pixel(out_w, out_h, TRANSPARENT);
    let (src_w, src_h) = source.dimensions();
    if src_w == 0 || src_h == 0 || plan.draw.width <= 0.0 || plan.draw.height <= 0.0 {
        return out;
    }

    let scale_x = f64::from(src_w) / plan.draw.width;
    let scale_y = f64::from(src_h) / plan.draw.height;
    let origin = Point::new(f64::from(out_w) / 2.0, f64::from(out_h) / 2.0);

    for (x, y, dst) in out.enumerate_pixels_mut() {
        let sample = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        let local = sample.rotate_about(origin, -plan.rotation_degrees);
        let u = ((local.x - origin.x - plan.draw.x) * scale_x).floor();
        let v = ((local.y - origin.y - plan.draw.y) * scale_y).floor();
        if u < 0.0 || v < 0.0 || u >= f64::from(src_w) || v >= f64::from(src_h) {
            continue;
        }
        *dst = *source.get_pixel(u as u32, v as u32);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_export_size_quarter_turn_swaps() {
        let size = export_size(100.0, 50.0, 90.0);
        assert!(approx(size.width, 50.0));
        assert!(approx(size.height, 100.0));
    }

    #[test]
    fn test_export_size_diagonal() {
        let size = export_size(100.0, 100.0, 45.0);
        assert!(approx(size.width, 100.0 * std::f64::consts::SQRT_2));
    }

    #[test]
    fn test_rasterize_unrotated_copies() {
        let src = rgba_from_raw(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
        let state = ImageTransformState {
            center_x: 0.0,
            center_y: 0.0,
            width: 2.0,
            height: 1.0,
            rotation_degrees: 0.0,
        };
        let out = rasterize(&src, &ExportPlan::for_state(&state));
        assert_eq!(out, src);
    }

    #[test]
    fn test_rasterize_quarter_turn() {
        // Red on the left, blue on the right; after 90° red is on top
        let src = rgba_from_raw(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
        let state = ImageTransformState {
            center_x: 0.0,
            center_y: 0.0,
            width: 2.0,
            height: 1.0,
            rotation_degrees: 90.0,
        };
        let out = rasterize(&src, &ExportPlan::for_state(&state));
        assert_eq!(out.dimensions(), (1, 2));
        assert_eq!(out.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(0, 1), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_bad_buffer_length() {
        assert!(rgba_from_raw(2, 2, vec![0; 3]).is_err());
        assert!(rgba_from_raw(1, 1, vec![0; 4]).is_ok());
    }
}
