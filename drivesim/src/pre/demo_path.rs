use crate::core::geometry::Point;
use crate::core::path::Path;
use crate::core::render::CanvasSpec;
use anyhow::Context;
use helpers::general::InputValueError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// (px) Mean distance between two pointer samples of the demo stroke.
const SAMPLE_SPACING_MEAN: f64 = 6.0;
const SAMPLE_SPACING_STD: f64 = 3.0;
/// (px) Hand jitter perpendicular to the stroke.
const JITTER_STD: f64 = 0.8;

/// demo_path generates a path that looks like it was drawn by hand: a sine wave across the
/// canvas, sampled at irregular distances and with a little jitter, just like raw pointer
/// samples. The same seed always yields the same path.
pub fn demo_path(canvas: &CanvasSpec, seed: u64) -> anyhow::Result<Path> {
    let margin = 0.1 * canvas.width;
    if !canvas.is_drawable() || canvas.width - 2.0 * margin <= SAMPLE_SPACING_MEAN {
        return Err(InputValueError::new("canvas is too small for a demo path"))
            .context("Failed to generate demo path!");
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let spacing = Normal::new(SAMPLE_SPACING_MEAN, SAMPLE_SPACING_STD)
        .map_err(|e| anyhow::anyhow!("Invalid sample spacing distribution: {}", e))?;
    let jitter = Normal::new(0.0, JITTER_STD)
        .map_err(|e| anyhow::anyhow!("Invalid jitter distribution: {}", e))?;

    let y_mid = canvas.height / 2.0;
    let amplitude = 0.3 * canvas.height;
    let wavelength = (canvas.width - 2.0 * margin) / 1.5;
    let wave = |x: f64| {
        y_mid + amplitude * (2.0 * std::f64::consts::PI * (x - margin) / wavelength).sin()
    };

    let mut path = Path::starting_at(Point::new(margin, wave(margin)));
    let mut x = margin;

    while x < canvas.width - margin {
        // pointer events are never closer than half a pixel
        x += spacing.sample(&mut rng).abs().max(0.5);
        let x_sample = x.min(canvas.width - margin);
        path.push(Point::new(x_sample, wave(x_sample) + jitter.sample(&mut rng)));
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_path_is_reproducible_and_on_canvas() {
        let canvas = CanvasSpec::default();
        let a = demo_path(&canvas, 7).unwrap();
        let b = demo_path(&canvas, 7).unwrap();
        assert_eq!(a, b);
        assert!(a.is_drivable());
        assert!(a.len() > 20);
        assert!(a.points().iter().all(|p| canvas.contains(p)));
        assert!(a.points().windows(2).all(|seg| seg[1].x > seg[0].x));
    }

    #[test]
    fn seed_changes_the_sampling() {
        let canvas = CanvasSpec::default();
        assert_ne!(demo_path(&canvas, 1).unwrap(), demo_path(&canvas, 2).unwrap());
    }

    #[test]
    fn tiny_canvas_is_rejected() {
        let canvas = CanvasSpec {
            width: 5.0,
            height: 5.0,
            grid_pitch: 50.0,
        };
        assert!(demo_path(&canvas, 1).is_err());
    }
}
