use std::f64::consts::TAU;

use super::Point3;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum HelixError {
    #[error("helix requires at least 2 samples, got {0}")]
    NotEnoughSamples(usize),
    #[error("helix radius must be finite and > 0, got {0}")]
    InvalidRadius(f64),
    #[error("helix coil count must be finite and > 0, got {0}")]
    InvalidCoils(f64),
    #[error("helix anchors must be finite and ordered bottom to top ({bottom} .. {top})")]
    InvalidAnchors { bottom: f64, top: f64 },
}

/// Helical centerline around the Z axis, starting at angle 0 on +X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helix {
    pub radius: f64,
    pub z_bottom: f64,
    pub z_top: f64,
    pub coils: f64,
}

impl Helix {
    pub fn new(radius: f64, z_bottom: f64, z_top: f64, coils: f64) -> Result<Self, HelixError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(HelixError::InvalidRadius(radius));
        }
        if !coils.is_finite() || coils <= 0.0 {
            return Err(HelixError::InvalidCoils(coils));
        }
        if !z_bottom.is_finite() || !z_top.is_finite() || z_top < z_bottom {
            return Err(HelixError::InvalidAnchors {
                bottom: z_bottom,
                top: z_top,
            });
        }
        Ok(Self {
            radius,
            z_bottom,
            z_top,
            coils,
        })
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.z_top - self.z_bottom
    }

    /// Axial rise per full turn.
    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.height() / self.coils
    }

    /// `samples` points evenly spaced in angle, first on `z_bottom`, last on `z_top`.
    pub fn sample(&self, samples: usize) -> Result<Vec<Point3>, HelixError> {
        if samples < 2 {
            return Err(HelixError::NotEnoughSamples(samples));
        }

        let denom = (samples - 1) as f64;
        let points = (0..samples)
            .map(|i| {
                let t = i as f64 / denom;
                let angle = TAU * self.coils * t;
                Point3::new(
                    self.radius * angle.cos(),
                    self.radius * angle.sin(),
                    self.z_bottom + t * self.height(),
                )
            })
            .collect();
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_parameters() {
        assert_eq!(Helix::new(0.0, 0.0, 1.0, 2.0), Err(HelixError::InvalidRadius(0.0)));
        assert_eq!(Helix::new(1.0, 0.0, 1.0, -1.0), Err(HelixError::InvalidCoils(-1.0)));
        assert!(matches!(
            Helix::new(1.0, 5.0, 1.0, 2.0),
            Err(HelixError::InvalidAnchors { .. })
        ));
    }

    #[test]
    fn pitch_is_height_over_coils() {
        let helix = Helix::new(30.0, 10.0, 110.0, 4.0).expect("helix");
        assert!((helix.pitch() - 25.0).abs() < 1e-12);
        assert_eq!(helix.sample(1), Err(HelixError::NotEnoughSamples(1)));
    }
}
