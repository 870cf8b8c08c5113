//! Input model. Every struct deserializes from a partial JS object; missing
//! fields take the stock values of a street coilover (steel spring on a
//! 50 mm body). All lengths in mm, rates in N/mm.

use serde::{Deserialize, Serialize};

use crate::error::{CoiloverError, CoiloverResult};
use crate::mechanics::STEEL_SHEAR_MODULUS;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WireSection {
    Round { diameter: f64 },
    /// `width` is radial, `height` axial.
    Rectangular { width: f64, height: f64 },
}

impl WireSection {
    /// Extent across the coil radius.
    #[must_use]
    pub fn radial(&self) -> f64 {
        match *self {
            Self::Round { diameter } => diameter,
            Self::Rectangular { width, .. } => width,
        }
    }

    /// Extent along the strut axis; one coil's share of the solid height.
    #[must_use]
    pub fn axial(&self) -> f64 {
        match *self {
            Self::Round { diameter } => diameter,
            Self::Rectangular { height, .. } => height,
        }
    }
}

impl Default for WireSection {
    fn default() -> Self {
        Self::Round { diameter: 10.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringSpec {
    pub inner_diameter: f64,
    pub wire: WireSection,
    pub free_length: f64,
    pub bind_length: f64,
    pub rate: f64,
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self {
            inner_diameter: 60.0,
            wire: WireSection::default(),
            free_length: 200.0,
            bind_length: 50.0,
            rate: 100.0,
        }
    }
}

impl SpringSpec {
    #[must_use]
    pub fn outer_diameter(&self) -> f64 {
        self.inner_diameter + 2.0 * self.wire.radial()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamperSpec {
    pub free_length: f64,
    pub compressed_length: f64,
    pub body_length: f64,
    pub body_diameter: f64,
    pub shaft_diameter: f64,
}

impl Default for DamperSpec {
    fn default() -> Self {
        Self {
            free_length: 400.0,
            compressed_length: 250.0,
            body_length: 200.0,
            body_diameter: 50.0,
            shaft_diameter: 20.0,
        }
    }
}

impl DamperSpec {
    /// Exposed shaft between the body top and the upper mount.
    #[must_use]
    pub fn shaft_length(&self) -> f64 {
        self.free_length - self.body_length
    }
}

/// Flanged collar between main and helper spring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelperPerchSpec {
    pub outer_diameter: f64,
    pub inner_diameter: f64,
    /// Flange and sleeve wall thickness.
    pub thickness: f64,
    /// Axial height of the centering sleeve.
    pub sleeve_height: f64,
}

impl Default for HelperPerchSpec {
    fn default() -> Self {
        Self {
            outer_diameter: 85.0,
            inner_diameter: 64.0,
            thickness: 2.0,
            sleeve_height: 10.0,
        }
    }
}

impl HelperPerchSpec {
    /// Bore of the sleeve.
    #[must_use]
    pub fn hole_diameter(&self) -> f64 {
        self.inner_diameter - 2.0 * self.thickness
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelperPlacement {
    /// Main spring on the lower perch, helper on top of it.
    #[default]
    Above,
    /// Helper on the lower perch, main spring on top of it.
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelperSpringSpec {
    pub inner_diameter: f64,
    pub outer_diameter: f64,
    pub free_length: f64,
    pub bind_length: f64,
    pub rate: f64,
    pub placement: HelperPlacement,
    pub perch: HelperPerchSpec,
}

impl Default for HelperSpringSpec {
    fn default() -> Self {
        Self {
            inner_diameter: 57.15,
            outer_diameter: 73.91,
            free_length: 101.6,
            bind_length: 11.18,
            rate: 2.63,
            placement: HelperPlacement::Above,
            perch: HelperPerchSpec::default(),
        }
    }
}

impl HelperSpringSpec {
    /// Flat wire fills the radial gap between the diameters.
    #[must_use]
    pub fn wire_width(&self) -> f64 {
        (self.outer_diameter - self.inner_diameter) * 0.5
    }
}

/// Lower spring seat, a plate around the damper body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerchSpec {
    pub thickness: f64,
    /// Extra diameter beyond the spring outer diameter.
    pub clearance: f64,
}

impl Default for PerchSpec {
    fn default() -> Self {
        Self {
            thickness: 5.0,
            clearance: 2.0,
        }
    }
}

/// Upper spring seat: plate plus tapered top mount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpperPerchSpec {
    pub thickness: f64,
    pub clearance: f64,
    pub cone_height: f64,
}

impl Default for UpperPerchSpec {
    fn default() -> Self {
        Self {
            thickness: 5.0,
            clearance: 2.0,
            cone_height: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialSpec {
    /// N/mm².
    pub shear_modulus: f64,
}

impl Default for MaterialSpec {
    fn default() -> Self {
        Self {
            shear_modulus: STEEL_SHEAR_MODULUS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupSpec {
    /// Height of the lower perch seat above the damper body top.
    pub lower_perch_offset: f64,
}

impl Default for SetupSpec {
    fn default() -> Self {
        Self {
            lower_perch_offset: 10.0,
        }
    }
}

/// Tessellation density of the generated parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    pub helix_samples: usize,
    pub wire_sides: usize,
    pub body_sectors: usize,
    pub perch_sectors: usize,
    pub helper_perch_sectors: usize,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            helix_samples: 200,
            wire_sides: 12,
            body_sectors: 32,
            perch_sectors: 32,
            helper_perch_sectors: 64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionSet {
    pub spring: SpringSpec,
    pub damper: DamperSpec,
    pub helper: Option<HelperSpringSpec>,
    pub lower_perch: PerchSpec,
    pub upper_perch: UpperPerchSpec,
    pub material: MaterialSpec,
    pub setup: SetupSpec,
    pub mesh: MeshSettings,
}

fn require_positive(field: &'static str, value: f64) -> CoiloverResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CoiloverError::invalid(field, format!("must be a finite number > 0, got {value}")))
    }
}

fn require_non_negative(field: &'static str, value: f64) -> CoiloverResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CoiloverError::invalid(field, format!("must be a finite number >= 0, got {value}")))
    }
}

fn require_less(field: &'static str, value: f64, limit_name: &str, limit: f64) -> CoiloverResult<()> {
    if value < limit {
        Ok(())
    } else {
        Err(CoiloverError::invalid(
            field,
            format!("{value} must be smaller than {limit_name} ({limit})"),
        ))
    }
}

fn require_at_least(field: &'static str, value: usize, min: usize) -> CoiloverResult<()> {
    if value >= min {
        Ok(())
    } else {
        Err(CoiloverError::invalid(field, format!("must be at least {min}, got {value}")))
    }
}

impl DimensionSet {
    /// Field-level checks. Cross-part checks that need solved coil data
    /// (bind stack against damper length) run in the layout.
    pub fn validate(&self) -> CoiloverResult<()> {
        let spring = &self.spring;
        require_positive("spring.inner_diameter", spring.inner_diameter)?;
        match spring.wire {
            WireSection::Round { diameter } => require_positive("spring.wire.diameter", diameter)?,
            WireSection::Rectangular { width, height } => {
                require_positive("spring.wire.width", width)?;
                require_positive("spring.wire.height", height)?;
                if height > width {
                    return Err(CoiloverError::invalid(
                        "spring.wire.height",
                        format!("{height} exceeds wire width {width}"),
                    ));
                }
            }
        }
        require_positive("spring.rate", spring.rate)?;
        require_positive("spring.bind_length", spring.bind_length)?;
        require_positive("spring.free_length", spring.free_length)?;
        require_less("spring.bind_length", spring.bind_length, "free length", spring.free_length)?;

        let damper = &self.damper;
        require_positive("damper.free_length", damper.free_length)?;
        require_positive("damper.compressed_length", damper.compressed_length)?;
        require_positive("damper.body_length", damper.body_length)?;
        require_positive("damper.body_diameter", damper.body_diameter)?;
        require_positive("damper.shaft_diameter", damper.shaft_diameter)?;
        if damper.compressed_length > damper.free_length {
            return Err(CoiloverError::invalid(
                "damper.compressed_length",
                format!(
                    "{} must not exceed free length ({})",
                    damper.compressed_length, damper.free_length
                ),
            ));
        }
        require_less("damper.body_length", damper.body_length, "free length", damper.free_length)?;
        require_less("damper.shaft_diameter", damper.shaft_diameter, "body diameter", damper.body_diameter)?;

        require_positive("lower_perch.thickness", self.lower_perch.thickness)?;
        require_non_negative("lower_perch.clearance", self.lower_perch.clearance)?;
        require_less(
            "damper.body_diameter",
            damper.body_diameter,
            "lower perch diameter",
            spring.outer_diameter() + self.lower_perch.clearance,
        )?;
        require_positive("upper_perch.thickness", self.upper_perch.thickness)?;
        require_non_negative("upper_perch.clearance", self.upper_perch.clearance)?;
        require_positive("upper_perch.cone_height", self.upper_perch.cone_height)?;

        require_positive("material.shear_modulus", self.material.shear_modulus)?;
        require_non_negative("setup.lower_perch_offset", self.setup.lower_perch_offset)?;

        if let Some(helper) = &self.helper {
            validate_helper(helper)?;
        }

        let mesh = &self.mesh;
        require_at_least("mesh.helix_samples", mesh.helix_samples, 2)?;
        require_at_least("mesh.wire_sides", mesh.wire_sides, 3)?;
        require_at_least("mesh.body_sectors", mesh.body_sectors, 3)?;
        require_at_least("mesh.perch_sectors", mesh.perch_sectors, 3)?;
        require_at_least("mesh.helper_perch_sectors", mesh.helper_perch_sectors, 3)?;

        Ok(())
    }
}

fn validate_helper(helper: &HelperSpringSpec) -> CoiloverResult<()> {
    require_positive("helper.inner_diameter", helper.inner_diameter)?;
    require_positive("helper.outer_diameter", helper.outer_diameter)?;
    require_less("helper.inner_diameter", helper.inner_diameter, "outer diameter", helper.outer_diameter)?;
    require_positive("helper.rate", helper.rate)?;
    require_positive("helper.bind_length", helper.bind_length)?;
    require_positive("helper.free_length", helper.free_length)?;
    require_less("helper.bind_length", helper.bind_length, "free length", helper.free_length)?;

    let perch = &helper.perch;
    require_positive("helper.perch.thickness", perch.thickness)?;
    require_positive("helper.perch.sleeve_height", perch.sleeve_height)?;
    require_positive("helper.perch.inner_diameter", perch.inner_diameter)?;
    require_less(
        "helper.perch.inner_diameter",
        perch.inner_diameter,
        "outer diameter",
        perch.outer_diameter,
    )?;
    if perch.hole_diameter() <= 0.0 {
        return Err(CoiloverError::invalid(
            "helper.perch.thickness",
            format!(
                "sleeve wall {} leaves no bore inside inner diameter {}",
                perch.thickness, perch.inner_diameter
            ),
        ));
    }
    Ok(())
}
