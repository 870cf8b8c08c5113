#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assembly;
pub mod error;
pub mod geom;
pub mod mechanics;

use std::collections::BTreeMap;
use std::fmt;

use assembly::{Assembly, AssemblySnapshot, DEFAULT_CURVE_SAMPLES, DimensionSet, ForcePoint, PartKind, PartMesh};
use error::CoiloverError;
use mechanics::SolverState;
use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no panic hook outside the browser
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // logging stays silent without the debug_logs feature
}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("could not start the rayon thread pool: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Failures of the engine facade.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("no valid dimension set has been applied")]
    NoAssembly,
    #[error("assembly has not been evaluated since the last change")]
    NotEvaluated,
    #[error(transparent)]
    Coilover(#[from] CoiloverError),
}

/// One part as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartExport {
    pub id: &'static str,
    pub kind: PartKind,
    pub color: [f64; 3],
    pub vertices: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normals: Option<Vec<[f64; 3]>>,
}

impl From<&PartMesh> for PartExport {
    fn from(part: &PartMesh) -> Self {
        Self {
            id: part.kind.id(),
            kind: part.kind,
            color: part.color,
            vertices: part.mesh.positions.clone(),
            indices: part.mesh.indices.clone(),
            normals: part.mesh.normals.clone(),
        }
    }
}

/// Parts that appeared, changed or disappeared since the previous diff.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct GeometryDiff {
    pub added: Vec<PartExport>,
    pub updated: Vec<PartExport>,
    pub removed: Vec<&'static str>,
}

impl GeometryDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// Numbers shown next to the 3D view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Readout {
    pub travel_percent: f64,
    pub travel: f64,
    pub strut_length: f64,
    pub strut_length_min: f64,
    pub strut_length_max: f64,
    pub available_length: f64,
    pub main_length: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_length: Option<f64>,
    pub force: f64,
    pub state: SolverState,
    pub state_label: &'static str,
    pub main_active_coils: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_active_coils: Option<f64>,
}

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct Engine {
    initialized: bool,
    dimensions: DimensionSet,
    assembly: Option<Assembly>,
    travel_fraction: f64,
    snapshot: Option<AssemblySnapshot>,
    snapshot_dirty: bool,
    geometry_map: BTreeMap<PartKind, PartExport>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Engine {
    /// Starts from the default dimension set at full extension.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Engine {
        let dimensions = DimensionSet::default();
        let assembly = match Assembly::new(&dimensions) {
            Ok(assembly) => Some(assembly),
            Err(err) => {
                log::warn!("default dimensions rejected: {err}");
                None
            }
        };

        Engine {
            initialized: true,
            dimensions,
            assembly,
            travel_fraction: 0.0,
            snapshot: None,
            snapshot_dirty: true,
            geometry_map: BTreeMap::new(),
        }
    }

    #[wasm_bindgen]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Accepts a (partial) dimension object; missing fields take defaults.
    #[wasm_bindgen]
    pub fn set_dimensions(&mut self, value: JsValue) -> Result<(), JsValue> {
        let dimensions: DimensionSet = serde_wasm_bindgen::from_value(value).map_err(to_js_error)?;
        self.apply_dimensions(dimensions).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn get_dimensions(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.dimensions).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Travel in percent of the usable stroke; clamped to `[0, 100]`.
    #[wasm_bindgen]
    pub fn set_travel(&mut self, percent: f64) -> Result<(), JsValue> {
        if !percent.is_finite() {
            return Err(js_error("travel must be a finite number"));
        }
        self.travel_percent(percent);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn evaluate(&mut self) -> Result<(), JsValue> {
        self.evaluate_snapshot().map_err(to_js_error)
    }

    /// Part geometry of the last evaluation as a diff against the previous call.
    #[wasm_bindgen]
    pub fn get_geometry(&mut self) -> Result<JsValue, JsValue> {
        let diff = self.geometry_diff().map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&diff).map_err(|err| JsError::new(&err.to_string()).into())
    }

    #[wasm_bindgen]
    pub fn get_readout(&self) -> Result<JsValue, JsValue> {
        let readout = self.readout().map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&readout).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// `(travel, force)` samples for the plot; 150 samples when omitted.
    #[wasm_bindgen]
    pub fn get_force_curve(&self, samples: Option<u32>) -> Result<JsValue, JsValue> {
        let samples = samples.map_or(DEFAULT_CURVE_SAMPLES, |count| count as usize);
        let curve = self.force_curve(samples).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&curve).map_err(|err| JsError::new(&err.to_string()).into())
    }
}

impl Engine {
    #[must_use]
    pub fn dimensions(&self) -> &DimensionSet {
        &self.dimensions
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&AssemblySnapshot> {
        self.snapshot.as_ref()
    }

    /// Validates and lays out `dimensions`. On error the previous assembly
    /// stays in place.
    pub fn apply_dimensions(&mut self, dimensions: DimensionSet) -> Result<(), EngineError> {
        let assembly = Assembly::new(&dimensions)?;
        self.dimensions = dimensions;
        self.assembly = Some(assembly);
        self.snapshot_dirty = true;
        Ok(())
    }

    /// Sets the travel and returns the clamped percentage.
    pub fn travel_percent(&mut self, percent: f64) -> f64 {
        let percent = if percent.is_nan() { 0.0 } else { clamp(percent, 0.0, 100.0) };
        let fraction = percent / 100.0;
        if fraction != self.travel_fraction {
            self.travel_fraction = fraction;
            self.snapshot_dirty = true;
        }
        percent
    }

    pub fn evaluate_snapshot(&mut self) -> Result<(), EngineError> {
        if !self.snapshot_dirty && self.snapshot.is_some() {
            return Ok(());
        }

        let assembly = self.assembly.as_ref().ok_or(EngineError::NoAssembly)?;
        let snapshot = assembly.snapshot(self.travel_fraction)?;
        debug_log!(
            "evaluated {} parts at {:.1}% travel",
            snapshot.parts.len(),
            self.travel_fraction * 100.0
        );

        self.snapshot = Some(snapshot);
        self.snapshot_dirty = false;
        Ok(())
    }

    pub fn geometry_diff(&mut self) -> Result<GeometryDiff, EngineError> {
        if self.snapshot_dirty {
            return Err(EngineError::NotEvaluated);
        }

        let Some(snapshot) = self.snapshot.as_ref() else {
            return Ok(GeometryDiff::default());
        };

        let mut diff = GeometryDiff::default();
        let mut next_geometry_map = BTreeMap::new();

        for part in &snapshot.parts {
            let export = PartExport::from(part);
            match self.geometry_map.get(&part.kind) {
                Some(existing) if *existing == export => {}
                Some(_) => diff.updated.push(export.clone()),
                None => diff.added.push(export.clone()),
            }
            next_geometry_map.insert(part.kind, export);
        }

        for kind in self.geometry_map.keys() {
            if !next_geometry_map.contains_key(kind) {
                diff.removed.push(kind.id());
            }
        }

        self.geometry_map = next_geometry_map;
        Ok(diff)
    }

    pub fn readout(&self) -> Result<Readout, EngineError> {
        let assembly = self.assembly.as_ref().ok_or(EngineError::NoAssembly)?;
        let geometry = assembly.layout().geometry();
        let state = assembly.travel_state(self.travel_fraction);

        Ok(Readout {
            travel_percent: state.fraction * 100.0,
            travel: state.travel,
            strut_length: state.strut_length,
            strut_length_min: geometry.strut_length_min,
            strut_length_max: geometry.strut_length_max,
            available_length: state.available_length,
            main_length: state.solution.main_length,
            helper_length: state.solution.helper_length,
            force: state.solution.force,
            state: state.solution.state,
            state_label: state.solution.state.label(),
            main_active_coils: geometry.main.active_coils,
            helper_active_coils: geometry.helper.map(|h| h.active_coils),
        })
    }

    pub fn force_curve(&self, samples: usize) -> Result<Vec<ForcePoint>, EngineError> {
        let assembly = self.assembly.as_ref().ok_or(EngineError::NoAssembly)?;
        Ok(assembly.force_curve(samples)?)
    }
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn travel_is_clamped_to_percent_range() {
        let mut engine = Engine::new();
        assert_eq!(engine.travel_percent(-20.0), 0.0);
        assert_eq!(engine.travel_percent(250.0), 100.0);
        assert_eq!(engine.travel_percent(f64::NAN), 0.0);
        assert_eq!(engine.travel_percent(42.0), 42.0);
    }

    #[test]
    fn geometry_requires_evaluation() {
        let mut engine = Engine::new();
        assert_eq!(engine.geometry_diff(), Err(EngineError::NotEvaluated));
        engine.evaluate_snapshot().expect("evaluate");
        assert!(engine.geometry_diff().is_ok());
    }

    #[test]
    fn unchanged_travel_keeps_snapshot_clean() {
        let mut engine = Engine::new();
        engine.evaluate_snapshot().expect("evaluate");
        engine.travel_percent(0.0);
        assert!(engine.geometry_diff().is_ok());
    }

    #[test]
    fn export_copies_part_buffers() {
        let mut engine = Engine::new();
        engine.evaluate_snapshot().expect("evaluate");
        let snapshot = engine.snapshot().expect("snapshot");
        let part = snapshot.part(PartKind::Shaft).expect("shaft");
        let export = PartExport::from(part);

        assert_eq!(export.id, "shaft");
        assert_eq!(export.vertices.len(), part.mesh.positions.len());
        assert_eq!(export.indices, part.mesh.indices);
        assert_eq!(export.color, PartKind::Shaft.color());
    }
}
