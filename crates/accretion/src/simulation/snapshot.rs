//! Owned, read-only state handed to the presentation layer.

use nalgebra::{Point3, Vector3};
use serde::Serialize;
use units::{Mass, Temperature};

use super::Statistics;
use crate::geometry::Geometry;
use crate::outflow::{ChannelId, Polarity};
use crate::pairs::PairKind;
use crate::tidal::{DebrisState, TidalPhase};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskView {
    pub position: Point3<f64>,
    pub radius: f64,
    pub temperature: Temperature,
    pub density: f64,
    pub captured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutflowView {
    pub position: Point3<f64>,
    pub channel: ChannelId,
    pub polarity: Polarity,
    pub progress: f64,
    pub lorentz_factor: f64,
    /// age / max_age
    pub age_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TidalBodyView {
    pub position: Point3<f64>,
    pub velocity: Vector3<f64>,
    pub mass: Mass,
    pub radius: f64,
    pub integrity: f64,
    pub tidal_radius: f64,
    pub stretch: f64,
    /// Unit vector along which the body is elongated
    pub stretch_axis: Vector3<f64>,
    pub phase: TidalPhase,
    pub remnant_accreted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebrisView {
    pub position: Point3<f64>,
    pub temperature: Temperature,
    pub state: DebrisState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanionView {
    pub enabled: bool,
    pub position: Point3<f64>,
    pub mass: Mass,
    pub radius: f64,
    pub temperature: Temperature,
    pub influence_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindView {
    pub position: Point3<f64>,
    pub age_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairView {
    pub position: Point3<f64>,
    pub kind: PairKind,
}

/// Everything a renderer or overlay needs for one frame.
///
/// Snapshots are detached copies; holding one never blocks the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub time: f64,
    pub ticks: u64,
    pub paused: bool,
    pub geometry: Geometry,
    pub disk: Vec<DiskView>,
    pub outflow: Vec<OutflowView>,
    pub tidal_body: Option<TidalBodyView>,
    pub debris: Vec<DebrisView>,
    pub companion: CompanionView,
    /// Empty while the companion is disabled
    pub wind: Vec<WindView>,
    pub pairs: Vec<PairView>,
    pub statistics: Statistics,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
