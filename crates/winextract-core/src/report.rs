use crate::geom::BBox;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRecord {
    pub tag: String,
    pub text: String,
}

/// One attributed info insert attached to a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoRecord {
    pub handle: Option<String>,
    pub attributes: Vec<AttributeRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionRecord {
    pub handle: Option<String>,
    pub style: String,
    pub angle: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowReport {
    pub index: usize,
    pub bbox: BBox,
    pub area: BBox,
    /// Geometric size of `bbox`.
    pub width: f64,
    pub height: f64,
    /// Annotated values, in match order.
    pub widths: Vec<f64>,
    pub heights: Vec<f64>,
    pub max_width: f64,
    pub max_height: f64,
    pub width_verified: bool,
    pub height_verified: bool,
    pub dimensions: Vec<DimensionRecord>,
}

impl WindowReport {
    pub fn verified(&self) -> bool {
        self.width_verified && self.height_verified
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    pub index: usize,
    pub bbox: BBox,
    pub serial: Option<String>,
    pub building: Option<String>,
    pub area: Option<String>,
    pub amount: Option<String>,
    pub infos: Vec<InfoRecord>,
    pub windows: Vec<WindowReport>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryReport {
    pub pages: usize,
    pub info_inserts: usize,
    pub windows: usize,
    /// Sum of geometric window areas in square metres.
    pub total_area_m2: f64,
    pub unverified_windows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub source: String,
    pub summary: SummaryReport,
    pub pages: Vec<PageReport>,
    pub warnings: Vec<Warning>,
}
