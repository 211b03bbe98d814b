use crate::geom::{is_separate, BBox};
use crate::model::{Dimension, Document};

/// Outcome of one matching round.
#[derive(Debug, Clone)]
pub struct MatchRound<'a> {
    /// Dimensions left for later rounds, non-linear ones included.
    pub rest: Vec<&'a Dimension>,
    pub matched: Vec<&'a Dimension>,
    /// Input box grown over every matched footprint.
    pub area: BBox,
}

/// One round of nearest-annotation matching.
///
/// Linear dimensions whose footprint comes within `gap` of `area` match;
/// everything else is handed back in `rest`, in pool order.
pub fn match_annotations<'a>(
    doc: &Document,
    pool: Vec<&'a Dimension>,
    area: &BBox,
    gap: f64,
) -> MatchRound<'a> {
    let mut round = MatchRound {
        rest: Vec::with_capacity(pool.len()),
        matched: Vec::new(),
        area: *area,
    };

    for dim in pool {
        if !dim.is_linear() {
            round.rest.push(dim);
            continue;
        }
        let footprint = dim.footprint(doc);
        if is_separate(area, &footprint, gap) {
            round.rest.push(dim);
            continue;
        }
        round.area.include_point(footprint.min);
        round.area.include_point(footprint.max);
        round.matched.push(dim);
    }

    round
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

/// Width for lines at 0/180 degrees, height at 90/270; any other angle
/// has no axis. Angles are truncated to whole degrees first.
pub fn dimension_axis(angle: f64) -> Option<Axis> {
    if !angle.is_finite() {
        return None;
    }
    match (angle.trunc() as i64).rem_euclid(360) {
        0 | 180 => Some(Axis::Width),
        90 | 270 => Some(Axis::Height),
        _ => None,
    }
}

/// A resolved window opening and the annotations that describe it.
#[derive(Debug, Clone)]
pub struct Window<'a> {
    /// Union of the raw outline fragments.
    pub bbox: BBox,
    /// `bbox` grown over every matched annotation.
    pub area: BBox,
    pub matched: Vec<&'a Dimension>,
    pub widths: Vec<f64>,
    pub heights: Vec<f64>,
}

impl Window<'_> {
    pub fn width(&self) -> f64 {
        self.bbox.width()
    }

    pub fn height(&self) -> f64 {
        self.bbox.height()
    }

    pub fn max_width(&self) -> f64 {
        max_or_zero(&self.widths)
    }

    pub fn max_height(&self) -> f64 {
        max_or_zero(&self.heights)
    }

    /// The largest annotated width agrees with the geometry within `eps`.
    pub fn verify_width(&self, eps: f64) -> bool {
        !self.widths.is_empty() && (self.width() - self.max_width()).abs() <= eps
    }

    pub fn verify_height(&self, eps: f64) -> bool {
        !self.heights.is_empty() && (self.height() - self.max_height()).abs() <= eps
    }
}

fn max_or_zero(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

/// Grows `bbox` over its annotations round by round until a round
/// matches nothing, then sorts the matched values into widths and heights.
///
/// Every window starts from the full `pool`; rounds only consume from the
/// window's own copy.
pub fn resolve_window<'a>(
    doc: &Document,
    bbox: BBox,
    pool: &[&'a Dimension],
    gap: f64,
) -> Window<'a> {
    let mut rest = pool.to_vec();
    let mut area = bbox;
    let mut matched = Vec::new();

    loop {
        let round = match_annotations(doc, rest, &area, gap);
        if round.matched.is_empty() {
            break;
        }
        log::trace!(
            "window round matched {} dimension(s), area now {:?}",
            round.matched.len(),
            round.area
        );
        rest = round.rest;
        area = round.area;
        matched.extend(round.matched);
    }

    let mut widths = Vec::new();
    let mut heights = Vec::new();
    for dim in &matched {
        let value = dim.measured_value(doc);
        match dimension_axis(dim.angle) {
            Some(Axis::Width) => widths.push(value),
            Some(Axis::Height) => heights.push(value),
            None => {}
        }
    }

    Window {
        bbox,
        area,
        matched,
        widths,
        heights,
    }
}

/// Reading order: rows from the top of the drawing down, left to right
/// within a row. A box joins the current row while its top edge stays
/// within `row_tolerance` of the row's first box.
pub fn order_windows(boxes: &mut Vec<BBox>, row_tolerance: f64) {
    boxes.sort_by(|a, b| b.max.y.total_cmp(&a.max.y));

    let mut ordered = Vec::with_capacity(boxes.len());
    let mut row: Vec<BBox> = Vec::new();
    for bbox in boxes.drain(..) {
        if let Some(first) = row.first() {
            if (first.max.y - bbox.max.y).abs() > row_tolerance {
                row.sort_by(|a, b| a.min.x.total_cmp(&b.min.x));
                ordered.append(&mut row);
            }
        }
        row.push(bbox);
    }
    row.sort_by(|a, b| a.min.x.total_cmp(&b.min.x));
    ordered.append(&mut row);

    *boxes = ordered;
}
