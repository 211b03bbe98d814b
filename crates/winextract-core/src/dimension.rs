use crate::geom::{BBox, Point};
use crate::model::{Dimension, Document};
use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder in an override text standing for the measured value.
pub const AUTO_TEXT: &str = "<>";

static FORMAT_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\[A-Za-z].*?;").unwrap());
static NUMERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+(?:\.[0-9]*)?|\.[0-9]+").unwrap());

impl Dimension {
    /// Projections of the two measured points onto the dimension line
    /// through `def_point`, in (start, end) order.
    pub fn line_corners(&self) -> (Point, Point) {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let project = |p: Point| {
            let along = (p.x - self.def_point.x) * cos + (p.y - self.def_point.y) * sin;
            Point::xy(self.def_point.x + cos * along, self.def_point.y + sin * along)
        };
        (project(self.measure_start), project(self.measure_end))
    }

    /// Visual footprint of the annotation: both measured points, the text
    /// midpoint, and the dimension-line corners pushed `extension` further
    /// along the extension lines, away from the measured geometry.
    pub fn perfect_rectangle(&self, extension: f64) -> BBox {
        let (c_start, c_end) = self.line_corners();

        let (sin, cos) = (self.angle + 90.0).to_radians().sin_cos();
        let outward = (c_start.x - self.measure_start.x) * cos
            + (c_start.y - self.measure_start.y) * sin;
        let sign = if outward < 0.0 { -1.0 } else { 1.0 };
        let push = |c: Point| Point::xy(c.x + cos * extension * sign, c.y + sin * extension * sign);

        let points = [
            self.measure_start,
            self.measure_end,
            push(c_start),
            push(c_end),
            self.text_mid,
        ];
        let mut bbox = BBox::point(Point::xy(points[0].x, points[0].y));
        for p in &points[1..] {
            bbox.include_point(Point::xy(p.x, p.y));
        }
        bbox
    }

    /// `extension * scale` of the named style, 0 when the style is unknown.
    pub fn extension_length(&self, doc: &Document) -> f64 {
        doc.dim_style(&self.style_name)
            .map(|style| style.extension * style.scale)
            .unwrap_or(0.0)
    }

    pub fn footprint(&self, doc: &Document) -> BBox {
        self.perfect_rectangle(self.extension_length(doc))
    }

    /// Value shown on the drawing.
    ///
    /// A literal override without the `<>` placeholder wins when it holds
    /// a number; otherwise the measurement is rounded to the style's
    /// precision (0 decimals when the style is unknown).
    pub fn measured_value(&self, doc: &Document) -> f64 {
        if !self.text.is_empty() && !self.text.contains(AUTO_TEXT) {
            if let Some(value) = override_value(&self.text) {
                return value;
            }
        }
        let precision = doc
            .dim_style(&self.style_name)
            .map(|style| style.precision)
            .unwrap_or(0);
        round_to(self.measurement, precision)
    }
}

/// First ASCII numeral in an override text after removing inline format
/// codes such as `\A1;` or `\fSimSun|b0;`.
pub fn override_value(text: &str) -> Option<f64> {
    let plain = FORMAT_CODE.replace_all(text, "");
    NUMERAL
        .find(&plain)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

pub fn round_to(value: f64, precision: i32) -> f64 {
    let p = 10f64.powi(precision);
    (value * p).round() / p
}
