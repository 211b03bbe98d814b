use crate::cluster::merge_boxes;
use crate::geom::BBox;
use crate::matching::{order_windows, resolve_window, Window};
use crate::model::{Dimension, Document, Insert};
use crate::report::{
    AttributeRecord, DimensionRecord, ExtractionReport, InfoRecord, PageReport, SummaryReport,
    Warning, WindowReport,
};
use crate::transform::{collect_layer_boxes, world_bbox_of};

pub const SERIAL_KEY: &str = "序号";
pub const BUILDING_KEY: &str = "楼号";
pub const AREA_KEY: &str = "面积";
pub const AMOUNT_KEY: &str = "金额";

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Layer holding window outline fragments.
    pub window_layer: String,
    /// Block inserted once per page as its frame.
    pub frame_block: String,
    /// Attributed block carrying serial/building/area/amount.
    pub info_block: String,
    /// Restrict annotations to one layer; `None` takes every top-level
    /// dimension.
    pub annotation_layer: Option<String>,
    /// Fragments closer than this merge into one window.
    pub window_gap: f64,
    /// Annotation footprints closer than this attach to a window.
    pub annotation_gap: f64,
    pub verify_epsilon: f64,
    pub row_tolerance: f64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            window_layer: "PJ".to_string(),
            frame_block: "TKA4".to_string(),
            info_block: "SC".to_string(),
            annotation_layer: None,
            window_gap: 20.0,
            annotation_gap: 30.0,
            verify_epsilon: 1.0,
            row_tolerance: 500.0,
        }
    }
}

/// Receives coarse progress updates. Fire-and-forget.
pub trait ProgressSink {
    fn progress(&mut self, percent: u8, label: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn progress(&mut self, _percent: u8, _label: &str) {}
}

fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (done * 100 / total).min(100) as u8
}

/// One frame insert and everything resolved inside it.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    pub frame: &'a Insert,
    pub bbox: BBox,
    pub infos: Vec<&'a Insert>,
    /// Window-layer fragments whose centre lies inside `bbox`.
    pub fragments: Vec<BBox>,
}

impl<'a> Page<'a> {
    /// First non-empty value of `key` among the attached info inserts.
    pub fn attribute(&self, key: &str) -> Option<&'a str> {
        self.infos
            .iter()
            .copied()
            .filter_map(|info| info.attribute(key))
            .find(|text| !text.is_empty())
    }

    pub fn serial(&self) -> Option<&'a str> {
        self.attribute(SERIAL_KEY)
    }

    pub fn building(&self) -> Option<&'a str> {
        self.attribute(BUILDING_KEY)
    }

    pub fn area(&self) -> Option<&'a str> {
        self.attribute(AREA_KEY)
    }

    pub fn amount(&self) -> Option<&'a str> {
        self.attribute(AMOUNT_KEY)
    }
}

pub struct Extractor {
    cfg: ExtractConfig,
}

impl Extractor {
    pub fn new(cfg: ExtractConfig) -> Self {
        Self { cfg }
    }

    /// Top-level dimensions every window is matched against.
    pub fn annotation_pool<'a>(&self, doc: &'a Document) -> Vec<&'a Dimension> {
        doc.dimensions()
            .filter(|dim| match &self.cfg.annotation_layer {
                Some(layer) => dim.common.layer == *layer,
                None => true,
            })
            .collect()
    }

    /// Splits the drawing into pages ordered left to right.
    pub fn pages<'a>(&self, doc: &'a Document, progress: &mut dyn ProgressSink) -> Vec<Page<'a>> {
        let mut frames = Vec::new();
        let mut infos = Vec::new();
        let mut fragments = Vec::new();

        let total = doc.entities.len();
        for (i, entity) in doc.entities.iter().enumerate() {
            if let Some(insert) = entity.as_insert() {
                if insert.is_block(&self.cfg.frame_block) {
                    frames.push(insert);
                } else if insert.is_block(&self.cfg.info_block) {
                    infos.push(insert);
                }
            }
            fragments.extend(collect_layer_boxes(doc, &self.cfg.window_layer, entity, None));
            progress.progress(percent(i + 1, total), "scan entities");
        }
        log::debug!(
            "found {} frame(s), {} info insert(s), {} window fragment(s)",
            frames.len(),
            infos.len(),
            fragments.len()
        );

        frames.sort_by(|a, b| a.insertion.x.total_cmp(&b.insertion.x));

        frames
            .into_iter()
            .map(|frame| {
                let bbox = world_bbox_of(doc, frame);
                Page {
                    frame,
                    bbox,
                    infos: infos
                        .iter()
                        .copied()
                        .filter(|info| bbox.contains_xy(info.insertion))
                        .collect(),
                    fragments: fragments
                        .iter()
                        .copied()
                        .filter(|f| bbox.contains_xy(f.center()))
                        .collect(),
                }
            })
            .collect()
    }

    /// Merged, reading-ordered windows of one page with their annotations.
    pub fn windows<'a>(
        &self,
        doc: &Document,
        page: &Page<'_>,
        pool: &[&'a Dimension],
    ) -> Vec<Window<'a>> {
        let mut boxes = merge_boxes(&page.fragments, self.cfg.window_gap);
        order_windows(&mut boxes, self.cfg.row_tolerance);
        boxes
            .into_iter()
            .map(|bbox| resolve_window(doc, bbox, pool, self.cfg.annotation_gap))
            .collect()
    }

    pub fn extract(
        &self,
        source: &str,
        doc: &Document,
        progress: &mut dyn ProgressSink,
    ) -> ExtractionReport {
        let pages = self.pages(doc, progress);
        let pool = self.annotation_pool(doc);

        let mut warnings = Vec::new();
        if pages.is_empty() {
            warnings.push(Warning {
                code: "no_frames".to_string(),
                message: format!("No inserts of frame block {:?} found.", self.cfg.frame_block),
            });
        }

        let mut summary = SummaryReport {
            pages: pages.len(),
            ..SummaryReport::default()
        };
        let mut page_reports = Vec::with_capacity(pages.len());

        for (i, page) in pages.iter().enumerate() {
            progress.progress(percent(i + 1, pages.len()), "resolve windows");

            if page.infos.len() != 1 {
                warnings.push(Warning {
                    code: "info_count".to_string(),
                    message: format!(
                        "Page {} has {} {:?} insert(s), expected 1.",
                        i + 1,
                        page.infos.len(),
                        self.cfg.info_block
                    ),
                });
            }
            summary.info_inserts += page.infos.len();

            let windows: Vec<WindowReport> = self
                .windows(doc, page, &pool)
                .iter()
                .enumerate()
                .map(|(j, w)| self.window_report(doc, j, w))
                .collect();

            for w in &windows {
                summary.windows += 1;
                summary.total_area_m2 += w.width * w.height / 1_000_000.0;
                if !w.verified() {
                    summary.unverified_windows += 1;
                    warnings.push(Warning {
                        code: "window_unverified".to_string(),
                        message: format!(
                            "Page {} window {}: annotated {}x{} vs measured {:.1}x{:.1}.",
                            i + 1,
                            w.index + 1,
                            w.max_width,
                            w.max_height,
                            w.width,
                            w.height
                        ),
                    });
                }
            }

            page_reports.push(PageReport {
                index: i,
                bbox: page.bbox,
                serial: page.serial().map(str::to_string),
                building: page.building().map(str::to_string),
                area: page.area().map(str::to_string),
                amount: page.amount().map(str::to_string),
                infos: page.infos.iter().copied().map(info_record).collect(),
                windows,
            });
        }

        ExtractionReport {
            source: source.to_string(),
            summary,
            pages: page_reports,
            warnings,
        }
    }

    fn window_report(&self, doc: &Document, index: usize, w: &Window<'_>) -> WindowReport {
        let eps = self.cfg.verify_epsilon;
        WindowReport {
            index,
            bbox: w.bbox,
            area: w.area,
            width: w.width(),
            height: w.height(),
            widths: w.widths.clone(),
            heights: w.heights.clone(),
            max_width: w.max_width(),
            max_height: w.max_height(),
            width_verified: w.verify_width(eps),
            height_verified: w.verify_height(eps),
            dimensions: w
                .matched
                .iter()
                .map(|dim| DimensionRecord {
                    handle: dim.common.handle.clone(),
                    style: dim.style_name.clone(),
                    angle: dim.angle,
                    value: dim.measured_value(doc),
                })
                .collect(),
        }
    }
}

fn info_record(info: &Insert) -> InfoRecord {
    InfoRecord {
        handle: info.common.handle.clone(),
        attributes: info
            .attributes
            .iter()
            .map(|a| AttributeRecord {
                tag: a.tag.clone(),
                text: a.text.clone(),
            })
            .collect(),
    }
}
