use proptest::prelude::*;
use winextract_core::geom::{BBox, Point};
use winextract_core::matching::{
    dimension_axis, match_annotations, order_windows, resolve_window, Axis,
};
use winextract_core::model::{Dimension, Document};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> BBox {
    BBox::new(Point::xy(x0, y0), Point::xy(x1, y1))
}

fn horizontal(measured_y: f64, def_y: f64, measurement: f64) -> Dimension {
    Dimension {
        angle: 0.0,
        measurement,
        def_point: Point::xy(0.0, def_y),
        text_mid: Point::xy(500.0, def_y),
        measure_start: Point::xy(0.0, measured_y),
        measure_end: Point::xy(1000.0, measured_y),
        ..Dimension::default()
    }
}

fn vertical(measured_x: f64, def_x: f64, measurement: f64) -> Dimension {
    Dimension {
        angle: 90.0,
        measurement,
        def_point: Point::xy(def_x, 0.0),
        text_mid: Point::xy(def_x, 600.0),
        measure_start: Point::xy(measured_x, 0.0),
        measure_end: Point::xy(measured_x, 1200.0),
        ..Dimension::default()
    }
}

#[test]
fn chained_annotations_match_in_successive_rounds() {
    let doc = Document::default();
    let window = rect(0.0, 0.0, 1000.0, 1000.0);
    let outer = horizontal(-90.0, -200.0, 1000.0);
    let inner = horizontal(0.0, -100.0, 1000.0);
    let pool = vec![&outer, &inner];

    let first = match_annotations(&doc, pool, &window, 30.0);
    assert_eq!(vec![&inner], first.matched);
    assert_eq!(vec![&outer], first.rest);
    assert_eq!(rect(0.0, -100.0, 1000.0, 1000.0), first.area);

    let second = match_annotations(&doc, first.rest, &first.area, 30.0);
    assert_eq!(vec![&outer], second.matched);
    assert!(second.rest.is_empty());
    assert_eq!(rect(0.0, -200.0, 1000.0, 1000.0), second.area);

    let third = match_annotations(&doc, second.rest, &second.area, 30.0);
    assert!(third.matched.is_empty());
    assert_eq!(second.area, third.area);
}

#[test]
fn non_linear_dimensions_pass_through() {
    let doc = Document::default();
    let window = rect(0.0, 0.0, 1000.0, 1000.0);
    let radial = Dimension {
        kind: 4,
        ..horizontal(0.0, -100.0, 500.0)
    };

    let round = match_annotations(&doc, vec![&radial], &window, 30.0);

    assert!(round.matched.is_empty());
    assert_eq!(vec![&radial], round.rest);
    assert_eq!(window, round.area);
}

#[test]
fn resolved_window_collects_widths_and_heights() {
    let doc = Document::default();
    let bbox = rect(0.0, 0.0, 1000.0, 1200.0);
    let inner = horizontal(0.0, -100.0, 1000.0);
    let outer = horizontal(-90.0, -200.0, 999.6);
    let side = vertical(0.0, -80.0, 1200.0);
    let far = horizontal(5000.0, 4900.0, 700.0);
    let pool = vec![&far, &outer, &side, &inner];

    let window = resolve_window(&doc, bbox, &pool, 30.0);

    assert_eq!(3, window.matched.len());
    assert_eq!(bbox, window.bbox);
    assert_eq!(rect(-80.0, -200.0, 1000.0, 1200.0), window.area);
    assert_eq!(vec![1000.0, 1000.0], window.widths);
    assert_eq!(vec![1200.0], window.heights);
    assert!(window.verify_width(1.0));
    assert!(window.verify_height(1.0));
}

#[test]
fn window_without_annotations_is_unverified() {
    let doc = Document::default();
    let window = resolve_window(&doc, rect(0.0, 0.0, 900.0, 900.0), &[], 30.0);

    assert!(window.matched.is_empty());
    assert_eq!(0.0, window.max_width());
    assert!(!window.verify_width(1.0));
    assert!(!window.verify_height(1.0));
}

#[test]
fn mismatched_annotation_fails_verification() {
    let doc = Document::default();
    let dim = horizontal(0.0, -100.0, 1100.0);

    let window = resolve_window(&doc, rect(0.0, 0.0, 1000.0, 1000.0), &[&dim], 30.0);

    assert_eq!(vec![1100.0], window.widths);
    assert!(!window.verify_width(1.0));
    assert!(window.verify_width(100.0));
}

#[test]
fn classifies_axis_by_whole_degrees() {
    assert_eq!(Some(Axis::Width), dimension_axis(0.0));
    assert_eq!(Some(Axis::Width), dimension_axis(180.0));
    assert_eq!(Some(Axis::Width), dimension_axis(-180.0));
    assert_eq!(Some(Axis::Width), dimension_axis(0.4));
    assert_eq!(Some(Axis::Height), dimension_axis(90.0));
    assert_eq!(Some(Axis::Height), dimension_axis(270.9));
    assert_eq!(Some(Axis::Height), dimension_axis(-90.0));
    assert_eq!(Some(Axis::Height), dimension_axis(450.0));
    assert_eq!(None, dimension_axis(45.0));
    assert_eq!(None, dimension_axis(89.9));
    assert_eq!(None, dimension_axis(f64::NAN));
}

#[test]
fn orders_rows_top_down_then_left_to_right() {
    let mut boxes = vec![
        rect(3000.0, 0.0, 4000.0, 1000.0),
        rect(0.0, 5000.0, 1000.0, 6000.0),
        rect(0.0, 0.0, 1000.0, 1200.0),
        rect(2000.0, 4800.0, 2500.0, 5800.0),
    ];

    order_windows(&mut boxes, 500.0);

    assert_eq!(
        vec![
            rect(0.0, 5000.0, 1000.0, 6000.0),
            rect(2000.0, 4800.0, 2500.0, 5800.0),
            rect(0.0, 0.0, 1000.0, 1200.0),
            rect(3000.0, 0.0, 4000.0, 1000.0),
        ],
        boxes
    );
}

#[test]
fn row_is_anchored_on_its_first_box() {
    // 1000 -> 700 -> 400 steps stay under the tolerance pairwise, but the
    // third box is 600 below the row's first.
    let mut boxes = vec![
        rect(500.0, 0.0, 600.0, 400.0),
        rect(900.0, 0.0, 1000.0, 700.0),
        rect(100.0, 0.0, 200.0, 1000.0),
    ];

    order_windows(&mut boxes, 500.0);

    assert_eq!(
        vec![
            rect(100.0, 0.0, 200.0, 1000.0),
            rect(900.0, 0.0, 1000.0, 700.0),
            rect(500.0, 0.0, 600.0, 400.0),
        ],
        boxes
    );
}

fn arb_dimension() -> impl Strategy<Value = Dimension> {
    (
        -3000.0f64..3000.0,
        -3000.0f64..3000.0,
        10.0f64..1500.0,
        -300.0f64..300.0,
        prop::bool::ANY,
    )
        .prop_map(|(x, y, len, offset, flat)| {
            let (angle, end, def) = if flat {
                (0.0, Point::xy(x + len, y), Point::xy(x, y + offset))
            } else {
                (90.0, Point::xy(x, y + len), Point::xy(x + offset, y))
            };
            Dimension {
                angle,
                measurement: len,
                def_point: def,
                text_mid: def,
                measure_start: Point::xy(x, y),
                measure_end: end,
                ..Dimension::default()
            }
        })
}

proptest! {
    #[test]
    fn resolved_area_covers_window_and_matches(
        dims in prop::collection::vec(arb_dimension(), 0..16),
        gap in 0.0f64..100.0,
    ) {
        let doc = Document::default();
        let bbox = rect(-500.0, -500.0, 500.0, 500.0);
        let pool: Vec<&Dimension> = dims.iter().collect();

        let window = resolve_window(&doc, bbox, &pool, gap);

        prop_assert!(window.matched.len() <= pool.len());
        prop_assert!(window.area.contains_box_xy(&bbox));
        for dim in &window.matched {
            prop_assert!(window.area.contains_box_xy(&dim.footprint(&doc)));
        }
        prop_assert_eq!(window.matched.len(), window.widths.len() + window.heights.len());
    }
}
