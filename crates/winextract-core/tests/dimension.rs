use winextract_core::dimension::{override_value, round_to};
use winextract_core::geom::Point;
use winextract_core::model::{DimStyle, Dimension, Document};

fn horizontal(def_y: f64, measured_y: f64, x0: f64, x1: f64) -> Dimension {
    Dimension {
        angle: 0.0,
        def_point: Point::xy(x0, def_y),
        text_mid: Point::xy((x0 + x1) / 2.0, def_y),
        measure_start: Point::xy(x0, measured_y),
        measure_end: Point::xy(x1, measured_y),
        ..Dimension::default()
    }
}

#[test]
fn rectangle_extends_past_dimension_line() {
    let dim = Dimension {
        angle: 0.0,
        def_point: Point::xy(0.0, 0.0),
        text_mid: Point::xy(0.0, 0.0),
        measure_start: Point::xy(0.0, -50.0),
        measure_end: Point::xy(100.0, -50.0),
        ..Dimension::default()
    };

    let rect = dim.perfect_rectangle(10.0);

    assert!(rect.min.x.abs() < 1e-9);
    assert!((rect.max.x - 100.0).abs() < 1e-9);
    assert!((rect.min.y + 50.0).abs() < 1e-9);
    assert!((rect.max.y - 10.0).abs() < 1e-9);
}

#[test]
fn rectangle_flips_towards_the_outside() {
    // Dimension line below the measured points: the tips go further down.
    let dim = horizontal(-100.0, 0.0, 0.0, 1000.0);

    let rect = dim.perfect_rectangle(25.0);

    assert!((rect.min.y + 125.0).abs() < 1e-9);
    assert!(rect.max.y.abs() < 1e-9);
}

#[test]
fn vertical_rectangle() {
    let dim = Dimension {
        angle: 90.0,
        def_point: Point::xy(-80.0, 0.0),
        text_mid: Point::xy(-80.0, 600.0),
        measure_start: Point::xy(0.0, 0.0),
        measure_end: Point::xy(0.0, 1200.0),
        ..Dimension::default()
    };

    let rect = dim.perfect_rectangle(5.0);

    assert!((rect.min.x + 85.0).abs() < 1e-9);
    assert!(rect.max.x.abs() < 1e-9);
    assert!(rect.min.y.abs() < 1e-9);
    assert!((rect.max.y - 1200.0).abs() < 1e-9);
}

#[test]
fn extension_uses_style_scale() {
    let mut doc = Document::default();
    doc.insert_dim_style(DimStyle {
        name: "sty1".to_string(),
        precision: 1,
        extension: 2.0,
        scale: 50.0,
    });
    let dim = Dimension {
        style_name: "STY1".to_string(),
        ..Dimension::default()
    };

    assert_eq!(100.0, dim.extension_length(&doc));
}

#[test]
fn unknown_style_falls_back_to_integers() {
    let doc = Document::default();
    let dim = Dimension {
        style_name: "STY1".to_string(),
        measurement: 1499.6,
        ..Dimension::default()
    };

    assert_eq!(0.0, dim.extension_length(&doc));
    assert_eq!(1500.0, dim.measured_value(&doc));
}

#[test]
fn rounds_to_style_precision() {
    let mut doc = Document::default();
    doc.insert_dim_style(DimStyle {
        name: "MM".to_string(),
        precision: 2,
        ..DimStyle::default()
    });
    let dim = Dimension {
        style_name: "MM".to_string(),
        measurement: 12.3456,
        ..Dimension::default()
    };

    assert!((dim.measured_value(&doc) - 12.35).abs() < 1e-9);
}

#[test]
fn text_override_wins() {
    let doc = Document::default();
    let dim = Dimension {
        measurement: 1498.0,
        text: r"\A1;\fSimSun|b0|i0;1500".to_string(),
        ..Dimension::default()
    };

    assert_eq!(1500.0, dim.measured_value(&doc));
}

#[test]
fn placeholder_text_keeps_measurement() {
    let doc = Document::default();
    let dim = Dimension {
        measurement: 899.7,
        text: "<> (clear)".to_string(),
        ..Dimension::default()
    };

    assert_eq!(900.0, dim.measured_value(&doc));
}

#[test]
fn override_without_numeral_keeps_measurement() {
    let doc = Document::default();
    let dim = Dimension {
        measurement: 600.2,
        text: "EQ".to_string(),
        ..Dimension::default()
    };

    assert_eq!(600.0, dim.measured_value(&doc));
}

#[test]
fn override_numerals() {
    assert_eq!(Some(2400.0), override_value("W=2400"));
    assert_eq!(Some(12.5), override_value(r"\H2.5;12.5"));
    assert_eq!(None, override_value("n/a"));
    assert_eq!(3.0, round_to(2.5, 0));
}

#[test]
fn override_skips_non_ascii_digits() {
    assert_eq!(Some(1180.0), override_value("宽１２００ 实测1180"));
    assert_eq!(Some(1500.0), override_value("٣ 1500"));
    assert_eq!(None, override_value("宽１２００"));

    let doc = Document::default();
    let dim = Dimension {
        measurement: 1200.0,
        text: "宽１２００ 实测1180".to_string(),
        ..Dimension::default()
    };
    assert_eq!(1180.0, dim.measured_value(&doc));
}
