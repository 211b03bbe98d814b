use std::io::Cursor;
use winextract_import_dxf::{ScanError, Scanner, Tag};

fn scan(text: &str) -> Vec<Result<Tag, ScanError>> {
    Scanner::new(Cursor::new(text.as_bytes().to_vec())).collect()
}

fn tags(text: &str) -> Vec<Tag> {
    scan(text)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .expect("scan")
}

#[test]
fn reads_code_value_pairs() {
    let got = tags("  0\nSECTION\n  2\nHEADER\n  0\nENDSEC\n  0\nEOF\n");

    assert_eq!(
        vec![
            Tag::new(0, "SECTION"),
            Tag::new(2, "HEADER"),
            Tag::new(0, "ENDSEC"),
            Tag::new(0, "EOF"),
        ],
        got
    );
}

#[test]
fn skips_blank_code_lines_only() {
    let got = tags("0\nSECTION\n\n\n2\nENTITIES\n1\n\n");

    assert_eq!(
        vec![
            Tag::new(0, "SECTION"),
            Tag::new(2, "ENTITIES"),
            Tag::new(1, ""),
        ],
        got
    );
}

#[test]
fn keeps_value_spacing() {
    let got = tags("1\n  1500 x 1200  \n");

    assert_eq!("  1500 x 1200  ", got[0].value);
    assert_eq!("1500 x 1200", got[0].as_str());
}

#[test]
fn strips_crlf_terminators() {
    let got = tags("0\r\nLINE\r\n8\r\nPJ\r\n10\r\n12.5\r\n");

    assert_eq!(Tag::new(0, "LINE"), got[0]);
    assert_eq!(Tag::new(8, "PJ"), got[1]);
    assert_eq!(12.5, got[2].as_f64());
}

#[test]
fn accepts_final_value_without_newline() {
    assert_eq!(vec![Tag::new(0, "EOF")], tags("0\nEOF"));
}

#[test]
fn invalid_code_ends_the_stream() {
    let got = scan("0\nSECTION\nabc\nfoo\n0\nEOF\n");

    assert_eq!(2, got.len());
    assert_eq!(&Tag::new(0, "SECTION"), got[0].as_ref().expect("first tag"));
    match &got[1] {
        Err(ScanError::InvalidCode { line, raw }) => {
            assert_eq!(3, *line);
            assert_eq!("abc", raw);
        }
        other => panic!("expected InvalidCode, got {other:?}"),
    }
}

#[test]
fn truncated_pair_is_reported() {
    let got = scan("0\nSECTION\n2\n");

    match got.last() {
        Some(Err(ScanError::MissingValue { line, code })) => {
            assert_eq!(3, *line);
            assert_eq!(2, *code);
        }
        other => panic!("expected MissingValue, got {other:?}"),
    }
}

#[test]
fn advance_reports_end_and_error_state() {
    let mut scanner = Scanner::new(Cursor::new(b"0\nLINE\n".to_vec()));

    assert!(scanner.advance());
    assert!(scanner.last_tag().is_marker("line"));
    assert_eq!(2, scanner.line());
    assert!(!scanner.advance());
    assert!(scanner.is_done());
    assert!(scanner.err().is_none());
    assert!(!scanner.advance());
}

#[test]
fn tag_conversions_fall_back_to_zero() {
    assert_eq!(0.0, Tag::new(40, "n/a").as_f64());
    assert_eq!(271, Tag::new(70, " 271 ").as_i32());
    assert_eq!(0, Tag::new(70, "").as_i32());
    assert!(!Tag::new(2, "SECTION").is_marker("SECTION"));
}
