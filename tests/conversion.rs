//! End-to-end conversion scenarios, driven through the public API rather
//! than the interpreter's internals.

use wmf2svg::{ConvertOptions, convert};

fn placeable_header(dst: (i16, i16, i16, i16), inch: u16, n_objects: u16) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0x9AC6_CDD7u32.to_le_bytes());
    bytes.extend_from_slice(&0u16.to_le_bytes()); // handle
    bytes.extend_from_slice(&dst.0.to_le_bytes());
    bytes.extend_from_slice(&dst.1.to_le_bytes());
    bytes.extend_from_slice(&dst.2.to_le_bytes());
    bytes.extend_from_slice(&dst.3.to_le_bytes());
    bytes.extend_from_slice(&inch.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes()); // reserved
    bytes.extend_from_slice(&0u16.to_le_bytes()); // checksum

    bytes.extend_from_slice(&1u16.to_le_bytes()); // Type
    bytes.extend_from_slice(&9u16.to_le_bytes()); // HeaderSize (words)
    bytes.extend_from_slice(&0x0300u16.to_le_bytes()); // Version
    bytes.extend_from_slice(&0u32.to_le_bytes()); // Size
    bytes.extend_from_slice(&n_objects.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes()); // MaxRecord
    bytes.extend_from_slice(&0u16.to_le_bytes()); // NumberOfMembers
    bytes
}

fn record(opcode: u8, payload: &[u8]) -> Vec<u8> {
    let byte_size = 6 + payload.len();
    assert_eq!(byte_size % 2, 0, "record length must be word-aligned");
    let mut rec = Vec::with_capacity(byte_size);
    rec.extend_from_slice(&((byte_size / 2) as u32).to_le_bytes());
    rec.push(opcode);
    rec.push(0);
    rec.extend_from_slice(payload);
    rec
}

fn eof() -> Vec<u8> {
    record(0x00, &[])
}

fn i16le(v: i16) -> [u8; 2] {
    v.to_le_bytes()
}
fn u16le(v: u16) -> [u8; 2] {
    v.to_le_bytes()
}

#[test]
fn minimum_valid_placeable_file_has_empty_body_and_dpi_scaled_canvas() {
    let mut data = placeable_header((0, 0, 100, 100), 1440, 0);
    data.extend_from_slice(&eof());

    let svg = convert(&data, &ConvertOptions::default()).unwrap();

    let expected_side = (100.0_f64 * 96.0 / 1440.0).round();
    assert!(svg.contains(&format!("width=\"{expected_side:.0}\"")));
    assert!(svg.contains(&format!("height=\"{expected_side:.0}\"")));

    let open_tag_end = svg.find('>').unwrap() + 1;
    let svg_open_end = svg[open_tag_end..].find('>').unwrap() + open_tag_end + 1;
    let close_tag_start = svg.find("</svg>").unwrap();
    assert_eq!(svg[svg_open_end..close_tag_start].trim(), "");
}

#[test]
fn stock_null_brush_then_rectangle_has_default_pen_and_no_fill() {
    let mut data = placeable_header((0, 0, 500, 500), 1440, 0);
    data.extend_from_slice(&record(0x2D, &0x8000_0005u32.to_le_bytes())); // SELECTOBJECT(NULL_BRUSH)
    let mut rect_payload = Vec::new();
    rect_payload.extend_from_slice(&i16le(0));
    rect_payload.extend_from_slice(&i16le(0));
    rect_payload.extend_from_slice(&i16le(10));
    rect_payload.extend_from_slice(&i16le(10));
    data.extend_from_slice(&record(0x1B, &rect_payload)); // RECTANGLE
    data.extend_from_slice(&eof());

    let svg = convert(&data, &ConvertOptions::default()).unwrap();
    assert!(svg.contains("<rect"));
    assert!(svg.contains("fill=\"none\""));
    assert!(svg.contains("stroke=\"#000000\""));
    assert!(svg.contains("stroke-width=\"1.00\""));
}

#[test]
fn dashed_pen_then_lineto_emits_scaled_dasharray() {
    // inch=96 keeps the DPI fallback scaling at 1.0 so the pen's width and
    // dash pattern come through unscaled.
    let mut data = placeable_header((0, 0, 100, 100), 96, 1);

    let mut pen_payload = Vec::new();
    pen_payload.extend_from_slice(&u16le(1)); // PS_DASH
    pen_payload.extend_from_slice(&i16le(2)); // width.x
    pen_payload.extend_from_slice(&i16le(0)); // width.y
    pen_payload.extend_from_slice(&[0xFF, 0x00, 0x00, 0x00]); // color
    data.extend_from_slice(&record(0xFA, &pen_payload)); // CREATEPENINDIRECT

    data.extend_from_slice(&record(0x2D, &0u32.to_le_bytes())); // SELECTOBJECT(0)

    let mut move_payload = Vec::new();
    move_payload.extend_from_slice(&i16le(0));
    move_payload.extend_from_slice(&i16le(0));
    data.extend_from_slice(&record(0x14, &move_payload)); // MOVETO

    let mut line_payload = Vec::new();
    line_payload.extend_from_slice(&i16le(10));
    line_payload.extend_from_slice(&i16le(20));
    data.extend_from_slice(&record(0x13, &line_payload)); // LINETO

    data.extend_from_slice(&eof());

    let svg = convert(&data, &ConvertOptions::default()).unwrap();
    assert!(svg.contains("<line"));
    assert!(svg.contains("stroke=\"#FF0000\""));
    assert!(svg.contains("stroke-width=\"2.00\""));
    assert!(svg.contains("stroke-dasharray=\"6,2\""));
}

#[test]
fn savedc_settextcolor_restoredc_round_trips_text_color() {
    let mut data = placeable_header((0, 0, 100, 100), 1440, 0);
    data.extend_from_slice(&record(0x1E, &[])); // SAVEDC
    data.extend_from_slice(&record(0x09, &[0x00, 0xFF, 0x00, 0x00])); // SETTEXTCOLOR(#00FF00)
    data.extend_from_slice(&record(0x27, &i16le(1))); // RESTOREDC(1)

    let mut text_payload = Vec::new();
    text_payload.extend_from_slice(&i16le(2)); // string length
    text_payload.extend_from_slice(b"hi");
    text_payload.extend_from_slice(&i16le(0)); // x
    text_payload.extend_from_slice(&i16le(0)); // y
    data.extend_from_slice(&record(0x21, &text_payload)); // TEXTOUT
    data.extend_from_slice(&eof());

    let svg = convert(&data, &ConvertOptions::default()).unwrap();
    assert!(svg.contains("<text"));
    assert!(svg.contains("fill=\"#000000\""));
    assert!(!svg.contains("fill=\"#00FF00\""));
}

#[test]
fn polypolygon_with_two_subpolygons_emits_two_polygon_elements() {
    let mut data = placeable_header((0, 0, 100, 100), 1440, 0);

    let counts = [3u16, 4u16];
    let n_points: u16 = counts.iter().sum();
    let mut payload = Vec::new();
    payload.extend_from_slice(&u16le(counts.len() as u16));
    for &c in &counts {
        payload.extend_from_slice(&u16le(c));
    }
    for i in 0..n_points {
        payload.extend_from_slice(&i16le(i as i16));
        payload.extend_from_slice(&i16le(i as i16));
    }
    assert_eq!(payload.len(), 2 + counts.len() * 2 + n_points as usize * 4);

    data.extend_from_slice(&record(0x38, &payload)); // POLYPOLYGON
    data.extend_from_slice(&eof());

    let svg = convert(&data, &ConvertOptions::default()).unwrap();
    assert_eq!(svg.matches("<polygon").count(), 2);
}

#[test]
fn truncated_trailing_record_still_returns_a_closed_document() {
    let mut data = placeable_header((0, 0, 100, 100), 1440, 0);
    // A RECTANGLE record that claims a payload longer than what follows.
    data.extend_from_slice(&7u32.to_le_bytes());
    data.push(0x1B);
    data.push(0);
    data.extend_from_slice(&i16le(0));

    let svg = convert(&data, &ConvertOptions::default()).unwrap();
    assert!(svg.trim_end().ends_with("</svg>"));
    assert!(!svg.contains("<rect"));
}
