//! Record dispatch and the draw loop (spec component C7).
//!
//! One function per supported opcode, driven by a flat `match` on the
//! record's low function byte. Each handler either mutates
//! [`InterpreterState`] or emits an SVG element through [`SvgWriter`] -
//! never both in a way that would let emission race a stale DC, since
//! spec §5 requires state mutation to precede emission within a record.

use std::f64::consts::PI;

use crate::dc::{BackgroundMode, DeviceContext, PolyFillMode, TextAlign};
use crate::header::DecodedHeader;
use crate::objects::{
    BrushObject, BrushStyle, FontObject, GraphicsObject, ObjectSelector, ObjectTable, PenObject,
    PenStyle, Rgb,
};
use crate::reader::ByteReader;
use crate::record::{self, opcode, LogBrush16, LogFont16, LogPen16, Point16, Rect16, RecordPrologue};
use crate::svg::{ArcKind, SvgWriter};
use crate::trace::{TraceSink, TraceStatus};
use crate::transform::{CanvasSize, Transform};

/// The draw loop's only backstop once the buffer itself is exhausted
/// (spec §4.7/§7).
const MAX_RECORDS: usize = 100_000;

/// Top-level state bag threaded through the draw loop (spec §3:
/// `InterpreterState`).
pub struct InterpreterState {
    pub objects: ObjectTable,
    pub dc: DeviceContext,
    pub dc_stack: crate::dc::DcStack,
    pub transform: Transform,
    pub canvas: CanvasSize,
    pub cur_x: f64,
    pub cur_y: f64,
    next_id: u32,
}

impl InterpreterState {
    pub fn new(header: &DecodedHeader, req_width: f64, req_height: f64) -> Self {
        let (transform, canvas) = Transform::initial(header, req_width, req_height);
        InterpreterState {
            objects: ObjectTable::new(header.standard.n_objects),
            dc: DeviceContext::default(),
            dc_stack: crate::dc::DcStack::new(),
            transform,
            canvas,
            cur_x: 0.0,
            cur_y: 0.0,
            next_id: 0,
        }
    }

    /// Allocates a fresh id for a synthesized SVG element. Not yet consumed
    /// by any supported record (reserved for clip-path/pattern ids a future
    /// extension would add), but exposed so that extension has somewhere to
    /// plug in without reworking the state bag.
    pub fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Runs the record loop starting at `record_start`, writing SVG elements
/// into `out` and mutating `state` as it goes. Never returns an `Err`:
/// every failure mode named in spec §7 is non-fatal and only ends the loop.
pub fn run(
    data: &[u8],
    record_start: usize,
    state: &mut InterpreterState,
    out: &mut SvgWriter,
    trace: &mut dyn TraceSink,
) {
    let mut pos = record_start;
    let mut count = 0usize;

    loop {
        if pos >= data.len() {
            break;
        }

        let mut prologue_reader = ByteReader::new(&data[pos..]);
        let prologue = match RecordPrologue::read(&mut prologue_reader) {
            Some(p) => p,
            None => break,
        };

        if prologue.byte_size < 6 || pos + prologue.byte_size > data.len() {
            break;
        }

        let payload = &data[pos + 6..pos + prologue.byte_size];

        if prologue.i_type == opcode::EOF {
            trace.record(count, prologue.function_number(), format_args!("EOF"), TraceStatus::Supported);
            break;
        }

        dispatch(prologue.i_type, prologue.function_number(), payload, state, out, trace, count);

        pos += prologue.byte_size;
        count += 1;

        if count > MAX_RECORDS {
            trace.record(
                count,
                0,
                format_args!("too many records, stopping"),
                TraceStatus::Ignored,
            );
            break;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn dispatch(
    i_type: u8,
    function_number: u16,
    payload: &[u8],
    state: &mut InterpreterState,
    out: &mut SvgWriter,
    trace: &mut dyn TraceSink,
    count: usize,
) {
    let mut r = ByteReader::new(payload);
    let status = handle(i_type, &mut r, state, out);

    let name = opcode_name(i_type);
    trace.record(count, function_number, format_args!("{name}"), status);
}

fn opcode_name(i_type: u8) -> &'static str {
    match i_type {
        opcode::SETBKCOLOR => "SETBKCOLOR",
        opcode::SETBKMODE => "SETBKMODE",
        opcode::SETMAPMODE => "SETMAPMODE",
        opcode::SETROP2 => "SETROP2",
        opcode::SETRELABS => "SETRELABS",
        opcode::SETPOLYFILLMODE => "SETPOLYFILLMODE",
        opcode::SETSTRETCHBLTMODE => "SETSTRETCHBLTMODE",
        opcode::SETTEXTCOLOR => "SETTEXTCOLOR",
        opcode::SETWINDOWORG => "SETWINDOWORG",
        opcode::SETWINDOWEXT => "SETWINDOWEXT",
        opcode::SETVIEWPORTORG => "SETVIEWPORTORG",
        opcode::SETVIEWPORTEXT => "SETVIEWPORTEXT",
        opcode::LINETO => "LINETO",
        opcode::MOVETO => "MOVETO",
        opcode::ARC => "ARC",
        opcode::ELLIPSE => "ELLIPSE",
        opcode::PIE => "PIE",
        opcode::RECTANGLE => "RECTANGLE",
        opcode::ROUNDRECT => "ROUNDRECT",
        opcode::SAVEDC => "SAVEDC",
        opcode::TEXTOUT => "TEXTOUT",
        opcode::POLYGON => "POLYGON",
        opcode::POLYLINE => "POLYLINE",
        opcode::ESCAPE => "ESCAPE",
        opcode::RESTOREDC => "RESTOREDC",
        opcode::SELECTOBJECT => "SELECTOBJECT",
        opcode::SETTEXTALIGN => "SETTEXTALIGN",
        opcode::CHORD => "CHORD",
        opcode::SETMAPPERFLAGS => "SETMAPPERFLAGS",
        opcode::EXTTEXTOUT => "EXTTEXTOUT",
        opcode::SELECTPALETTE => "SELECTPALETTE",
        opcode::REALIZEPALETTE => "REALIZEPALETTE",
        opcode::ANIMATEPALETTE => "ANIMATEPALETTE",
        opcode::SETPALENTRIES => "SETPALENTRIES",
        opcode::POLYPOLYGON => "POLYPOLYGON",
        opcode::RESIZEPALETTE => "RESIZEPALETTE",
        opcode::CREATEPALETTE => "CREATEPALETTE",
        opcode::DELETEOBJECT => "DELETEOBJECT",
        opcode::CREATEPENINDIRECT => "CREATEPENINDIRECT",
        opcode::CREATEFONTINDIRECT => "CREATEFONTINDIRECT",
        opcode::CREATEBRUSHINDIRECT => "CREATEBRUSHINDIRECT",
        _ => "UNKNOWN",
    }
}

fn handle(
    i_type: u8,
    r: &mut ByteReader,
    state: &mut InterpreterState,
    out: &mut SvgWriter,
) -> TraceStatus {
    match i_type {
        opcode::SETBKCOLOR => with_color(r, |c| state.dc.background_color = c),
        opcode::SETBKMODE => with_u16(r, |v| {
            state.dc.background_mode = if v == 1 {
                BackgroundMode::Transparent
            } else {
                BackgroundMode::Opaque
            };
        }),
        opcode::SETMAPMODE => with_u16(r, |v| state.transform.map_mode = v.into()),
        opcode::SETROP2 => {
            let status = with_u16(r, |v| state.dc.rop2 = v);
            if status == TraceStatus::Supported {
                TraceStatus::Partial
            } else {
                status
            }
        }
        opcode::SETPOLYFILLMODE => with_u16(r, |v| state.dc.poly_fill_mode = PolyFillMode::from(v)),
        opcode::SETTEXTCOLOR => with_color(r, |c| state.dc.text_color = c),
        opcode::SETTEXTALIGN => with_u16(r, |v| state.dc.text_align = TextAlign::from_bits_retain(v)),
        opcode::SETWINDOWORG => with_point(r, |p| {
            state.transform.window_org_x = p.x as f64;
            state.transform.window_org_y = p.y as f64;
        }),
        opcode::SETWINDOWEXT => with_point(r, |p| {
            state.transform.window_ext_x = p.x as f64;
            state.transform.window_ext_y = p.y as f64;
        }),
        opcode::SETVIEWPORTORG => with_point(r, |p| {
            state.transform.viewport_org_x = p.x as f64;
            state.transform.viewport_org_y = p.y as f64;
        }),
        opcode::SETVIEWPORTEXT => with_point(r, |p| {
            state.transform.viewport_ext_x = p.x as f64;
            state.transform.viewport_ext_y = p.y as f64;
        }),
        opcode::SAVEDC => {
            state.dc_stack.push(state.dc.clone());
            TraceStatus::Supported
        }
        opcode::RESTOREDC => with_i16(r, |n| restore_dc(state, n)),
        // A real META_SELECTOBJECT operand is 16-bit; this reads 32 bits to
        // honor the 0x80000000 stock-object tag per the selector model this
        // interpreter follows. Over a genuine 2-byte operand this read fails
        // and the select is silently dropped - a known divergence from the
        // on-wire MS-WMF record.
        opcode::SELECTOBJECT => with_u32(r, |selector| select_object(state, selector)),
        opcode::DELETEOBJECT => with_u16(r, |idx| state.objects.delete(idx)),
        opcode::CREATEPENINDIRECT => create_pen(r, state),
        opcode::CREATEBRUSHINDIRECT => create_brush(r, state),
        opcode::CREATEFONTINDIRECT => create_font(r, state),
        opcode::MOVETO => with_point(r, |p| {
            state.cur_x = state.transform.scale_x(p.x);
            state.cur_y = state.transform.scale_y(p.y);
        }),
        opcode::LINETO => line_to(r, state, out),
        opcode::RECTANGLE => rectangle(r, state, out),
        opcode::ROUNDRECT => round_rect(r, state, out),
        opcode::ELLIPSE => ellipse(r, state, out),
        opcode::POLYGON => poly(r, state, out, false),
        opcode::POLYLINE => poly(r, state, out, true),
        opcode::POLYPOLYGON => poly_poly(r, state, out),
        opcode::ARC => arc(r, state, out, ArcKind::Arc),
        opcode::CHORD => arc(r, state, out, ArcKind::Chord),
        opcode::PIE => arc(r, state, out, ArcKind::Pie),
        opcode::TEXTOUT => text_out(r, state, out),
        opcode::EXTTEXTOUT => ext_text_out(r, state, out),

        opcode::SETRELABS
        | opcode::SETSTRETCHBLTMODE
        | opcode::SETMAPPERFLAGS
        | opcode::ESCAPE
        | opcode::REALIZEPALETTE
        | opcode::SELECTPALETTE
        | opcode::CREATEPALETTE
        | opcode::SETPALENTRIES
        | opcode::RESIZEPALETTE
        | opcode::ANIMATEPALETTE => TraceStatus::Ignored,

        _ => TraceStatus::Ignored,
    }
}

fn with_color(r: &mut ByteReader, f: impl FnOnce(Rgb)) -> TraceStatus {
    match record::ColorRgb::from_reader(r) {
        Ok(c) => {
            f(Rgb {
                r: c.red,
                g: c.green,
                b: c.blue,
            });
            TraceStatus::Supported
        }
        Err(_) => TraceStatus::Ignored,
    }
}

fn with_u16(r: &mut ByteReader, f: impl FnOnce(u16)) -> TraceStatus {
    match r.read_u16() {
        Ok(v) => {
            f(v);
            TraceStatus::Supported
        }
        Err(_) => TraceStatus::Ignored,
    }
}

fn with_u32(r: &mut ByteReader, f: impl FnOnce(u32)) -> TraceStatus {
    match r.read_u32() {
        Ok(v) => {
            f(v);
            TraceStatus::Supported
        }
        Err(_) => TraceStatus::Ignored,
    }
}

fn with_i16(r: &mut ByteReader, f: impl FnOnce(i16)) -> TraceStatus {
    match r.read_i16() {
        Ok(v) => {
            f(v);
            TraceStatus::Supported
        }
        Err(_) => TraceStatus::Ignored,
    }
}

fn with_point(r: &mut ByteReader, f: impl FnOnce(Point16)) -> TraceStatus {
    match Point16::from_reader(r) {
        Ok(p) => {
            f(p);
            TraceStatus::Supported
        }
        Err(_) => TraceStatus::Ignored,
    }
}

/// `RESTOREDC(n)`: the source treats both positive (absolute) and negative
/// (relative) indices identically as "pop `|n|` frames" (spec §4.5/§9 open
/// question; behavior is preserved rather than guessing at absolute
/// semantics).
fn restore_dc(state: &mut InterpreterState, n: i16) {
    if n == 0 {
        return;
    }
    let count = n.unsigned_abs();
    for _ in 0..count {
        match state.dc_stack.pop() {
            Some(dc) => state.dc = dc,
            None => break,
        }
    }
}

fn select_object(state: &mut InterpreterState, raw: u32) {
    match ObjectSelector::decode(raw) {
        ObjectSelector::Stock(stock) => stock.apply(&mut state.dc),
        ObjectSelector::TableIndex(idx) => {
            if let Some(obj) = state.objects.get(idx) {
                match obj {
                    GraphicsObject::Pen(pen) => {
                        let pen = pen.clone();
                        state.dc.apply_pen(&pen);
                    }
                    GraphicsObject::Brush(brush) => {
                        let brush = brush.clone();
                        state.dc.apply_brush(&brush);
                    }
                    GraphicsObject::Font(font) => {
                        let font = font.clone();
                        state.dc.apply_font(&font);
                    }
                    GraphicsObject::Invalid => {}
                }
            }
        }
    }
}

fn create_pen(r: &mut ByteReader, state: &mut InterpreterState) -> TraceStatus {
    match LogPen16::from_reader(r) {
        Ok(pen) => {
            let width = pen.width.x;
            let obj = PenObject {
                enabled: PenStyle::from(pen.style) != PenStyle::Null,
                style: PenStyle::from(pen.style),
                color: Rgb {
                    r: pen.color.red,
                    g: pen.color.green,
                    b: pen.color.blue,
                },
                width: if width > 0 { width as f64 } else { 1.0 },
            };
            state.objects.create(GraphicsObject::Pen(obj));
            TraceStatus::Supported
        }
        Err(_) => TraceStatus::Ignored,
    }
}

fn create_brush(r: &mut ByteReader, state: &mut InterpreterState) -> TraceStatus {
    match LogBrush16::from_reader(r) {
        Ok(lb) => {
            let style = BrushStyle::from(lb.style);
            let obj = BrushObject {
                enabled: !matches!(style, BrushStyle::NullOrHollow),
                style,
                hatch: lb.hatch,
                color: Rgb {
                    r: lb.color.red,
                    g: lb.color.green,
                    b: lb.color.blue,
                },
            };
            state.objects.create(GraphicsObject::Brush(obj));
            TraceStatus::Supported
        }
        Err(_) => TraceStatus::Ignored,
    }
}

fn create_font(r: &mut ByteReader, state: &mut InterpreterState) -> TraceStatus {
    match LogFont16::from_reader(r) {
        Ok(font) => {
            let obj = FontObject {
                face_name: font.face_name(),
                height: font.height,
                width: font.width,
                escapement: font.escapement,
                orientation: font.orientation,
                weight: font.weight,
                italic: font.italic != 0,
                underline: font.underline != 0,
                strikeout: font.strike_out != 0,
                char_set: font.char_set,
            };
            state.objects.create(GraphicsObject::Font(obj));
            TraceStatus::Supported
        }
        Err(_) => TraceStatus::Ignored,
    }
}

fn line_to(r: &mut ByteReader, state: &mut InterpreterState, out: &mut SvgWriter) -> TraceStatus {
    match Point16::from_reader(r) {
        Ok(p) => {
            let x2 = state.transform.scale_x(p.x);
            let y2 = state.transform.scale_y(p.y);
            out.line(state.cur_x, state.cur_y, x2, y2, &state.dc, state.transform.scaling);
            state.cur_x = x2;
            state.cur_y = y2;
            TraceStatus::Supported
        }
        Err(_) => TraceStatus::Ignored,
    }
}

fn rectangle(r: &mut ByteReader, state: &mut InterpreterState, out: &mut SvgWriter) -> TraceStatus {
    match Rect16::from_reader(r) {
        Ok(rect) => {
            let x = state.transform.scale_x(rect.left);
            let y = state.transform.scale_y(rect.top);
            let w = state.transform.scale_x(rect.right) - x;
            let h = state.transform.scale_y(rect.bottom) - y;
            out.rect(x, y, w, h, None, &state.dc, state.transform.scaling);
            TraceStatus::Supported
        }
        Err(_) => TraceStatus::Ignored,
    }
}

fn round_rect(r: &mut ByteReader, state: &mut InterpreterState, out: &mut SvgWriter) -> TraceStatus {
    let width = match r.read_i16() {
        Ok(v) => v,
        Err(_) => return TraceStatus::Ignored,
    };
    let height = match r.read_i16() {
        Ok(v) => v,
        Err(_) => return TraceStatus::Ignored,
    };
    match Rect16::from_reader(r) {
        Ok(rect) => {
            let x = state.transform.scale_x(rect.left);
            let y = state.transform.scale_y(rect.top);
            let w = state.transform.scale_x(rect.right) - x;
            let h = state.transform.scale_y(rect.bottom) - y;
            let rx = (width as f64 * state.transform.scaling).abs() / 2.0;
            let ry = (height as f64 * state.transform.scaling).abs() / 2.0;
            out.rect(x, y, w, h, Some((rx, ry)), &state.dc, state.transform.scaling);
            TraceStatus::Supported
        }
        Err(_) => TraceStatus::Ignored,
    }
}

fn ellipse(r: &mut ByteReader, state: &mut InterpreterState, out: &mut SvgWriter) -> TraceStatus {
    match Rect16::from_reader(r) {
        Ok(rect) => {
            let (cx, cy, rx, ry) = ellipse_geometry(state, rect);
            out.ellipse(cx, cy, rx, ry, &state.dc, state.transform.scaling);
            TraceStatus::Supported
        }
        Err(_) => TraceStatus::Ignored,
    }
}

fn ellipse_geometry(state: &InterpreterState, rect: Rect16) -> (f64, f64, f64, f64) {
    let x1 = state.transform.scale_x(rect.left);
    let y1 = state.transform.scale_y(rect.top);
    let x2 = state.transform.scale_x(rect.right);
    let y2 = state.transform.scale_y(rect.bottom);
    (
        (x1 + x2) / 2.0,
        (y1 + y2) / 2.0,
        (x2 - x1).abs() / 2.0,
        (y2 - y1).abs() / 2.0,
    )
}

fn read_points(r: &mut ByteReader, n: u16) -> Option<Vec<Point16>> {
    let mut pts = Vec::with_capacity(n as usize);
    for _ in 0..n {
        pts.push(Point16::from_reader(r).ok()?);
    }
    Some(pts)
}

fn poly(r: &mut ByteReader, state: &mut InterpreterState, out: &mut SvgWriter, is_line: bool) -> TraceStatus {
    let n = match r.read_u16() {
        Ok(v) => v,
        Err(_) => return TraceStatus::Ignored,
    };
    if n == 0 {
        return TraceStatus::Ignored;
    }
    match read_points(r, n) {
        Some(pts) => {
            let scaled: Vec<(f64, f64)> = pts
                .iter()
                .map(|p| (state.transform.scale_x(p.x), state.transform.scale_y(p.y)))
                .collect();
            if is_line {
                out.polyline(&scaled, &state.dc, state.transform.scaling);
            } else {
                out.polygon(&scaled, &state.dc, state.transform.scaling);
            }
            TraceStatus::Supported
        }
        None => TraceStatus::Ignored,
    }
}

fn poly_poly(r: &mut ByteReader, state: &mut InterpreterState, out: &mut SvgWriter) -> TraceStatus {
    let n_polys = match r.read_u16() {
        Ok(v) => v,
        Err(_) => return TraceStatus::Ignored,
    };
    let mut counts = Vec::with_capacity(n_polys as usize);
    for _ in 0..n_polys {
        match r.read_u16() {
            Ok(c) => counts.push(c),
            Err(_) => return TraceStatus::Ignored,
        }
    }

    for &count in &counts {
        if count == 0 {
            continue;
        }
        match read_points(r, count) {
            Some(pts) => {
                let scaled: Vec<(f64, f64)> = pts
                    .iter()
                    .map(|p| (state.transform.scale_x(p.x), state.transform.scale_y(p.y)))
                    .collect();
                out.polygon(&scaled, &state.dc, state.transform.scaling);
            }
            None => return TraceStatus::Ignored,
        }
    }
    TraceStatus::Supported
}

fn arc(r: &mut ByteReader, state: &mut InterpreterState, out: &mut SvgWriter, kind: ArcKind) -> TraceStatus {
    let end_arc = match Point16::from_reader(r) {
        Ok(p) => p,
        Err(_) => return TraceStatus::Ignored,
    };
    let start_arc = match Point16::from_reader(r) {
        Ok(p) => p,
        Err(_) => return TraceStatus::Ignored,
    };
    let rect = match Rect16::from_reader(r) {
        Ok(rect) => rect,
        Err(_) => return TraceStatus::Ignored,
    };

    let (cx, cy, rx, ry) = ellipse_geometry(state, rect);

    let start_x = state.transform.scale_x(start_arc.x);
    let start_y = state.transform.scale_y(start_arc.y);
    let end_x = state.transform.scale_x(end_arc.x);
    let end_y = state.transform.scale_y(end_arc.y);

    let start_angle = (start_y - cy).atan2(start_x - cx);
    let end_angle = (end_y - cy).atan2(end_x - cx);

    let sx = cx + rx * start_angle.cos();
    let sy = cy + ry * start_angle.sin();
    let ex = cx + rx * end_angle.cos();
    let ey = cy + ry * end_angle.sin();

    let mut angle_diff = end_angle - start_angle;
    if angle_diff < 0.0 {
        angle_diff += 2.0 * PI;
    }
    let large_arc = angle_diff > PI;

    out.arc_path(kind, cx, cy, sx, sy, rx, ry, ex, ey, large_arc, &state.dc, state.transform.scaling);
    TraceStatus::Supported
}

fn text_out(r: &mut ByteReader, state: &mut InterpreterState, out: &mut SvgWriter) -> TraceStatus {
    // `TEXTOUT`'s wire layout is string bytes followed by the length and
    // destination point (the string is variable-length, so it is written
    // before the fixed trailer - spec §4.7).
    let len = match r.read_i16() {
        Ok(v) => v,
        Err(_) => return TraceStatus::Ignored,
    };
    if len <= 0 {
        return TraceStatus::Ignored;
    }
    let text_bytes = match r.read_bytes(len as usize) {
        Ok(b) => b,
        Err(_) => return TraceStatus::Ignored,
    };
    if len % 2 != 0 {
        // The record is word-aligned: an odd-length string is followed by
        // one pad byte before the destination point.
        if r.skip(1).is_err() {
            return TraceStatus::Ignored;
        }
    }
    let dst = match Point16::from_reader(r) {
        Ok(p) => p,
        Err(_) => return TraceStatus::Ignored,
    };

    emit_text(state, out, dst, text_bytes);
    TraceStatus::Supported
}

fn ext_text_out(r: &mut ByteReader, state: &mut InterpreterState, out: &mut SvgWriter) -> TraceStatus {
    let dst = match Point16::from_reader(r) {
        Ok(p) => p,
        Err(_) => return TraceStatus::Ignored,
    };
    let len = match r.read_i16() {
        Ok(v) => v,
        Err(_) => return TraceStatus::Ignored,
    };
    let opts = match r.read_u16() {
        Ok(v) => v,
        Err(_) => return TraceStatus::Ignored,
    };
    // A clipping rectangle precedes the string only when ETO_CLIPPED or
    // ETO_OPAQUE is requested.
    const ETO_OPAQUE: u16 = 0x0002;
    const ETO_CLIPPED: u16 = 0x0004;
    if opts & (ETO_OPAQUE | ETO_CLIPPED) != 0 && Rect16::from_reader(r).is_err() {
        return TraceStatus::Ignored;
    }
    if len <= 0 {
        return TraceStatus::Ignored;
    }
    let text_bytes = match r.read_bytes(len as usize) {
        Ok(b) => b,
        Err(_) => return TraceStatus::Ignored,
    };
    // Optional per-character spacing (dx[]) trails the string; it does not
    // affect SVG layout here, so it is left unread - remaining bytes are
    // simply not consumed, which is harmless since the draw loop advances
    // by the record's declared byte size rather than the reader's position.

    emit_text(state, out, dst, text_bytes);
    TraceStatus::Supported
}

fn emit_text(state: &InterpreterState, out: &mut SvgWriter, dst: Point16, text_bytes: &[u8]) {
    let x = state.transform.scale_x(dst.x);
    let y = state.transform.scale_y(dst.y);
    let end = text_bytes.iter().position(|&b| b == 0).unwrap_or(text_bytes.len());
    let text = String::from_utf8_lossy(&text_bytes[..end]);
    out.text(x, y, &state.dc, state.transform.scaling, &text);
}
