//! SVG element emission and style serialization (spec component C8).

use std::fmt::Write as _;

use crate::dc::{DeviceContext, PolyFillMode};
use crate::objects::{BrushStyle, PenStyle};

/// Growable text buffer the interpreter writes SVG into. The original C
/// library backs its output with an `fmem`-style in-memory `FILE*`; the
/// idiomatic Rust equivalent is a plain `String` handed to the caller by
/// value once conversion finishes (spec §9 "Output sink" redesign item).
pub struct SvgWriter {
    buf: String,
    raw_prefix: String,
    namespace_prefix: String,
}

impl SvgWriter {
    pub fn new(namespace_prefix: &str) -> Self {
        let formatted = if namespace_prefix.is_empty() {
            String::new()
        } else {
            format!("{namespace_prefix}:")
        };
        SvgWriter {
            buf: String::new(),
            raw_prefix: namespace_prefix.to_owned(),
            namespace_prefix: formatted,
        }
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    fn ns(&self) -> String {
        self.namespace_prefix.clone()
    }

    pub fn write_prologue(&mut self, width: f64, height: f64) {
        let _ = writeln!(self.buf, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
        if self.raw_prefix.is_empty() {
            let _ = writeln!(
                self.buf,
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\">"
            );
        } else {
            let prefix = &self.raw_prefix;
            let _ = writeln!(
                self.buf,
                "<{prefix}:svg xmlns:{prefix}=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\">"
            );
        }
    }

    pub fn write_epilogue(&mut self) {
        let ns = self.ns();
        let _ = writeln!(self.buf, "</{ns}svg>");
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, dc: &DeviceContext, scaling: f64) {
        let ns = self.ns();
        let _ = write!(
            self.buf,
            "<{ns}line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\" "
        );
        self.stroke_style(dc, scaling);
        let _ = writeln!(self.buf, "/>");
    }

    #[allow(clippy::too_many_arguments)]
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, corner: Option<(f64, f64)>, dc: &DeviceContext, scaling: f64) {
        let ns = self.ns();
        let _ = write!(
            self.buf,
            "<{ns}rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" "
        );
        if let Some((rx, ry)) = corner {
            let _ = write!(self.buf, "rx=\"{rx:.2}\" ry=\"{ry:.2}\" ");
        }
        self.fill_style(dc);
        self.stroke_style(dc, scaling);
        let _ = writeln!(self.buf, "/>");
    }

    pub fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, dc: &DeviceContext, scaling: f64) {
        let ns = self.ns();
        let _ = write!(
            self.buf,
            "<{ns}ellipse cx=\"{cx:.2}\" cy=\"{cy:.2}\" rx=\"{rx:.2}\" ry=\"{ry:.2}\" "
        );
        self.fill_style(dc);
        self.stroke_style(dc, scaling);
        let _ = writeln!(self.buf, "/>");
    }

    pub fn polygon(&mut self, points: &[(f64, f64)], dc: &DeviceContext, scaling: f64) {
        let ns = self.ns();
        let _ = write!(self.buf, "<{ns}polygon points=\"");
        self.write_points(points);
        let _ = write!(self.buf, "\" ");
        self.fill_style(dc);
        self.stroke_style(dc, scaling);
        let _ = writeln!(self.buf, "/>");
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], dc: &DeviceContext, scaling: f64) {
        let ns = self.ns();
        let _ = write!(self.buf, "<{ns}polyline points=\"");
        self.write_points(points);
        let _ = write!(self.buf, "\" fill=\"none\" ");
        self.stroke_style(dc, scaling);
        let _ = writeln!(self.buf, "/>");
    }

    fn write_points(&mut self, points: &[(f64, f64)]) {
        for (x, y) in points {
            let _ = write!(self.buf, "{x:.2},{y:.2} ");
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn arc_path(
        &mut self,
        kind: ArcKind,
        cx: f64,
        cy: f64,
        sx: f64,
        sy: f64,
        rx: f64,
        ry: f64,
        ex: f64,
        ey: f64,
        large_arc: bool,
        dc: &DeviceContext,
        scaling: f64,
    ) {
        let ns = self.ns();
        let _ = write!(self.buf, "<{ns}path d=\"");
        if kind == ArcKind::Pie {
            let _ = write!(self.buf, "M {cx:.2},{cy:.2} L {sx:.2},{sy:.2} ");
        } else {
            let _ = write!(self.buf, "M {sx:.2},{sy:.2} ");
        }
        let large = if large_arc { 1 } else { 0 };
        let _ = write!(self.buf, "A {rx:.2},{ry:.2} 0 {large},1 {ex:.2},{ey:.2} ");
        if kind != ArcKind::Arc {
            let _ = write!(self.buf, "Z");
        }
        let _ = write!(self.buf, "\" ");

        if kind == ArcKind::Arc {
            let _ = write!(self.buf, "fill=\"none\" ");
        } else {
            self.fill_style(dc);
        }
        self.stroke_style(dc, scaling);
        let _ = writeln!(self.buf, "/>");
    }

    #[allow(clippy::too_many_arguments)]
    pub fn text(
        &mut self,
        x: f64,
        y: f64,
        dc: &DeviceContext,
        scaling: f64,
        text: &str,
    ) {
        // CENTER (0x0006) subsumes RIGHT's bit (0x0002); the original tests
        // `text_align & WMF_TA_CENTER` for nonzero, not for all bits set.
        let anchor = if dc.text_align.intersects(crate::dc::TextAlign::CENTER) {
            "middle"
        } else if dc.text_align.contains(crate::dc::TextAlign::RIGHT) {
            "end"
        } else {
            "start"
        };

        let mut font_size = dc.font_height.unsigned_abs() as f64 * scaling;
        if font_size < 1.0 {
            font_size = 12.0;
        }

        let ns = self.ns();
        let _ = write!(
            self.buf,
            "<{ns}text x=\"{x:.2}\" y=\"{y:.2}\" fill=\"#{:02X}{:02X}{:02X}\" font-size=\"{font_size:.2}\" text-anchor=\"{anchor}\" ",
            dc.text_color.r,
            dc.text_color.g,
            dc.text_color.b,
        );
        if !dc.font_name.is_empty() {
            let _ = write!(self.buf, "font-family=\"{}\" ", escape_xml(&dc.font_name));
        }
        if dc.font_italic {
            let _ = write!(self.buf, "font-style=\"italic\" ");
        }
        if dc.font_weight > 400 {
            let _ = write!(self.buf, "font-weight=\"bold\" ");
        }
        let _ = write!(self.buf, ">");
        let _ = write!(self.buf, "{}", escape_xml(text));
        let _ = writeln!(self.buf, "</{ns}text>");
    }

    fn stroke_style(&mut self, dc: &DeviceContext, scaling: f64) {
        if !dc.stroke_enabled || dc.stroke_style == PenStyle::Null {
            let _ = write!(self.buf, "stroke=\"none\" ");
            return;
        }

        let _ = write!(
            self.buf,
            "stroke=\"#{:02X}{:02X}{:02X}\" ",
            dc.stroke_color.r, dc.stroke_color.g, dc.stroke_color.b
        );

        let width = (dc.stroke_width * scaling).max(1.0);
        let _ = write!(self.buf, "stroke-width=\"{width:.2}\" ");

        match dc.stroke_style {
            PenStyle::Dash => {
                let _ = write!(self.buf, "stroke-dasharray=\"{:.0},{:.0}\" ", width * 3.0, width);
            }
            PenStyle::Dot => {
                let _ = write!(self.buf, "stroke-dasharray=\"{width:.0},{width:.0}\" ");
            }
            PenStyle::DashDot => {
                let _ = write!(
                    self.buf,
                    "stroke-dasharray=\"{:.0},{:.0},{:.0},{:.0}\" ",
                    width * 3.0,
                    width,
                    width,
                    width
                );
            }
            PenStyle::DashDotDot => {
                let _ = write!(
                    self.buf,
                    "stroke-dasharray=\"{:.0},{:.0},{:.0},{:.0},{:.0},{:.0}\" ",
                    width * 3.0,
                    width,
                    width,
                    width,
                    width,
                    width
                );
            }
            _ => {}
        }
    }

    fn fill_style(&mut self, dc: &DeviceContext) {
        if !dc.fill_enabled || matches!(dc.fill_style, BrushStyle::NullOrHollow) {
            let _ = write!(self.buf, "fill=\"none\" ");
            return;
        }

        let _ = write!(
            self.buf,
            "fill=\"#{:02X}{:02X}{:02X}\" ",
            dc.fill_color.r, dc.fill_color.g, dc.fill_color.b
        );

        let rule = if dc.poly_fill_mode == PolyFillMode::Winding {
            "nonzero"
        } else {
            "evenodd"
        };
        let _ = write!(self.buf, "fill-rule=\"{rule}\" ");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcKind {
    Arc,
    Chord,
    Pie,
}

/// Escapes `< > & "` character-by-character; every other byte passes
/// through unchanged (spec §4.7, §8 "XML-escaping is injective").
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Rgb;

    #[test]
    fn escape_xml_is_injective_on_reserved_chars() {
        assert_eq!(escape_xml("a<b>c&d\"e"), "a&lt;b&gt;c&amp;d&quot;e");
        assert_eq!(escape_xml("plain text"), "plain text");
    }

    #[test]
    fn stroke_style_reports_none_when_disabled() {
        let mut dc = DeviceContext::default();
        dc.disable_stroke();
        let mut w = SvgWriter::new("");
        w.stroke_style(&dc, 1.0);
        assert!(w.buf.contains("stroke=\"none\""));
    }

    #[test]
    fn dash_pattern_scales_with_stroke_width() {
        let mut dc = DeviceContext::default();
        dc.apply_pen(&crate::objects::PenObject {
            enabled: true,
            style: crate::objects::PenStyle::Dash,
            color: Rgb::BLACK,
            width: 2.0,
        });
        let mut w = SvgWriter::new("");
        w.stroke_style(&dc, 1.0);
        assert!(w.buf.contains("stroke-dasharray=\"6,2\""));
    }

    #[test]
    fn repeated_draws_with_unchanged_state_serialize_identically() {
        let dc = DeviceContext::default();
        let mut w1 = SvgWriter::new("");
        w1.stroke_style(&dc, 1.0);
        w1.fill_style(&dc);
        let mut w2 = SvgWriter::new("");
        w2.stroke_style(&dc, 1.0);
        w2.fill_style(&dc);
        assert_eq!(w1.buf, w2.buf);
    }
}
