//! Device context and its save/restore stack (spec component C5).

use crate::objects::{BrushObject, BrushStyle, FontObject, PenObject, PenStyle, Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundMode {
    Transparent,
    Opaque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolyFillMode {
    Alternate,
    Winding,
}

impl From<u16> for PolyFillMode {
    fn from(v: u16) -> Self {
        if v == 2 {
            PolyFillMode::Winding
        } else {
            PolyFillMode::Alternate
        }
    }
}

bitflags::bitflags! {
    /// `TA_*` text-alignment bits (spec §3/§4.7's `text-align` bitmask).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TextAlign: u16 {
        const UPDATECP = 0x0001;
        const RIGHT    = 0x0002;
        const CENTER   = 0x0006;
        const BOTTOM   = 0x0008;
        const BASELINE = 0x0018;
    }
}

/// Current painting state (spec §3: `DeviceContext`).
#[derive(Debug, Clone)]
pub struct DeviceContext {
    pub stroke_enabled: bool,
    pub stroke_style: PenStyle,
    pub stroke_color: Rgb,
    pub stroke_width: f64,

    pub fill_enabled: bool,
    pub fill_style: BrushStyle,
    pub fill_hatch: u16,
    pub fill_color: Rgb,

    pub font_set: bool,
    pub font_name: String,
    pub font_height: i16,
    pub font_width: i16,
    pub font_escapement: i16,
    pub font_orientation: i16,
    pub font_weight: i16,
    pub font_italic: bool,
    pub font_underline: bool,
    pub font_strikeout: bool,
    pub font_charset: u8,

    pub text_color: Rgb,
    pub text_align: TextAlign,

    pub background_color: Rgb,
    pub background_mode: BackgroundMode,

    pub poly_fill_mode: PolyFillMode,
    pub rop2: u16,
}

impl Default for DeviceContext {
    /// The initial DC (spec §4.5), set exactly once at interpreter start.
    fn default() -> Self {
        DeviceContext {
            stroke_enabled: true,
            stroke_style: PenStyle::Solid,
            stroke_color: Rgb::BLACK,
            stroke_width: 1.0,

            fill_enabled: true,
            fill_style: BrushStyle::Solid,
            fill_hatch: 0,
            fill_color: Rgb::WHITE,

            font_set: false,
            font_name: String::new(),
            font_height: 0,
            font_width: 0,
            font_escapement: 0,
            font_orientation: 0,
            font_weight: 0,
            font_italic: false,
            font_underline: false,
            font_strikeout: false,
            font_charset: 0,

            text_color: Rgb::BLACK,
            text_align: TextAlign::empty(),

            background_color: Rgb::WHITE,
            background_mode: BackgroundMode::Opaque,

            poly_fill_mode: PolyFillMode::Alternate,
            rop2: 13, // R2_COPYPEN
        }
    }
}

impl DeviceContext {
    pub fn set_solid_fill(&mut self, color: Rgb) {
        self.fill_enabled = true;
        self.fill_style = BrushStyle::Solid;
        self.fill_color = color;
    }

    pub fn disable_fill(&mut self) {
        self.fill_enabled = false;
        self.fill_style = BrushStyle::NullOrHollow;
    }

    pub fn set_solid_stroke(&mut self, color: Rgb) {
        self.stroke_enabled = true;
        self.stroke_style = PenStyle::Solid;
        self.stroke_color = color;
        self.stroke_width = 1.0;
    }

    pub fn disable_stroke(&mut self) {
        self.stroke_enabled = false;
        self.stroke_style = PenStyle::Null;
    }

    pub fn apply_pen(&mut self, pen: &PenObject) {
        self.stroke_enabled = pen.enabled;
        self.stroke_style = pen.style;
        self.stroke_color = pen.color;
        self.stroke_width = pen.width;
    }

    pub fn apply_brush(&mut self, brush: &BrushObject) {
        self.fill_enabled = brush.enabled;
        self.fill_style = brush.style;
        self.fill_hatch = brush.hatch;
        self.fill_color = brush.color;
    }

    pub fn apply_font(&mut self, font: &FontObject) {
        self.font_set = true;
        self.font_name = font.face_name.clone();
        self.font_height = font.height;
        self.font_width = font.width;
        self.font_escapement = font.escapement;
        self.font_orientation = font.orientation;
        self.font_weight = font.weight;
        self.font_italic = font.italic;
        self.font_underline = font.underline;
        self.font_strikeout = font.strikeout;
        self.font_charset = font.char_set;
    }
}

/// LIFO stack of saved [`DeviceContext`] snapshots (spec §3: `DCStack`).
/// Snapshots are deep copies; `DeviceContext` owns no shared state (its
/// only heap field, `font_name`, is a plain `String`), so push/pop here
/// is ordinary Rust ownership transfer rather than the explicit
/// strdup/free pairing the original C source needs.
#[derive(Default)]
pub struct DcStack {
    frames: Vec<DeviceContext>,
}

impl DcStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn push(&mut self, dc: DeviceContext) {
        self.frames.push(dc);
    }

    /// Pops one frame and returns it, or `None` if the stack is already
    /// empty (a non-fatal underflow per spec §4.5).
    pub fn pop(&mut self) -> Option<DeviceContext> {
        self.frames.pop()
    }
}
