//! Record prologue and fixed-shape payload structs (spec component C2).
//!
//! The 6-byte prologue (record size in words + the two function bytes) is
//! read through [`crate::reader::ByteReader`] since its layout drives how
//! much of the buffer the rest of the record may touch. The fixed-size
//! payload shapes that sit behind it - points, rects, colors, and the three
//! `LOG*INDIRECT` structs - are declared with `binrw` the way the teacher
//! declares `CoffHeader`/`SectionHeader`: one `#[derive(BinRead)]` struct per
//! on-disk shape, little-endian throughout.

use binrw::BinRead;

use crate::reader::{ByteReader, ReadError};

/// 16-bit signed logical-unit point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Point16 {
    pub x: i16,
    pub y: i16,
}

impl Point16 {
    pub fn from_reader(r: &mut ByteReader) -> Result<Self, ReadError> {
        Ok(Point16 {
            x: r.read_i16()?,
            y: r.read_i16()?,
        })
    }
}

/// 16-bit signed rectangle. Right/bottom are exclusive for rectangle-style
/// primitives but inclusive bounding boxes for ellipse/arc - the caller
/// decides which interpretation applies (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct Rect16 {
    pub left: i16,
    pub top: i16,
    pub right: i16,
    pub bottom: i16,
}

impl Rect16 {
    pub fn from_reader(r: &mut ByteReader) -> Result<Self, ReadError> {
        Ok(Rect16 {
            left: r.read_i16()?,
            top: r.read_i16()?,
            right: r.read_i16()?,
            bottom: r.read_i16()?,
        })
    }
}

/// 8-bit RGB color, as stored in a WMF `COLORREF` (with a trailing reserved
/// byte that is read and discarded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(little)]
pub struct ColorRgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    _reserved: u8,
}

impl ColorRgb {
    pub fn from_reader(r: &mut ByteReader) -> Result<Self, ReadError> {
        let red = r.read_u8()?;
        let green = r.read_u8()?;
        let blue = r.read_u8()?;
        let _reserved = r.read_u8()?;
        Ok(ColorRgb {
            red,
            green,
            blue,
            _reserved,
        })
    }
}

/// On-wire `LOGPEN16` payload of `CREATEPENINDIRECT`.
#[derive(Debug, Clone, Copy, BinRead)]
#[br(little)]
pub struct LogPen16 {
    pub style: u16,
    pub width: Point16,
    pub color: ColorRgb,
}

impl LogPen16 {
    pub fn from_reader(r: &mut ByteReader) -> Result<Self, ReadError> {
        Ok(LogPen16 {
            style: r.read_u16()?,
            width: Point16::from_reader(r)?,
            color: ColorRgb::from_reader(r)?,
        })
    }
}

/// On-wire `LOGBRUSH16` payload of `CREATEBRUSHINDIRECT`.
#[derive(Debug, Clone, Copy, BinRead)]
#[br(little)]
pub struct LogBrush16 {
    pub style: u16,
    pub color: ColorRgb,
    pub hatch: u16,
}

impl LogBrush16 {
    pub fn from_reader(r: &mut ByteReader) -> Result<Self, ReadError> {
        Ok(LogBrush16 {
            style: r.read_u16()?,
            color: ColorRgb::from_reader(r)?,
            hatch: r.read_u16()?,
        })
    }
}

/// On-wire `LOGFONT16` payload of `CREATEFONTINDIRECT`. The face name is a
/// fixed 32-byte, NUL-terminated field; it is decoded to an owned `String`
/// truncated at the first NUL (or all 32 bytes if none is present).
#[derive(Debug, Clone, BinRead)]
#[br(little)]
pub struct LogFont16 {
    pub height: i16,
    pub width: i16,
    pub escapement: i16,
    pub orientation: i16,
    pub weight: i16,
    pub italic: u8,
    pub underline: u8,
    pub strike_out: u8,
    pub char_set: u8,
    pub out_precision: u8,
    pub clip_precision: u8,
    pub quality: u8,
    pub pitch_and_family: u8,
    face_name_raw: [u8; 32],
}

impl LogFont16 {
    pub fn from_reader(r: &mut ByteReader) -> Result<Self, ReadError> {
        let height = r.read_i16()?;
        let width = r.read_i16()?;
        let escapement = r.read_i16()?;
        let orientation = r.read_i16()?;
        let weight = r.read_i16()?;
        let italic = r.read_u8()?;
        let underline = r.read_u8()?;
        let strike_out = r.read_u8()?;
        let char_set = r.read_u8()?;
        let out_precision = r.read_u8()?;
        let clip_precision = r.read_u8()?;
        let quality = r.read_u8()?;
        let pitch_and_family = r.read_u8()?;
        let face_name_bytes = r.read_bytes(32)?;
        let mut face_name_raw = [0u8; 32];
        face_name_raw.copy_from_slice(face_name_bytes);

        Ok(LogFont16 {
            height,
            width,
            escapement,
            orientation,
            weight,
            italic,
            underline,
            strike_out,
            char_set,
            out_precision,
            clip_precision,
            quality,
            pitch_and_family,
            face_name_raw,
        })
    }

    pub fn face_name(&self) -> String {
        let end = self
            .face_name_raw
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.face_name_raw.len());
        String::from_utf8_lossy(&self.face_name_raw[..end]).into_owned()
    }
}

/// The 6-byte record prologue: size in 16-bit words, and the function
/// number split into its low/high bytes the way the original reads them
/// (spec §4.2). Dispatch uses only the low byte, `i_type`.
#[derive(Debug, Clone, Copy)]
pub struct RecordPrologue {
    pub byte_size: usize,
    pub i_type: u8,
    pub function_high: u8,
}

impl RecordPrologue {
    pub fn function_number(&self) -> u16 {
        ((self.function_high as u16) << 8) | self.i_type as u16
    }

    /// Reads the 6-byte prologue at the reader's current position. Returns
    /// `None` (not an error) if fewer than 6 bytes remain - the record
    /// loop's clean-termination case (spec §4.2).
    pub fn read(r: &mut ByteReader) -> Option<RecordPrologue> {
        if r.remaining() < 6 {
            return None;
        }
        let size_words = r.read_u32().ok()?;
        let i_type = r.read_u8().ok()?;
        let function_high = r.read_u8().ok()?;
        Some(RecordPrologue {
            byte_size: size_words as usize * 2,
            i_type,
            function_high,
        })
    }
}

pub mod opcode {
    //! Low byte of the standard WMF record function field, used for
    //! dispatch (spec §4.2: "dispatch uses `iType`").
    pub const EOF: u8 = 0x00;
    pub const SETBKCOLOR: u8 = 0x01;
    pub const SETBKMODE: u8 = 0x02;
    pub const SETMAPMODE: u8 = 0x03;
    pub const SETROP2: u8 = 0x04;
    pub const SETRELABS: u8 = 0x05;
    pub const SETPOLYFILLMODE: u8 = 0x06;
    pub const SETSTRETCHBLTMODE: u8 = 0x07;
    pub const SETTEXTCOLOR: u8 = 0x09;
    pub const SETWINDOWORG: u8 = 0x0B;
    pub const SETWINDOWEXT: u8 = 0x0C;
    pub const SETVIEWPORTORG: u8 = 0x0D;
    pub const SETVIEWPORTEXT: u8 = 0x0E;
    pub const LINETO: u8 = 0x13;
    pub const MOVETO: u8 = 0x14;
    pub const ARC: u8 = 0x17;
    pub const ELLIPSE: u8 = 0x18;
    pub const PIE: u8 = 0x1A;
    pub const RECTANGLE: u8 = 0x1B;
    pub const ROUNDRECT: u8 = 0x1C;
    pub const SAVEDC: u8 = 0x1E;
    pub const TEXTOUT: u8 = 0x21;
    pub const POLYGON: u8 = 0x24;
    pub const POLYLINE: u8 = 0x25;
    pub const ESCAPE: u8 = 0x26;
    pub const RESTOREDC: u8 = 0x27;
    pub const SELECTOBJECT: u8 = 0x2D;
    pub const SETTEXTALIGN: u8 = 0x2E;
    pub const CHORD: u8 = 0x30;
    pub const SETMAPPERFLAGS: u8 = 0x31;
    pub const EXTTEXTOUT: u8 = 0x32;
    pub const SELECTPALETTE: u8 = 0x34;
    pub const REALIZEPALETTE: u8 = 0x35;
    pub const ANIMATEPALETTE: u8 = 0x36;
    pub const SETPALENTRIES: u8 = 0x37;
    pub const POLYPOLYGON: u8 = 0x38;
    pub const RESIZEPALETTE: u8 = 0x39;
    pub const CREATEPALETTE: u8 = 0xF7;
    pub const CREATEPENINDIRECT: u8 = 0xFA;
    pub const CREATEFONTINDIRECT: u8 = 0xFB;
    pub const CREATEBRUSHINDIRECT: u8 = 0xFC;
    pub const DELETEOBJECT: u8 = 0xF0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use binrw::io::Cursor;

    #[test]
    fn decodes_log_pen() {
        let bytes = [1u8, 0, 2, 0, 0, 0, 0xFF, 0x00, 0x00, 0x00];
        let pen = LogPen16::read(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(pen.style, 1);
        assert_eq!(pen.width.x, 2);
        assert_eq!(pen.color.red, 0xFF);
    }

    #[test]
    fn face_name_truncates_at_nul() {
        let mut raw = [0u8; 32];
        raw[..5].copy_from_slice(b"Arial");
        let font = LogFont16 {
            height: 0,
            width: 0,
            escapement: 0,
            orientation: 0,
            weight: 0,
            italic: 0,
            underline: 0,
            strike_out: 0,
            char_set: 0,
            out_precision: 0,
            clip_precision: 0,
            quality: 0,
            pitch_and_family: 0,
            face_name_raw: raw,
        };
        assert_eq!(font.face_name(), "Arial");
    }

    #[test]
    fn function_number_combines_low_and_high_bytes() {
        let p = RecordPrologue {
            byte_size: 6,
            i_type: 0x13,
            function_high: 0x02,
        };
        assert_eq!(p.function_number(), 0x0213);
    }
}
