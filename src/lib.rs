//! WMF → SVG conversion: decode a Windows Metafile byte stream and emit the
//! equivalent SVG document.
//!
//! The public surface is deliberately small: [`convert`] drives header
//! decoding, interpreter setup, and the record loop; [`is_wmf`] exposes the
//! validity probe on its own. Everything else here is module wiring.

mod base64;
mod dc;
mod error;
mod header;
mod interp;
mod objects;
mod reader;
mod record;
mod svg;
mod trace;
mod transform;

pub use error::ConvertError;
pub use trace::{NullTrace, StdoutTrace, StringTrace, TraceSink, TraceStatus};

/// Caller-configurable knobs for a single conversion (spec §6).
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// XML namespace prefix for emitted elements, e.g. `"svg"`. Empty means
    /// unprefixed (the default, and what every test in this crate uses).
    pub namespace_prefix: String,
    /// Whether the surrounding `<?xml …?>` prologue is emitted.
    pub svg_delimiter: bool,
    /// Requested output height in pixels; `<= 0.0` means "derive from the
    /// source's DPI/placeable bounds" (spec §4.6).
    pub img_height: f64,
    /// Requested output width in pixels; same fallback rule as `img_height`.
    pub img_width: f64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            namespace_prefix: String::new(),
            svg_delimiter: true,
            img_height: 0.0,
            img_width: 0.0,
        }
    }
}

/// Converts a WMF byte buffer to an SVG document.
///
/// Mirrors the C-style contract of spec §6 inside a `Result`: success
/// carries the SVG text, failure carries a [`ConvertError`] whose
/// [`ConvertError::code`] recovers the original return code. Malformed
/// input never panics - at worst the loop stops early and a partial but
/// well-formed SVG is still returned.
pub fn convert(data: &[u8], options: &ConvertOptions) -> Result<String, ConvertError> {
    convert_traced(data, options, &mut NullTrace)
}

/// Same as [`convert`], but reports per-record diagnostics through `trace`
/// (spec §9 "Verbose trace" redesign item).
pub fn convert_traced(
    data: &[u8],
    options: &ConvertOptions,
    trace: &mut dyn TraceSink,
) -> Result<String, ConvertError> {
    if data.is_empty() {
        return Err(ConvertError::InvalidArguments);
    }

    if !header::is_wmf(data) {
        return Err(ConvertError::NotAWmf);
    }

    let decoded = header::decode(data).map_err(|e| ConvertError::HeaderDecode(e.to_string()))?;

    let mut state = interp::InterpreterState::new(&decoded, options.img_width, options.img_height);
    let mut out = svg::SvgWriter::new(&options.namespace_prefix);

    if options.svg_delimiter {
        out.write_prologue(state.canvas.width, state.canvas.height);
    }
    interp::run(data, decoded.record_start, &mut state, &mut out, trace);
    if options.svg_delimiter {
        out.write_epilogue();
    }

    Ok(out.into_string())
}

/// Re-exports the header validity probe (spec §6): true iff a standard WMF
/// header validates, either at offset 0 or behind the placeable header.
pub fn is_wmf(data: &[u8]) -> bool {
    header::is_wmf(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeable_wmf(dst: (i16, i16, i16, i16), inch: u16) -> Vec<u8> {
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
        bytes.extend_from_slice(&9u16.to_le_bytes()); // HeaderSize
        bytes.extend_from_slice(&0x0300u16.to_le_bytes()); // Version
        bytes.extend_from_slice(&0u32.to_le_bytes()); // Size
        bytes.extend_from_slice(&0u16.to_le_bytes()); // NumberOfObjects
        bytes.extend_from_slice(&0u32.to_le_bytes()); // MaxRecord
        bytes.extend_from_slice(&0u16.to_le_bytes()); // NumberOfMembers

        // EOF record: 3 words = 6 bytes, no payload.
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.push(0x00);
        bytes.push(0x00);

        bytes
    }

    #[test]
    fn minimum_valid_placeable_file_yields_empty_body_and_scaled_canvas() {
        let data = placeable_wmf((0, 0, 100, 100), 1440);
        let svg = convert(&data, &ConvertOptions::default()).unwrap();

        let expected_side = (100.0_f64 * 96.0 / 1440.0).round();
        assert!(svg.contains(&format!("width=\"{expected_side:.0}\"")));
        assert!(svg.contains(&format!("height=\"{expected_side:.0}\"")));

        let body_start = svg.find('>').map(|i| i + 1).unwrap();
        let body_start = svg[body_start..].find('>').map(|i| body_start + i + 1).unwrap();
        let body_end = svg.find("</svg>").unwrap();
        assert_eq!(svg[body_start..body_end].trim(), "");
    }

    #[test]
    fn empty_buffer_is_invalid_arguments() {
        let err = convert(&[], &ConvertOptions::default()).unwrap_err();
        assert_eq!(err.code(), -1);
    }

    #[test]
    fn garbage_bytes_are_not_a_wmf() {
        let err = convert(&[0u8; 32], &ConvertOptions::default()).unwrap_err();
        assert_eq!(err.code(), -2);
    }

    #[test]
    fn is_wmf_matches_convert_acceptance() {
        let data = placeable_wmf((0, 0, 10, 10), 1440);
        assert!(is_wmf(&data));
        assert!(convert(&data, &ConvertOptions::default()).is_ok());
    }
}
