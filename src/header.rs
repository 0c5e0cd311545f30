//! Placeable + standard WMF header decoding (spec component C3).

use crate::record::Rect16;
use crate::reader::ByteReader;

pub const PLACEABLE_MAGIC: u32 = 0x9AC6_CDD7;
const PLACEABLE_HEADER_BYTES: usize = 22;
const STANDARD_HEADER_BYTES: usize = 18;

#[derive(Debug, Clone, Copy)]
pub struct PlaceableHeader {
    pub dst: Rect16,
    pub inch: u16,
}

#[derive(Debug, Clone, Copy)]
pub struct StandardHeader {
    pub i_type: u16,
    pub header_size_words: u16,
    pub version: u16,
    pub n_objects: u16,
}

#[derive(Debug, Clone, Copy)]
pub struct DecodedHeader {
    pub placeable: Option<PlaceableHeader>,
    pub standard: StandardHeader,
    /// Byte offset in the buffer at which the record stream begins.
    pub record_start: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    #[error("buffer too short for a WMF header")]
    TooShort,
    #[error("standard header type/version mismatch (type={i_type}, version=0x{version:04X})")]
    NotAWmf { i_type: u16, version: u16 },
}

fn read_standard_header(r: &mut ByteReader) -> Result<StandardHeader, HeaderError> {
    let i_type = r.read_u16().map_err(|_| HeaderError::TooShort)?;
    let header_size_words = r.read_u16().map_err(|_| HeaderError::TooShort)?;
    let version = r.read_u16().map_err(|_| HeaderError::TooShort)?;
    r.skip(4).map_err(|_| HeaderError::TooShort)?; // Size (u32, in words)
    let n_objects = r.read_u16().map_err(|_| HeaderError::TooShort)?;
    // MaxRecord (u32) + NumberOfMembers (u16) complete the 18 bytes; not
    // needed by the interpreter.
    r.skip(6).map_err(|_| HeaderError::TooShort)?;

    if i_type != 1 || !matches!(version, 0x0100 | 0x0300) {
        return Err(HeaderError::NotAWmf { i_type, version });
    }

    Ok(StandardHeader {
        i_type,
        header_size_words,
        version,
        n_objects,
    })
}

/// Decodes the optional placeable header and the mandatory standard header,
/// returning the byte offset of the first record.
pub fn decode(data: &[u8]) -> Result<DecodedHeader, HeaderError> {
    if data.len() < STANDARD_HEADER_BYTES {
        return Err(HeaderError::TooShort);
    }

    let mut probe = ByteReader::new(data);
    let key = probe.read_u32().map_err(|_| HeaderError::TooShort)?;

    if key == PLACEABLE_MAGIC {
        if data.len() < PLACEABLE_HEADER_BYTES + STANDARD_HEADER_BYTES {
            return Err(HeaderError::TooShort);
        }
        // key(4) already consumed; handle(2), bounding box(8), inch(2),
        // reserved(4), checksum(2) = 22 bytes total.
        probe.skip(2).map_err(|_| HeaderError::TooShort)?;
        let left = probe.read_i16().map_err(|_| HeaderError::TooShort)?;
        let top = probe.read_i16().map_err(|_| HeaderError::TooShort)?;
        let right = probe.read_i16().map_err(|_| HeaderError::TooShort)?;
        let bottom = probe.read_i16().map_err(|_| HeaderError::TooShort)?;
        let inch = probe.read_u16().map_err(|_| HeaderError::TooShort)?;
        probe.skip(6).map_err(|_| HeaderError::TooShort)?; // reserved(4) + checksum(2)
        debug_assert_eq!(probe.position(), PLACEABLE_HEADER_BYTES);

        let standard = read_standard_header(&mut probe)?;
        let record_start = PLACEABLE_HEADER_BYTES + standard.header_size_words as usize * 2;

        Ok(DecodedHeader {
            placeable: Some(PlaceableHeader {
                dst: Rect16 {
                    left,
                    top,
                    right,
                    bottom,
                },
                inch,
            }),
            standard,
            record_start,
        })
    } else {
        let mut r = ByteReader::new(data);
        let standard = read_standard_header(&mut r)?;
        let record_start = standard.header_size_words as usize * 2;

        Ok(DecodedHeader {
            placeable: None,
            standard,
            record_start,
        })
    }
}

/// The validity probe of spec §6: true iff a standard header validates,
/// either at offset 0 or - when placeable magic is present - at offset 22.
pub fn is_wmf(data: &[u8]) -> bool {
    if data.len() < STANDARD_HEADER_BYTES {
        return false;
    }

    let mut probe = ByteReader::new(data);
    let key = match probe.read_u32() {
        Ok(k) => k,
        Err(_) => return false,
    };

    if key == PLACEABLE_MAGIC {
        if data.len() < PLACEABLE_HEADER_BYTES + STANDARD_HEADER_BYTES {
            return false;
        }
        let mut r = ByteReader::new(data);
        if r.seek(PLACEABLE_HEADER_BYTES).is_err() {
            return false;
        }
        read_standard_header(&mut r).is_ok()
    } else {
        let mut r = ByteReader::new(data);
        read_standard_header(&mut r).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_header_bytes(n_objects: u16) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&1u16.to_le_bytes()); // Type
        v.extend_from_slice(&9u16.to_le_bytes()); // HeaderSize (words)
        v.extend_from_slice(&0x0300u16.to_le_bytes()); // Version
        v.extend_from_slice(&0u32.to_le_bytes()); // Size
        v.extend_from_slice(&n_objects.to_le_bytes());
        v.extend_from_slice(&0u32.to_le_bytes()); // MaxRecord
        v.extend_from_slice(&0u16.to_le_bytes()); // NumberOfMembers
        v
    }

    #[test]
    fn decodes_plain_header_without_placeable() {
        let bytes = standard_header_bytes(3);
        let decoded = decode(&bytes).unwrap();
        assert!(decoded.placeable.is_none());
        assert_eq!(decoded.standard.n_objects, 3);
        assert_eq!(decoded.record_start, 18);
    }

    #[test]
    fn decodes_placeable_header_and_offsets_record_start() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&PLACEABLE_MAGIC.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes()); // handle
        bytes.extend_from_slice(&0i16.to_le_bytes()); // left
        bytes.extend_from_slice(&0i16.to_le_bytes()); // top
        bytes.extend_from_slice(&100i16.to_le_bytes()); // right
        bytes.extend_from_slice(&100i16.to_le_bytes()); // bottom
        bytes.extend_from_slice(&1440u16.to_le_bytes()); // inch
        bytes.extend_from_slice(&0u32.to_le_bytes()); // reserved
        bytes.extend_from_slice(&0u16.to_le_bytes()); // checksum
        bytes.extend_from_slice(&standard_header_bytes(0));

        let decoded = decode(&bytes).unwrap();
        let placeable = decoded.placeable.unwrap();
        assert_eq!(placeable.inch, 1440);
        assert_eq!(placeable.dst.right, 100);
        assert_eq!(decoded.record_start, 22 + 18);
    }

    #[test]
    fn rejects_bad_version() {
        let mut bytes = standard_header_bytes(0);
        bytes[4..6].copy_from_slice(&0x0200u16.to_le_bytes());
        assert!(decode(&bytes).is_err());
        assert!(!is_wmf(&bytes));
    }

    #[test]
    fn is_wmf_accepts_both_forms() {
        assert!(is_wmf(&standard_header_bytes(0)));

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&PLACEABLE_MAGIC.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 18]);
        bytes.extend_from_slice(&standard_header_bytes(0));
        assert!(is_wmf(&bytes));
    }
}
