//! Object framing and the frame codec.
//!
//! Every stored object is a framed byte sequence:
//!
//! ```text
//! <type-tag> SP <decimal-payload-len> NUL <payload>
//! ```
//!
//! e.g. `blob 6\x00hello\n`. The object id is the SHA-1 of the whole frame,
//! and the frame (not the bare payload) is what gets zlib-compressed on disk.

use crate::error::{Error, Result};

/// Object types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// A blob (opaque file content).
    Blob,
    /// A tree (directory listing).
    Tree,
}

impl ObjectKind {
    /// Get the ASCII type tag used in object headers.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
        }
    }

    /// Parse a type tag from an object header.
    pub fn parse(tag: &str) -> Result<Self> {
        match tag {
            "blob" => Ok(ObjectKind::Blob),
            "tree" => Ok(ObjectKind::Tree),
            _ => Err(Error::corrupt_object(format!(
                "Unknown object type: {:?}",
                tag
            ))),
        }
    }
}

/// The decoded header of a framed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Object type from the tag.
    pub kind: ObjectKind,
    /// Payload length declared in the header.
    pub payload_len: usize,
}

/// Encode a payload into a framed object.
pub fn encode_frame(kind: ObjectKind, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(payload.len() + 16);
    buf.extend_from_slice(kind.as_str().as_bytes());
    buf.push(b' ');
    buf.extend_from_slice(payload.len().to_string().as_bytes());
    buf.push(0);
    buf.extend_from_slice(payload);
    buf
}

/// Decode a framed object into its header and payload.
///
/// The payload is every byte strictly after the first NUL. The declared
/// length must match the actual payload length.
pub fn decode_frame(bytes: &[u8]) -> Result<(FrameHeader, &[u8])> {
    let nul = bytes
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::corrupt_object("No NUL terminator found in header"))?;

    let header = std::str::from_utf8(&bytes[..nul])
        .map_err(|e| Error::corrupt_object(format!("Header is not ASCII: {}", e)))?;
    let payload = &bytes[nul + 1..];

    let (tag, len_str) = header
        .split_once(' ')
        .ok_or_else(|| Error::corrupt_object(format!("No space in header: {:?}", header)))?;

    let kind = ObjectKind::parse(tag)?;
    let payload_len: usize = len_str
        .parse()
        .map_err(|e| Error::corrupt_object(format!("Bad length field {:?}: {}", len_str, e)))?;

    if payload_len != payload.len() {
        return Err(Error::corrupt_object(format!(
            "Payload length mismatch: header says {}, got {}",
            payload_len,
            payload.len()
        )));
    }

    Ok((FrameHeader { kind, payload_len }, payload))
}
