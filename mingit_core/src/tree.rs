//! Tree (directory listing) encoding and decoding.
//!
//! A tree payload is a sequence of entries with no padding between them:
//!
//! ```text
//! <mode> SP <name> NUL <20-byte-digest>
//! ```
//!
//! The digest is raw bytes, not hex. Entries decode in payload order; the
//! codec neither sorts nor deduplicates - any ordering invariant belongs to
//! the producer.

use crate::error::{Error, Result};
use crate::id::{ID_SIZE, ObjectId};

/// An entry in a tree (file or subdirectory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// POSIX file mode as an ASCII digit string, e.g. "100644" or "40000".
    pub mode: String,
    /// Name of the entry (UTF-8, no embedded NUL).
    pub name: String,
    /// Id of the referenced object.
    pub id: ObjectId,
}

impl TreeEntry {
    /// Encode the entry to bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.mode.len() + self.name.len() + ID_SIZE + 2);
        buf.extend_from_slice(self.mode.as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(self.name.as_bytes());
        buf.push(0);
        buf.extend_from_slice(self.id.as_bytes());
        buf
    }
}

/// Encode a list of tree entries in the given order.
pub fn encode_tree(entries: &[TreeEntry]) -> Vec<u8> {
    let mut buf = Vec::new();
    for entry in entries {
        buf.extend_from_slice(&entry.encode());
    }
    buf
}

/// Decode a list of tree entries from a payload.
///
/// One pass over the buffer with an advancing offset; decoding consumes the
/// whole input or fails on the first malformed entry. Empty modes and names
/// are accepted as long as the delimiters are present.
pub fn decode_tree(payload: &[u8]) -> Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();
    let mut offset = 0;

    while offset < payload.len() {
        let (entry, consumed) = decode_entry(&payload[offset..])?;
        entries.push(entry);
        offset += consumed;
    }

    Ok(entries)
}

/// Decode a single entry from the front of `input`, returning the entry and
/// the number of bytes consumed.
fn decode_entry(input: &[u8]) -> Result<(TreeEntry, usize)> {
    // Mode runs up to the first space.
    let sp = input
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| Error::malformed_entry("No space after mode"))?;
    let mode = std::str::from_utf8(&input[..sp])
        .map_err(|e| Error::malformed_entry(format!("Mode is not ASCII: {}", e)))?
        .to_string();

    // Name runs from after the space to the next NUL.
    let rest = &input[sp + 1..];
    let nul = rest
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::malformed_entry("No NUL terminator after name"))?;
    let name = String::from_utf8(rest[..nul].to_vec())
        .map_err(|e| Error::malformed_entry(format!("Name is not UTF-8: {}", e)))?;

    // Exactly 20 raw digest bytes follow the NUL.
    let digest_start = sp + 1 + nul + 1;
    let digest_end = digest_start + ID_SIZE;
    if input.len() < digest_end {
        return Err(Error::truncated_entry(input.len() - digest_start));
    }

    let mut raw = [0u8; ID_SIZE];
    raw.copy_from_slice(&input[digest_start..digest_end]);
    let id = ObjectId::from_bytes(raw);

    Ok((TreeEntry { mode, name, id }, digest_end))
}
