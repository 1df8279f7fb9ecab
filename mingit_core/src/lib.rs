//! # mingit Core
//!
//! Storage primitives of a Git-compatible content-addressed object database.
//!
//! This library stores arbitrary byte payloads keyed by the SHA-1 digest of
//! their framed contents, retrieves them by digest, and decodes tree
//! (directory listing) records. Objects are immutable: every update is a new
//! object under a new digest.
//!
//! ## Format
//!
//! - Framed object: `<type-tag> SP <decimal-payload-len> NUL <payload>`
//! - Object id: SHA-1 over the full frame, rendered as 40 lowercase hex
//! - On disk: the zlib-compressed frame at `objects/<2-hex>/<38-hex>`
//! - Tree payload: a sequence of `<mode> SP <name> NUL <20-byte-digest>`
//!
//! ## Example
//!
//! ```no_run
//! use mingit_core::{ObjectKind, Store};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Initialize a new object database
//! let store = Store::init(".git")?;
//!
//! // Store a blob and read it back by id
//! let id = store.put(ObjectKind::Blob, b"hello\n")?;
//! assert_eq!(store.get(&id)?, b"hello\n");
//!
//! // Decode a tree object into its entries
//! let tree_id = mingit_core::ObjectId::from_hex("4b825dc642cb6eb9a060e54bf8d69288fbee4904")?;
//! for entry in store.get_tree(&tree_id)? {
//!     println!("{}", entry.name);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod id;
mod object;
mod store;
mod tree;

pub use error::{Error, Result};
pub use id::{ID_SIZE, ObjectId};
pub use object::{FrameHeader, ObjectKind, decode_frame, encode_frame};
pub use store::Store;
pub use tree::{TreeEntry, decode_tree, encode_tree};
