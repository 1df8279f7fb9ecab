//! Store management and object I/O.

use crate::error::{Error, Result};
use crate::id::ObjectId;
use crate::object::{FrameHeader, ObjectKind, decode_frame, encode_frame};
use crate::tree::{self, TreeEntry};
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// HEAD contents written by `init`.
const HEAD_CONTENTS: &[u8] = b"ref: refs/heads/main\n";

/// A content-addressed object database.
///
/// Objects are zlib-compressed framed byte sequences stored at
/// `objects/<2-hex>/<38-hex>` under the root, keyed by the SHA-1 of their
/// frame. All operations are synchronous and blocking; writes are
/// idempotent content-addressed overwrites.
#[derive(Debug)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Initialize a new store at the given root (conventionally `.git`).
    ///
    /// Creates the directory structure:
    /// - `objects/` for stored objects
    /// - `refs/` scaffold
    /// - `HEAD` pointing at `refs/heads/main`
    ///
    /// Re-initializing an existing root succeeds.
    pub fn init<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("objects"))?;
        fs::create_dir_all(root.join("refs"))?;
        fs::write(root.join("HEAD"), HEAD_CONTENTS)?;

        Ok(Self { root })
    }

    /// Open an existing store at the given root.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        if !root.exists() {
            return Err(Error::invalid_store(&root, "directory does not exist"));
        }

        if !root.join("objects").exists() {
            return Err(Error::invalid_store(&root, "objects directory missing"));
        }

        Ok(Self { root })
    }

    /// Get the root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the path to an object file given its id.
    ///
    /// Returns: `objects/{first 2 hex chars}/{remaining 38}`
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.root.join("objects").join(id.prefix()).join(id.suffix())
    }

    /// Store a payload as an object of the given kind.
    ///
    /// Frames the payload, hashes the frame, compresses it and persists it
    /// at the sharded path, creating directories as needed. Idempotent:
    /// identical kind+payload always yields the same id, and re-writing an
    /// existing object is a no-op.
    pub fn put(&self, kind: ObjectKind, payload: &[u8]) -> Result<ObjectId> {
        let frame = encode_frame(kind, payload);
        let id = ObjectId::hash_bytes(&frame);

        // Content-addressed: an existing object is already byte-identical.
        let obj_path = self.object_path(&id);
        if obj_path.exists() {
            return Ok(id);
        }

        let compressed = compress_zlib(&frame)?;
        self.write_object_atomic(&obj_path, &compressed)?;

        Ok(id)
    }

    /// Store a blob from a reader.
    pub fn put_blob<R: Read>(&self, mut reader: R) -> Result<ObjectId> {
        let mut payload = Vec::new();
        reader.read_to_end(&mut payload)?;
        self.put(ObjectKind::Blob, &payload)
    }

    /// Retrieve an object's payload by id, header stripped.
    pub fn get(&self, id: &ObjectId) -> Result<Vec<u8>> {
        let (_, payload) = self.read_frame(id)?;
        Ok(payload)
    }

    /// Retrieve a tree by id and decode its entries.
    pub fn get_tree(&self, id: &ObjectId) -> Result<Vec<TreeEntry>> {
        let (header, payload) = self.read_frame(id)?;

        if header.kind != ObjectKind::Tree {
            return Err(Error::invalid_object_type(
                ObjectKind::Tree.as_str(),
                header.kind.as_str(),
            ));
        }

        tree::decode_tree(&payload)
    }

    /// Store a tree from a list of entries, in the given order.
    pub fn put_tree(&self, entries: &[TreeEntry]) -> Result<ObjectId> {
        self.put(ObjectKind::Tree, &tree::encode_tree(entries))
    }

    /// Read an object file, decompress it and split off the frame header.
    fn read_frame(&self, id: &ObjectId) -> Result<(FrameHeader, Vec<u8>)> {
        let obj_path = self.object_path(id);

        if !obj_path.exists() {
            return Err(Error::not_found(id.to_hex()));
        }

        let compressed = fs::read(&obj_path)?;
        let raw = decompress_zlib(&compressed)?;
        let (header, payload) = decode_frame(&raw)?;

        Ok((header, payload.to_vec()))
    }

    /// Write an object atomically using a temp file in the target directory.
    fn write_object_atomic(&self, obj_path: &Path, bytes: &[u8]) -> Result<()> {
        let parent = obj_path
            .parent()
            .ok_or_else(|| Error::invalid_store(obj_path, "object path has no parent"))?;

        // create_dir_all treats an already-existing directory as success,
        // which keeps racing writers in the same shard safe.
        fs::create_dir_all(parent)?;

        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(bytes)?;
        temp_file.flush()?;
        temp_file
            .persist(obj_path)
            .map_err(|e| Error::from(e.error))?;

        Ok(())
    }
}

/// Compress data with a zlib stream.
fn compress_zlib(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Decompress a zlib stream.
fn decompress_zlib(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| Error::corrupt_object(format!("zlib inflate failed: {}", e)))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_scaffold() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join(".git");
        let store = Store::init(&root).unwrap();

        assert!(store.root().join("objects").is_dir());
        assert!(store.root().join("refs").is_dir());
        assert_eq!(
            fs::read(store.root().join("HEAD")).unwrap(),
            b"ref: refs/heads/main\n"
        );
    }

    #[test]
    fn test_reinit_existing_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join(".git");

        Store::init(&root).unwrap();
        // A second init on the same root must not fail.
        Store::init(&root).unwrap();
    }

    #[test]
    fn test_open_missing_store() {
        let temp_dir = TempDir::new().unwrap();
        let result = Store::open(temp_dir.path().join("nope"));
        assert!(matches!(result, Err(Error::InvalidStore { .. })));
    }

    #[test]
    fn test_open_after_init() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join(".git");
        Store::init(&root).unwrap();
        Store::open(&root).unwrap();
    }

    #[test]
    fn test_object_path_sharding() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::init(temp_dir.path()).unwrap();

        let id = ObjectId::hash_bytes(b"test");
        let path = store.object_path(&id);

        assert!(path.ends_with(format!("objects/{}/{}", id.prefix(), id.suffix())));
    }

    #[test]
    fn test_put_get_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::init(temp_dir.path()).unwrap();

        let id = store.put(ObjectKind::Blob, b"hello\n").unwrap();

        // Digest is computed over the frame `blob 6\x00hello\n`.
        assert_eq!(id.to_hex(), "ce013625030ba8dba906f756967f9e9ca394464a");
        assert_eq!(store.get(&id).unwrap(), b"hello\n");
    }

    #[test]
    fn test_put_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::init(temp_dir.path()).unwrap();

        let id1 = store.put(ObjectKind::Blob, b"same content").unwrap();
        let id2 = store.put(ObjectKind::Blob, b"same content").unwrap();

        assert_eq!(id1, id2);
        assert!(store.object_path(&id1).exists());
    }

    #[test]
    fn test_put_blob_reader() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::init(temp_dir.path()).unwrap();

        let from_reader = store.put_blob(&b"reader data"[..]).unwrap();
        let from_slice = store.put(ObjectKind::Blob, b"reader data").unwrap();
        assert_eq!(from_reader, from_slice);
    }

    #[test]
    fn test_get_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::init(temp_dir.path()).unwrap();

        let id = ObjectId::hash_bytes(b"never written");
        assert!(matches!(store.get(&id), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_get_garbage_stream() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::init(temp_dir.path()).unwrap();

        let id = ObjectId::hash_bytes(b"garbage");
        let obj_path = store.object_path(&id);
        fs::create_dir_all(obj_path.parent().unwrap()).unwrap();
        fs::write(&obj_path, b"this is not a zlib stream").unwrap();

        assert!(matches!(store.get(&id), Err(Error::CorruptObject { .. })));
    }

    #[test]
    fn test_get_missing_header_nul() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::init(temp_dir.path()).unwrap();

        let frame = b"blob 5hello"; // no NUL terminator
        let id = ObjectId::hash_bytes(frame);
        let obj_path = store.object_path(&id);
        fs::create_dir_all(obj_path.parent().unwrap()).unwrap();
        fs::write(&obj_path, compress_zlib(frame).unwrap()).unwrap();

        assert!(matches!(store.get(&id), Err(Error::CorruptObject { .. })));
    }

    #[test]
    fn test_get_header_length_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::init(temp_dir.path()).unwrap();

        let frame = b"blob 5\x00hello\n"; // header says 5, payload is 6
        let id = ObjectId::hash_bytes(frame);
        let obj_path = store.object_path(&id);
        fs::create_dir_all(obj_path.parent().unwrap()).unwrap();
        fs::write(&obj_path, compress_zlib(frame).unwrap()).unwrap();

        assert!(matches!(store.get(&id), Err(Error::CorruptObject { .. })));
    }

    #[test]
    fn test_put_tree_get_tree() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::init(temp_dir.path()).unwrap();

        let blob_id = store.put(ObjectKind::Blob, b"file body").unwrap();
        let entries = vec![
            TreeEntry {
                mode: "100644".to_string(),
                name: "a.txt".to_string(),
                id: blob_id,
            },
            TreeEntry {
                mode: "40000".to_string(),
                name: "sub".to_string(),
                id: ObjectId::from_bytes([1u8; 20]),
            },
        ];

        let tree_id = store.put_tree(&entries).unwrap();
        let retrieved = store.get_tree(&tree_id).unwrap();

        assert_eq!(retrieved, entries);
    }

    #[test]
    fn test_get_tree_on_blob() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::init(temp_dir.path()).unwrap();

        let id = store.put(ObjectKind::Blob, b"not a tree").unwrap();
        assert!(matches!(
            store.get_tree(&id),
            Err(Error::InvalidObjectType { .. })
        ));
    }

    #[test]
    fn test_stored_record_is_zlib_of_frame() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::init(temp_dir.path()).unwrap();

        let id = store.put(ObjectKind::Blob, b"hello\n").unwrap();
        let on_disk = fs::read(store.object_path(&id)).unwrap();

        assert_eq!(decompress_zlib(&on_disk).unwrap(), b"blob 6\x00hello\n");
    }

    // Property-based tests
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 56,
            max_shrink_iters: 1000,
            ..ProptestConfig::default()
        })]

        /// Compression round-trip preserves data
        #[test]
        fn prop_compression_roundtrip(data in prop::collection::vec(any::<u8>(), 0..50_000)) {
            let compressed = compress_zlib(&data)?;
            let decompressed = decompress_zlib(&compressed)?;
            prop_assert_eq!(decompressed, data, "Compression must be lossless");
        }

        /// get(put(t, p)) == p, and put is deterministic with 40-hex ids
        #[test]
        fn prop_store_roundtrip(data in prop::collection::vec(any::<u8>(), 0..5_000)) {
            let temp_dir = TempDir::new().unwrap();
            let store = Store::init(temp_dir.path())?;

            let id1 = store.put(ObjectKind::Blob, &data)?;
            let id2 = store.put(ObjectKind::Blob, &data)?;
            prop_assert_eq!(id1, id2);

            let hex = id1.to_hex();
            prop_assert_eq!(hex.len(), 40);
            prop_assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

            prop_assert_eq!(store.get(&id1)?, data);
        }
    }
}
