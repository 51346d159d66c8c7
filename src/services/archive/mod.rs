//! Archive flattening and reader abstractions.
//!
//! Nested `.zip` files are expanded transparently so the matcher and the
//! rebuilder see one flat list of "virtual" entries, whatever the physical
//! nesting of the submitted archives.

mod collector;
mod reader;

pub use collector::{
    collect_entries, collect_virtual_files, VirtualFile, MAX_NESTED_ARCHIVE_DEPTH,
};
pub use reader::{ArchiveReader, DirReader, ZipReader};
