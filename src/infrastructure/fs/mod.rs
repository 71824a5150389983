//! Local File System Helpers

mod copy;

pub use copy::{copy_file, copy_tree, write_file, write_stream, CopyError};
