//! Cache-key normalization for profile paths.
//!
//! Two on-disk spellings that resolve to the same absolute path must map to
//! the same key, so lookups are done on an absolute, forward-slash form with
//! `.`/`..` components resolved lexically. Symlinks are not chased: the key
//! identifies the path the caller asked for, not the inode behind it.

use std::io;
use std::path::{Component, Path};

/// Canonical absolute path string used to deduplicate profile loads.
pub type CacheKey = String;

/// Normalize a host-native path (relative or absolute) into a [`CacheKey`].
///
/// Fails only when a relative path is given and the current directory cannot
/// be determined.
pub fn cache_key<P: AsRef<Path>>(path: P) -> io::Result<CacheKey> {
    let path = path.as_ref();
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut prefix = String::new();
    let mut segments: Vec<String> = Vec::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(p) => {
                prefix = p.as_os_str().to_string_lossy().replace('\\', "/");
            }
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                segments.pop();
            }
            Component::Normal(seg) => segments.push(seg.to_string_lossy().into_owned()),
        }
    }

    Ok(format!("{}/{}", prefix, segments.join("/")))
}
