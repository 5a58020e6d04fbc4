//! Lexical path helpers.
//!
//! Archive entry names are untrusted. Before anything is written, each entry is
//! joined onto the extraction root and resolved lexically (no filesystem access,
//! so symlinks and not-yet-created directories do not matter) to decide whether
//! it stays inside that root.

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` at the root is dropped, matching how the OS resolves `/..`.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Join `entry` onto `root` and return the result if it is a strict descendant
/// of `root`.
///
/// Containment is checked per component, so `/dest-evil` is not inside `/dest`.
/// Absolute entries replace the root on join and are therefore rejected. The
/// root itself may be relative and start with `..`; only the part of the joined
/// path below the root has to be plain names.
#[must_use]
pub fn contained_join(root: &Path, entry: &str) -> Option<PathBuf> {
    let root = normalize_path(root);
    let joined = normalize_path(&root.join(entry));

    let below_root = joined.strip_prefix(&root).ok().filter(|rest| {
        !rest.as_os_str().is_empty() && rest.components().all(|c| matches!(c, Component::Normal(_)))
    });
    below_root.is_some().then_some(joined)
}
