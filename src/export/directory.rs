//! Directory export.

use super::pack_files;
use crate::error::Result;
use crate::resolver::MergedView;
use crate::resource_pack::PackMeta;
use bytes::Bytes;
use std::path::Path;
use tracing::debug;

/// Write `view` as an unpacked resource pack below `root`. Returns the number of files written.
///
/// Existing files at the same paths are overwritten; other files under `root` are left alone.
pub fn write_directory<P: AsRef<Path>>(
    view: &MergedView,
    meta: Option<&PackMeta>,
    icon: Option<&Bytes>,
    root: P,
) -> Result<usize> {
    let root = root.as_ref();
    let files = pack_files(view, meta, icon)?;

    for (relative, content) in &files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
    }

    debug!(root = %root.display(), files = files.len(), "wrote pack directory");
    Ok(files.len())
}
