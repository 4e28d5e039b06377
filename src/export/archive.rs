//! ZIP archive export.

use super::{pack_files, ExportOptions};
use crate::error::Result;
use crate::resolver::MergedView;
use crate::resource_pack::PackMeta;
use bytes::Bytes;
use std::io::Write;
use tracing::debug;

/// Write `view` as a ZIP-packaged resource pack with default options.
pub fn write_zip(view: &MergedView, meta: Option<&PackMeta>, icon: Option<&Bytes>) -> Result<Vec<u8>> {
    write_zip_with(view, meta, icon, &ExportOptions::default())
}

pub fn write_zip_with(
    view: &MergedView,
    meta: Option<&PackMeta>,
    icon: Option<&Bytes>,
    options: &ExportOptions,
) -> Result<Vec<u8>> {
    let files = pack_files(view, meta, icon)?;

    let method = if options.compress {
        zip::CompressionMethod::Deflated
    } else {
        zip::CompressionMethod::Stored
    };
    let file_options = zip::write::SimpleFileOptions::default().compression_method(method);

    let mut buf = Vec::new();
    {
        let cursor = std::io::Cursor::new(&mut buf);
        let mut zip = zip::ZipWriter::new(cursor);
        for (path, content) in &files {
            zip.start_file(path.as_str(), file_options)?;
            zip.write_all(content)?;
        }
        zip.finish()?;
    }

    debug!(files = files.len(), bytes = buf.len(), generation = view.generation(), "wrote pack archive");
    Ok(buf)
}
