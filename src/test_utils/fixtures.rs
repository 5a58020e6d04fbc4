//! Release archive fixtures.

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

/// Build a zip archive in memory from `(name, content)` pairs.
///
/// Names ending in `/` become directory entries. Names are stored verbatim, so
/// hostile entries such as `../../evil` can be produced.
pub fn release_zip(entries: &[(&str, &[u8])]) -> zip::result::ZipResult<Vec<u8>> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().unix_permissions(0o755);

    for (name, content) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options)?;
        } else {
            zip.start_file(*name, options)?;
            zip.write_all(content)?;
        }
    }

    Ok(zip.finish()?.into_inner())
}
