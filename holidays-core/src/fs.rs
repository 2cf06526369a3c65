use std::path::Path;

/// Write `content` to a sibling `.tmp` file and rename it over `path`.
///
/// Creates missing parent directories.
pub(crate) fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");

    std::fs::write(&temp, content)?;
    std::fs::rename(&temp, path)?;
    Ok(())
}
