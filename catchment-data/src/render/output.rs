//! Capability-based output writing.

use std::io;
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Write `contents` to `path`, creating missing parent directories.
pub(crate) fn write_document(path: &Utf8Path, contents: &str) -> io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("output path should include a file name"))?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));

    let (base, relative) = split_base(parent)?;
    let mut dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    if !relative.as_str().is_empty() {
        dir.create_dir_all(&relative)?;
        dir = dir.open_dir(&relative)?;
    }
    dir.write(file_name, contents)
}

/// Split `parent` into an ambient base directory and a relative suffix.
fn split_base(parent: &Utf8Path) -> io::Result<(Utf8PathBuf, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();
    match std_parent.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            let base = Utf8PathBuf::from(prefix).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = parent
                .strip_prefix(&base)
                .map_err(|_| io::Error::other("failed to strip prefix from output path"))?;
            Ok((base, relative.to_owned()))
        }
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = parent
                .strip_prefix(&base)
                .map_err(|_| io::Error::other("failed to strip root from output path"))?;
            Ok((base, relative.to_owned()))
        }
        _ => Ok((Utf8PathBuf::from("."), parent.to_owned())),
    }
}
