use crate::error::ShaderError;
use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

pub const VERTEX_SUFFIX: &str = ".vs";
pub const FRAGMENT_SUFFIX: &str = ".fs";

/// Vertex and fragment source paths for a single base path.
///
/// The suffixes are appended literally: `"foo/bar"` gives `"foo/bar.vs"` and
/// `"foo/bar.fs"`. An existing extension is kept, not replaced.
pub fn stage_paths(base: impl AsRef<Path>) -> (PathBuf, PathBuf) {
    let with_suffix = |suffix: &str| {
        let mut path = base.as_ref().as_os_str().to_owned();
        path.push(suffix);
        PathBuf::from(path)
    };
    (with_suffix(VERTEX_SUFFIX), with_suffix(FRAGMENT_SUFFIX))
}

/// Reads a whole source file. The file is closed before this returns.
pub fn read_source(path: &Path) -> Result<String, ShaderError> {
    let into_error = |source| ShaderError::Read {
        path: path.to_owned(),
        source,
    };
    let mut file = File::open(path).map_err(into_error)?;
    let mut text = String::new();
    file.read_to_string(&mut text).map_err(into_error)?;
    Ok(text)
}
