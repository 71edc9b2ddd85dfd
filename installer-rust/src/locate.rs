use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{config, error::ForgeError};

fn has_image_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(config::IMAGE_EXTENSION))
        .unwrap_or(false)
}

/// Returns the image the script produced directly inside `work_dir`.
/// Several candidates resolve to the lexicographically smallest name.
pub fn find_image(work_dir: &Path) -> Result<PathBuf, ForgeError> {
    let entries = fs::read_dir(work_dir)
        .map_err(|err| ForgeError::io(format!("list {}", work_dir.display()), err))?;

    let mut best: Option<(String, PathBuf)> = None;
    for entry in entries {
        let entry =
            entry.map_err(|err| ForgeError::io(format!("list {}", work_dir.display()), err))?;
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !has_image_extension(&name) {
            continue;
        }
        if best.as_ref().map_or(true, |(current, _)| name < *current) {
            best = Some((name, entry.path()));
        }
    }

    let (_, path) = best.ok_or_else(|| ForgeError::NotFound {
        dir: work_dir.to_path_buf(),
        extension: config::IMAGE_EXTENSION,
    })?;
    std::path::absolute(&path)
        .map_err(|err| ForgeError::io(format!("resolve {}", path.display()), err))
}
