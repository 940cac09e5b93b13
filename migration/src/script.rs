use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::MigrationError;

/// A migration file found on disk: `<version>.<anything>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MigrationScript {
    pub version: i64,
    pub name: String,
    pub path: PathBuf,
}

impl MigrationScript {
    /// Parses the leading version of a file name such as `3.add_movies.sql`.
    pub fn from_file_name(name: &str, path: PathBuf) -> Result<Self, MigrationError> {
        let invalid = || MigrationError::InvalidFileName { name: name.to_string() };

        let (prefix, _) = name.split_once('.').ok_or_else(invalid)?;
        let version = prefix.parse::<i64>().map_err(|_| invalid())?;

        Ok(Self { version, name: name.to_string(), path })
    }

    pub fn read_body(&self) -> Result<String, MigrationError> {
        fs::read_to_string(&self.path)
            .map_err(|source| MigrationError::Io { path: self.path.clone(), source })
    }
}

/// Lists every migration script in `dir`, sorted ascending by version.
///
/// Directories are ignored. Any file whose name does not start with an
/// integer version followed by `.` fails the whole discovery.
pub fn discover(dir: &Path) -> Result<Vec<MigrationScript>, MigrationError> {
    let io_err = |source| MigrationError::Io { path: dir.to_path_buf(), source };

    let mut scripts = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if !entry.file_type().map_err(io_err)?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        scripts.push(MigrationScript::from_file_name(&name, entry.path())?);
    }

    scripts.sort_by(|a, b| a.version.cmp(&b.version).then_with(|| a.name.cmp(&b.name)));
    Ok(scripts)
}

/// True when the script holds nothing but blank `;`-separated fragments.
pub fn is_blank(body: &str) -> bool {
    body.split(';').all(|stmt| stmt.trim().is_empty())
}
