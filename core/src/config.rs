//! INI table configuration.
//!
//! One section per table; each key declares a column and its value is the
//! SQL type. A leading `*` on the key marks a primary-key column.
//!
//! ```ini
//! [example_table]
//! *id=INTEGER
//! name=TEXT
//! age=INTEGER
//! ```
//!
//! Keys are returned exactly as written (case and `*` marker included), in
//! file order. Turning them into columns is the job of
//! [`TableSchema`](crate::TableSchema).

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

/// Failures while loading a table definition.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid INI.
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ini::ParseError,
    },

    /// The requested section does not exist.
    #[error("section [{section}] not found in {}", path.display())]
    SectionNotFound { section: String, path: PathBuf },

    /// The same column name appears twice in one section.
    #[error("column {0:?} declared more than once")]
    DuplicateColumn(String),
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Reads `section` from the INI file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read,
/// [`ConfigError::Parse`] if it is malformed, and
/// [`ConfigError::SectionNotFound`] if the section is absent.
pub fn load_section(path: impl AsRef<Path>, section: &str) -> Result<Vec<(String, String)>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    section_pairs(&contents, section, path)
}

/// Reads `section` from INI text already in memory.
///
/// # Errors
///
/// Same as [`load_section`], minus the I/O case.
///
/// # Examples
///
/// ```
/// use ini_table_core::parse_section;
///
/// let pairs = parse_section("[t]\n*id=INTEGER\nname=TEXT\n", "t").unwrap();
/// assert_eq!(pairs[0], ("*id".to_string(), "INTEGER".to_string()));
/// assert_eq!(pairs[1], ("name".to_string(), "TEXT".to_string()));
/// ```
pub fn parse_section(contents: &str, section: &str) -> Result<Vec<(String, String)>> {
    section_pairs(contents, section, Path::new("<inline>"))
}

fn section_pairs(contents: &str, section: &str, origin: &Path) -> Result<Vec<(String, String)>> {
    let ini = Ini::load_from_str(contents).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;

    let properties = ini
        .section(Some(section))
        .ok_or_else(|| ConfigError::SectionNotFound {
            section: section.to_string(),
            path: origin.to_path_buf(),
        })?;

    Ok(properties
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect())
}
