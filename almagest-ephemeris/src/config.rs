//! Ephemeris file discovery: search paths, environment parsing, naming
//! conventions.

use crate::error::{EphemerisError, EphemerisResult};
use std::path::PathBuf;

/// Environment variable holding the ephemeris search path.
pub const EPHE_PATH_ENV: &str = "ALMAGEST_EPHE_PATH";

/// Baked-in fallback directory, used when `include_builtin` is on.
pub const BUILTIN_RESOURCE_DIR: &str = "/usr/local/share/almagest/ephe";

/// Which backing data a position came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataSource {
    /// Segmented per-planet Chebyshev files.
    Ephemeris,
    /// JPL development ephemeris records.
    Jpl,
    /// Built-in analytic series, no files required.
    Analytic,
}

impl DataSource {
    pub const fn display_name(self) -> &'static str {
        match self {
            DataSource::Ephemeris => "Swiss Ephemeris",
            DataSource::Jpl => "JPL DE",
            DataSource::Analytic => "Built-in analytic",
        }
    }

    pub const fn file_extension(self) -> Option<&'static str> {
        match self {
            DataSource::Ephemeris => Some(".se1"),
            DataSource::Jpl => Some(".eph"),
            DataSource::Analytic => None,
        }
    }

    pub const fn requires_files(self) -> bool {
        !matches!(self, DataSource::Analytic)
    }
}

/// On-disk ephemeris format, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FileFormat {
    Se1,
    Jpl,
}

impl FileFormat {
    /// Classify a file by name; `None` for anything unrecognized.
    pub fn from_file_name(name: &str) -> Option<FileFormat> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".se1") {
            Some(FileFormat::Se1)
        } else if lower.ends_with(".eph") {
            Some(FileFormat::Jpl)
        } else {
            None
        }
    }
}

/// An ordered list of directories to search for ephemeris files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EphemerisConfig {
    search_paths: Vec<PathBuf>,
    include_builtin: bool,
}

/// Builder for [`EphemerisConfig`].
#[derive(Debug, Default)]
pub struct EphemerisConfigBuilder {
    paths: Vec<PathBuf>,
    include_builtin: bool,
}

impl EphemerisConfigBuilder {
    pub fn add_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    pub fn include_builtin(mut self, include: bool) -> Self {
        self.include_builtin = include;
        self
    }

    pub fn build(self) -> EphemerisConfig {
        EphemerisConfig {
            search_paths: self.paths,
            include_builtin: self.include_builtin,
        }
    }
}

/// Splits a raw path list.
///
/// A `;` anywhere selects Windows semantics (split on `;`), otherwise the
/// Unix `:` separator applies. Empty entries are dropped.
fn split_path_list(raw: &str) -> Vec<PathBuf> {
    let separator = if raw.contains(';') { ';' } else { ':' };
    raw.split(separator)
        .filter(|piece| !piece.is_empty())
        .map(PathBuf::from)
        .collect()
}

impl EphemerisConfig {
    pub fn builder() -> EphemerisConfigBuilder {
        EphemerisConfigBuilder::default()
    }

    /// Builtin-only configuration.
    pub fn default_config() -> Self {
        Self {
            search_paths: Vec::new(),
            include_builtin: true,
        }
    }

    /// Configuration from a raw search-path string (the format of the
    /// [`EPHE_PATH_ENV`] variable).
    pub fn from_path_list(raw: &str) -> Self {
        Self {
            search_paths: split_path_list(raw),
            include_builtin: true,
        }
    }

    /// Configuration from the process environment. An unset or empty
    /// variable leaves only the builtin fallback.
    pub fn from_environment() -> Self {
        match std::env::var(EPHE_PATH_ENV) {
            Ok(raw) if !raw.is_empty() => Self::from_path_list(&raw),
            _ => Self::default_config(),
        }
    }

    /// The effective search list, builtin fallback last.
    pub fn search_paths(&self) -> Vec<PathBuf> {
        let mut paths = self.search_paths.clone();
        if self.include_builtin {
            paths.push(PathBuf::from(BUILTIN_RESOURCE_DIR));
        }
        paths
    }

    pub fn is_empty(&self) -> bool {
        self.search_paths.is_empty() && !self.include_builtin
    }
}

impl Default for EphemerisConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

/// Finds concrete files along a configuration's search path.
#[derive(Debug, Clone)]
pub struct PathResolver {
    config: EphemerisConfig,
}

impl PathResolver {
    pub fn new(config: EphemerisConfig) -> Self {
        Self { config }
    }

    /// First directory containing `name`, in search order.
    ///
    /// Fails with `ConfigurationInvalid` when the configuration has no
    /// directories at all, and `FileNotFound` when none of them has the
    /// file.
    pub fn find_file(&self, name: &str) -> EphemerisResult<PathBuf> {
        let paths = self.config.search_paths();
        if paths.is_empty() {
            return Err(EphemerisError::ConfigurationInvalid(
                "search path list is empty and the builtin fallback is disabled".into(),
            ));
        }
        for dir in &paths {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        Err(EphemerisError::FileNotFound { name: name.into() })
    }

    pub fn exists(&self, name: &str) -> bool {
        self.find_file(name).is_ok()
    }

    /// All files with the given extension across the search path, in
    /// search order. Unreadable directories are skipped.
    pub fn list_files(&self, extension: &str) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for dir in self.config.search_paths() {
            let Ok(entries) = std::fs::read_dir(&dir) else {
                continue;
            };
            let mut batch: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| {
                    path.is_file()
                        && path
                            .extension()
                            .and_then(|ext| ext.to_str())
                            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
                })
                .collect();
            batch.sort();
            found.extend(batch);
        }
        found
    }
}

/// SE1 file name for a body-group prefix and an astronomical year:
/// `{prefix}_{century:02}.se1` with the century `floor(year / 100)`.
pub fn se1_file_name(prefix: &str, year: i32) -> String {
    let century = (year as f64 / 100.0).floor() as i32;
    format!("{prefix}_{century:02}.se1")
}

/// JPL file name for a DE number: `de{number}.eph`.
pub fn jpl_file_name(de_number: i32) -> String {
    format!("de{de_number}.eph")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_separator() {
        let config = EphemerisConfig::from_path_list("/usr/share/ephe:/opt/ephe");
        let paths = config.search_paths();
        assert_eq!(paths[0], PathBuf::from("/usr/share/ephe"));
        assert_eq!(paths[1], PathBuf::from("/opt/ephe"));
    }

    #[test]
    fn semicolon_selects_windows_semantics() {
        let config = EphemerisConfig::from_path_list("C:\\ephe;D:\\astro");
        let paths = config.search_paths();
        assert_eq!(paths[0], PathBuf::from("C:\\ephe"));
        assert_eq!(paths[1], PathBuf::from("D:\\astro"));
    }

    #[test]
    fn empty_entries_dropped() {
        let config = EphemerisConfig::from_path_list("/a::/b:");
        let explicit: Vec<_> = config
            .search_paths()
            .into_iter()
            .filter(|p| *p != PathBuf::from(BUILTIN_RESOURCE_DIR))
            .collect();
        assert_eq!(explicit, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn builder_appends_builtin_last() {
        let config = EphemerisConfig::builder()
            .add_path("/path1")
            .add_path("/path2")
            .include_builtin(true)
            .build();
        let paths = config.search_paths();
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[2], PathBuf::from(BUILTIN_RESOURCE_DIR));
    }

    #[test]
    fn empty_config_is_detectable() {
        let config = EphemerisConfig::builder().include_builtin(false).build();
        assert!(config.is_empty());
        assert!(!EphemerisConfig::default_config().is_empty());
    }

    #[test]
    fn resolver_rejects_empty_configuration() {
        let config = EphemerisConfig::builder().include_builtin(false).build();
        let resolver = PathResolver::new(config);
        assert!(matches!(
            resolver.find_file("sepl_20.se1"),
            Err(EphemerisError::ConfigurationInvalid(_))
        ));
    }

    #[test]
    fn resolver_finds_and_lists() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sepl_18.se1"), b"x").unwrap();
        std::fs::write(dir.path().join("semo_18.se1"), b"x").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"x").unwrap();

        let config = EphemerisConfig::builder()
            .add_path(dir.path())
            .include_builtin(false)
            .build();
        let resolver = PathResolver::new(config);

        let found = resolver.find_file("sepl_18.se1").unwrap();
        assert_eq!(found.file_name().unwrap(), "sepl_18.se1");
        assert!(resolver.exists("semo_18.se1"));
        assert!(!resolver.exists("sepl_21.se1"));
        assert!(matches!(
            resolver.find_file("missing.se1"),
            Err(EphemerisError::FileNotFound { .. })
        ));

        assert_eq!(resolver.list_files("se1").len(), 2);
    }

    #[test]
    fn search_order_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::write(first.path().join("de441.eph"), b"1").unwrap();
        std::fs::write(second.path().join("de441.eph"), b"2").unwrap();

        let config = EphemerisConfig::builder()
            .add_path(first.path())
            .add_path(second.path())
            .include_builtin(false)
            .build();
        let found = PathResolver::new(config).find_file("de441.eph").unwrap();
        assert!(found.starts_with(first.path()));
    }

    #[test]
    fn file_format_detection() {
        assert_eq!(FileFormat::from_file_name("sepl_18.se1"), Some(FileFormat::Se1));
        assert_eq!(FileFormat::from_file_name("SEMO_20.SE1"), Some(FileFormat::Se1));
        assert_eq!(FileFormat::from_file_name("de441.eph"), Some(FileFormat::Jpl));
        assert_eq!(FileFormat::from_file_name("notes.txt"), None);
    }

    #[test]
    fn naming_conventions() {
        assert_eq!(se1_file_name("sepl", 2000), "sepl_20.se1");
        assert_eq!(se1_file_name("semo", 1874), "semo_18.se1");
        assert_eq!(se1_file_name("seas", 850), "seas_08.se1");
        assert_eq!(jpl_file_name(441), "de441.eph");
    }

    #[test]
    fn data_source_metadata() {
        assert_eq!(DataSource::Ephemeris.display_name(), "Swiss Ephemeris");
        assert_eq!(DataSource::Ephemeris.file_extension(), Some(".se1"));
        assert!(DataSource::Ephemeris.requires_files());
        assert!(DataSource::Jpl.requires_files());
        assert!(!DataSource::Analytic.requires_files());
        assert_eq!(DataSource::Analytic.file_extension(), None);
    }
}
