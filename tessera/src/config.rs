use std::path::{Path, PathBuf};

/// [`FileSystemLoader`][crate::FileSystemLoader] configuration.
#[derive(Debug, Clone)]
pub struct Config {
    templ_dir: PathBuf,
    suffix: Box<str>,
}

impl Config {
    pub fn new(templ_dir: impl Into<PathBuf>) -> Self {
        Self { templ_dir: templ_dir.into(), ..Default::default() }
    }

    /// Template root directory, default to `templates`.
    pub fn templ_dir(&self) -> &Path {
        &self.templ_dir
    }

    /// Suffix appended to template names that lack it, default to none.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn with_templ_dir(mut self, templ_dir: impl Into<PathBuf>) -> Self {
        self.templ_dir = templ_dir.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<Box<str>>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            templ_dir: PathBuf::from("templates"),
            suffix: Box::from(""),
        }
    }
}
