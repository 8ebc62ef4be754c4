//! Sources of loaded stylesheets and the sheet naming convention.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::rules::SheetSource;
use crate::{Error, Result};

/// Anything that can report the currently loaded style sheets.
pub trait StyleSheetProvider {
    /// Every loaded sheet in load order.
    fn sheets(&self) -> Result<Vec<SheetSource>>;
}

impl StyleSheetProvider for Vec<SheetSource> {
    fn sheets(&self) -> Result<Vec<SheetSource>> {
        Ok(self.clone())
    }
}

impl StyleSheetProvider for [SheetSource] {
    fn sheets(&self) -> Result<Vec<SheetSource>> {
        Ok(self.to_vec())
    }
}

/// Reads every `.css` file of a directory tree, sorted by path.
#[derive(Debug, Clone)]
pub struct DirectorySheetProvider {
    root: PathBuf,
}

impl DirectorySheetProvider {
    /// Provide the sheets found under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory being scanned.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collect(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
        let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| Error::io(dir, e))?.path();
            if path.is_dir() {
                Self::collect(&path, out)?;
            } else if path.extension().is_some_and(|ext| ext == "css") {
                out.push(path);
            }
        }
        Ok(())
    }
}

impl StyleSheetProvider for DirectorySheetProvider {
    fn sheets(&self) -> Result<Vec<SheetSource>> {
        let mut paths = vec![];
        Self::collect(&self.root, &mut paths)?;
        paths.sort();

        paths
            .into_iter()
            .map(|path| {
                let css = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
                let href = path
                    .strip_prefix(&self.root)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .replace('\\', "/");
                Ok(SheetSource::new(href, css))
            })
            .collect()
    }
}

/// Derives logical sheet names from hrefs.
///
/// A sheet is recognized when its href matches `<prefix>-<name>.css` or
/// `components/<name>/vars.css`; the captured `<name>` is the logical name.
#[derive(Debug, Clone)]
pub struct SheetNaming {
    patterns: Vec<Regex>,
}

impl SheetNaming {
    /// Build the naming patterns for a sheet prefix such as `spectrum`.
    pub fn new(sheet_prefix: &str) -> Result<Self> {
        let sources = [
            format!(r"{}-([\w-]*?)\.css", regex::escape(sheet_prefix)),
            r"components/(.*?)/vars\.css".to_string(),
        ];
        let patterns = sources
            .iter()
            .map(|source| {
                Regex::new(source).map_err(|e| Error::invalid_pattern(source.clone(), e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Logical name for `href`, or `None` when the href does not follow the
    /// convention.
    pub fn logical_name(&self, href: &str) -> Option<String> {
        self.patterns
            .iter()
            .find_map(|pattern| pattern.captures(href))
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
    }
}
