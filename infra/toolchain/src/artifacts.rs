use crate::error::ToolError;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name glob: `*` matches any run of characters, `?` a single one.
#[derive(Debug, Clone)]
pub struct FilePattern {
    glob: String,
    regex: Regex,
}

impl FilePattern {
    /// # Errors
    /// Returns [`ToolError::Pattern`] if the translated expression is rejected.
    pub fn new(glob: &str) -> Result<Self, ToolError> {
        let mut expr = String::with_capacity(glob.len() + 8);
        expr.push('^');
        let mut buf = [0u8; 4];
        for ch in glob.chars() {
            match ch {
                '*' => expr.push_str(".*"),
                '?' => expr.push('.'),
                other => expr.push_str(&regex::escape(other.encode_utf8(&mut buf))),
            }
        }
        expr.push('$');

        let regex = Regex::new(&expr)
            .map_err(|source| ToolError::Pattern { pattern: glob.to_owned(), source })?;
        Ok(Self { glob: glob.to_owned(), regex })
    }

    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    /// Regular files directly inside `dir` whose names match, sorted by name.
    ///
    /// # Errors
    /// Returns [`ToolError::Scan`] if `dir` cannot be listed.
    pub fn find_in(&self, dir: &Path) -> Result<Vec<PathBuf>, ToolError> {
        let mut found = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true).sort_by_file_name()
        {
            let entry = entry.map_err(|source| ToolError::Scan { dir: dir.to_path_buf(), source })?;
            if entry.file_type().is_file()
                && entry.file_name().to_str().is_some_and(|name| self.matches(name))
            {
                found.push(entry.into_path());
            }
        }
        Ok(found)
    }

    /// First match inside `dir` in name order.
    ///
    /// # Errors
    /// Returns [`ToolError::NoMatch`] when nothing matches, or the errors of [`FilePattern::find_in`].
    pub fn find_first(&self, dir: &Path) -> Result<PathBuf, ToolError> {
        self.find_in(dir)?.into_iter().next().ok_or_else(|| ToolError::NoMatch {
            dir: dir.to_path_buf(),
            pattern: self.glob.clone(),
        })
    }
}
