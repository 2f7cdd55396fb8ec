use crate::error::{Result, TemplateError};
use regex::{NoExpand, Regex};
use std::fs;
use std::path::Path;
use tracing::info;

/// Rewrites every match of a pattern with a fixed string, line by line.
#[derive(Debug, Clone)]
pub struct LinePatch {
    pattern: Regex,
    replacement: String,
}

impl LinePatch {
    /// # Errors
    /// Returns [`TemplateError::Pattern`] if `pattern` is not a valid regex.
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|source| TemplateError::Pattern { pattern: pattern.to_owned(), source })?;
        Ok(Self { pattern: regex, replacement: replacement.into() })
    }

    /// Returns the patched text and the number of lines that matched.
    ///
    /// The replacement is inserted literally; `$` has no special meaning.
    #[must_use]
    pub fn apply(&self, text: &str) -> (String, usize) {
        let mut out = String::with_capacity(text.len());
        let mut matched = 0;

        for line in text.split_inclusive('\n') {
            if self.pattern.is_match(line) {
                matched += 1;
                out.push_str(&self.pattern.replace_all(line, NoExpand(&self.replacement)));
            } else {
                out.push_str(line);
            }
        }

        (out, matched)
    }

    /// Patches `path` in place.
    ///
    /// # Errors
    /// Returns [`TemplateError::Io`] if the file cannot be read or rewritten.
    pub fn apply_to_file(&self, path: &Path) -> Result<usize> {
        let text = fs::read_to_string(path).map_err(TemplateError::io("read", path))?;
        let (patched, matched) = self.apply(&text);
        fs::write(path, patched).map_err(TemplateError::io("rewrite", path))?;

        info!(
            path = %path.display(),
            lines = matched,
            replacement = %self.replacement,
            "Patched manifest"
        );
        Ok(matched)
    }
}
