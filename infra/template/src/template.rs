use crate::error::{Result, TemplateError};
use crate::fsops::make_executable;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

static DELIMITED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// How placeholders are spelled inside a template.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderStyle {
    /// Keys are matched as exact substrings anywhere in a line.
    ///
    /// A key that happens to be part of unrelated text is replaced as well.
    Literal,
    /// Placeholders are written `{{NAME}}` and must all be bound.
    #[default]
    Delimited,
}

/// Placeholder name to replacement text, iterated in key order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Bindings {
    entries: BTreeMap<String, String>,
}

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bindings = Self::new();
        for (k, v) in iter {
            bindings.insert(k, v);
        }
        bindings
    }
}

/// Template text together with its placeholder style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
    style: PlaceholderStyle,
}

impl Template {
    #[must_use]
    pub fn new(text: impl Into<String>, style: PlaceholderStyle) -> Self {
        Self { text: text.into(), style }
    }

    /// Reads a template from disk.
    ///
    /// # Errors
    /// Returns [`TemplateError::Io`] if the file cannot be read as UTF-8 text.
    pub fn load(path: &Path, style: PlaceholderStyle) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(TemplateError::io("read template", path))?;
        Ok(Self::new(text, style))
    }

    /// Substitutes every bound placeholder, line by line.
    ///
    /// Text outside placeholders, line endings included, is copied verbatim and
    /// replacement values are never scanned again.
    ///
    /// # Errors
    /// * [`TemplateError::InvalidKey`] for an empty key or a key spanning lines (literal style).
    /// * [`TemplateError::Unbound`] for a `{{NAME}}` without a binding (delimited style).
    pub fn render(&self, bindings: &Bindings) -> Result<String> {
        match self.style {
            PlaceholderStyle::Literal => render_literal(&self.text, bindings),
            PlaceholderStyle::Delimited => render_delimited(&self.text, bindings),
        }
    }

    /// Renders into `dest`, replacing any existing file.
    ///
    /// # Errors
    /// Rendering errors as in [`Template::render`], or [`TemplateError::Io`] on write.
    pub fn render_to(&self, bindings: &Bindings, dest: &Path) -> Result<()> {
        let rendered = self.render(bindings)?;
        fs::write(dest, rendered).map_err(TemplateError::io("write", dest))
    }
}

fn render_literal(text: &str, bindings: &Bindings) -> Result<String> {
    if bindings.is_empty() {
        return Ok(text.to_owned());
    }
    let matcher = literal_matcher(bindings)?;

    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let replaced = matcher
            .replace_all(line, |caps: &Captures<'_>| bindings.get(&caps[0]).unwrap_or_default());
        out.push_str(&replaced);
    }
    Ok(out)
}

/// Alternation of all keys, longest first so the longest key wins at a position.
fn literal_matcher(bindings: &Bindings) -> Result<Regex> {
    let mut keys: Vec<&str> = Vec::with_capacity(bindings.len());
    for (key, _) in bindings.iter() {
        if key.is_empty() {
            return Err(TemplateError::InvalidKey { key: key.to_owned(), reason: "key is empty" });
        }
        if key.contains(['\n', '\r']) {
            return Err(TemplateError::InvalidKey {
                key: key.to_owned(),
                reason: "key spans more than one line",
            });
        }
        keys.push(key);
    }
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let pattern = keys.iter().map(|k| regex::escape(k)).collect::<Vec<_>>().join("|");
    Regex::new(&pattern).map_err(|source| TemplateError::Pattern { pattern, source })
}

fn render_delimited(text: &str, bindings: &Bindings) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    for (idx, line) in text.split_inclusive('\n').enumerate() {
        let mut last = 0;
        for caps in DELIMITED.captures_iter(line) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else { continue };
            let value = bindings.get(name.as_str()).ok_or_else(|| TemplateError::Unbound {
                name: name.as_str().to_owned(),
                line: idx + 1,
            })?;
            out.push_str(&line[last..whole.start()]);
            out.push_str(value);
            last = whole.end();
        }
        out.push_str(&line[last..]);
    }

    let leftovers = literal_leftovers(&out, bindings);
    if !leftovers.is_empty() {
        warn!(
            keys = %leftovers.join(", "),
            "Template uses bare NAME_PLACEHOLDER keys; set templates.style = \"literal\" to replace them"
        );
    }
    Ok(out)
}

/// Bound names whose bare `NAME_PLACEHOLDER` spelling survives in delimited output.
fn literal_leftovers(text: &str, bindings: &Bindings) -> Vec<String> {
    bindings
        .iter()
        .map(|(name, _)| format!("{name}_PLACEHOLDER"))
        .filter(|key| text.contains(key.as_str()))
        .collect()
}

/// Generates `dst` from the template at `src`.
///
/// # Errors
/// Returns an error if `src` cannot be read, rendering fails, or `dst` cannot be written.
pub fn instantiate(
    src: &Path,
    dst: &Path,
    bindings: &Bindings,
    style: PlaceholderStyle,
) -> Result<()> {
    Template::load(src, style)?.render_to(bindings, dst)?;
    debug!(src = %src.display(), dst = %dst.display(), bindings = bindings.len(), "Rendered template");
    Ok(())
}

/// Same as [`instantiate`], then sets the execute bits of `dst`.
///
/// # Errors
/// See [`instantiate`] and [`make_executable`].
pub fn instantiate_script(
    src: &Path,
    dst: &Path,
    bindings: &Bindings,
    style: PlaceholderStyle,
) -> Result<()> {
    instantiate(src, dst, bindings, style)?;
    make_executable(dst)
}
