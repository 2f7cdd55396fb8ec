use anyhow::{Context, Result};
use perfkit_template::{Bindings, PlaceholderStyle, instantiate, instantiate_script};
use std::path::Path;
use tracing::info;

/// Renders `template` into `output` with the given bindings.
///
/// # Errors
/// Returns an error if the template cannot be read or rendered, or the output cannot be written.
pub fn run_render(
    template: &Path,
    output: &Path,
    set: Vec<(String, String)>,
    literal: bool,
    executable: bool,
) -> Result<()> {
    let style = if literal { PlaceholderStyle::Literal } else { PlaceholderStyle::Delimited };
    let bindings: Bindings = set.into_iter().collect();

    let rendered = if executable {
        instantiate_script(template, output, &bindings, style)
    } else {
        instantiate(template, output, &bindings, style)
    };
    rendered.with_context(|| format!("Failed to render {}", template.display()))?;

    info!(output = %output.display(), ?style, "Rendered");
    Ok(())
}
