//! # Template
//!
//! File generation primitives used by the harness procedures:
//!
//! * [`Template`]: placeholder substitution in two styles. [`PlaceholderStyle::Delimited`]
//!   (`{{NAME}}`) is the default; [`PlaceholderStyle::Literal`] matches bare keys as
//!   exact substrings for templates written that way.
//! * [`LinePatch`]: in-place regex rewrite of a text file, line by line.
//! * [`fsops`]: directory creation, idempotent removal, copying and execute bits.
//!
//! ## Example
//!
//! ```rust
//! use perfkit_template::{Bindings, PlaceholderStyle, Template};
//!
//! let tpl = Template::new("listen {{HTTP_PORT}};\n", PlaceholderStyle::Delimited);
//! let out = tpl.render(&Bindings::new().with("HTTP_PORT", "8890")).unwrap();
//! assert_eq!(out, "listen 8890;\n");
//! ```

mod error;
pub mod fsops;
mod patch;
mod template;

pub use crate::error::{Result, TemplateError};
pub use crate::patch::LinePatch;
pub use crate::template::{
    Bindings, PlaceholderStyle, Template, instantiate, instantiate_script,
};
