//! # Bootstrap
//!
//! Prepares an empty working directory for benchmark runs:
//!
//! 1. copies the root authority and device trust files from the depot into `certs/`,
//! 2. issues a certificate for this host signed by that authority,
//! 3. renders one server config per pool instance into `gfe2_configs/`,
//!    each with its own ports,
//! 4. renders the helper scripts listed in [`scripts::SCRIPTS`] and makes them executable,
//! 5. records the native source tree in `perfkit.local.toml` for later builds.
//!
//! The sequence is strictly linear. Any failing step, including a non-zero exit
//! of `openssl` or `hostname`, aborts the run.

mod error;
mod procedure;
pub mod scripts;

pub use crate::error::BootstrapError;
pub use crate::procedure::{
    BootstrapOptions, BootstrapReport, placeholder_style, resolve_host, run,
};
