//! # Toolchain
//!
//! Everything that leaves the process goes through this crate:
//!
//! * [`CommandRunner`] is the seam for spawning external programs.
//!   [`SystemRunner`] spawns them for real; with the `testing` feature,
//!   `testing::RecordingRunner` records them instead.
//! * [`Openssl`] assembles the TLS toolkit invocations that issue a host
//!   certificate signed by a local root authority.
//! * [`FilePattern`] locates build artifacts by file name glob.
//!
//! Every failure aborts the caller: there are no retries here.
//!
//! ## Example
//!
//! ```rust,no_run
//! use perfkit_toolchain::{CommandRunner, CommandSpec, SystemRunner};
//!
//! let cmd = CommandSpec::new("autoninja").args(["-C", "out/arm64", "cronet_package"]);
//! SystemRunner.run(&cmd).unwrap();
//! ```

mod artifacts;
mod command;
mod error;
mod openssl;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use crate::artifacts::FilePattern;
pub use crate::command::{CommandRunner, CommandSpec, SystemRunner};
pub use crate::error::ToolError;
pub use crate::openssl::{CertificateAuthority, HostCertificate, IssueParams, Openssl};
