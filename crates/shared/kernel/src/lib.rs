//! Kernel utilities shared across the procedures.
//! Keep this crate lightweight; it owns configuration loading and the checks
//! that must pass before any procedure touches the filesystem.
//!
//! ## Config loading
//! ```rust,no_run
//! use perfkit_kernel::config::ConfigLoader;
//!
//! let cfg = ConfigLoader::new(".").load().unwrap();
//! assert!(cfg.servers.count > 0);
//! ```
pub mod config;
