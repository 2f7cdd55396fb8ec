//! # Domain Models
//!
//! Pure data types for the harness with a single dependency (`serde`).
//! Keep it lean: no I/O, no process spawning, no validation that needs
//! heavy crates. Loading and validation live in `perfkit-kernel`.

pub mod config;
pub mod ports;
