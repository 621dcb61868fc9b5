//! # CLI Command Implementations
//!
//! Each subcommand of `packsmith` lives in its own file with an `Args`
//! struct derived with `clap` and an `execute` function that calls into the
//! `packsmith` library.

pub mod build;
pub mod completions;
pub mod resolve;
