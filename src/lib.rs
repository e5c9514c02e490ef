//! EasyKey import - load a directory tree into an EasyKey store
//!
//! This crate provides the core functionality for the `eki` CLI tool: walk a
//! directory, give every regular file a unique key, and run the EasyKey
//! write client once per file, stopping at the first failure.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (`ImportSession`, `ImportUnit`)
//! - [`import`] - Walker, key derivation, writer seam, manifest, driver
//! - [`config`] - Flag/env/default resolution and the directory prompt
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod import;
pub mod model;

pub use error::{Error, Result};
