//! Common utilities and shared types for warbler.
//!
//! This crate provides foundational components used across all warbler crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: Time-ordered media file names via [`IdGenerator`]
//! - **Storage**: The media content store via [`StorageBackend`]
//!
//! # Example
//!
//! ```no_run
//! use warbler_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let name = id_gen.media_file_name();
//!     println!("{}/{}", config.media.public_root(), name);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use storage::{LocalStorage, StorageBackend, StorageService};
