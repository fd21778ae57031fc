//! Type-safe wrappers for provisioning operations.
//!
//! This module provides newtypes that enforce path validation at the type
//! level. Both types are validated upon construction and cannot be created
//! from raw paths without going through validation.
//!
//! # Design Principles
//!
//! - Invalid states cannot be represented
//! - No `From<RawType>` implementations for validated types
//! - All constructors perform validation

pub mod dest_dir;
pub mod entry_path;

pub use dest_dir::DestDir;
pub use entry_path::EntryPath;
