//! Infrastructure layer for filesystem locations.

pub mod paths;

pub use paths::{credentials_file, default_data_dir, expand_tilde, resolve_data_dir, snapshots_dir, trace_file};
