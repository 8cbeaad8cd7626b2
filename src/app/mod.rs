//! Application layer sitting between the CLI and the stores.
//!
//! ```text
//! CLI command → ActionHook → ResourceStore → ResourceClient → envelope
//!                                 ↓
//!                 snapshot → SearchOverlay → ListView → renderer
//! ```
//!
//! # Modules
//!
//! - [`actions`]: per-screen mutation wrapper with expiring messages
//! - [`context`]: dependency container built once at startup
//! - [`search`]: case-insensitive filtering and match highlighting

pub mod actions;
pub mod context;
pub mod search;

pub use actions::{ActionHook, ActionMessages, ActionState, DEFAULT_MESSAGE_TTL};
pub use context::{AppContext, SNAPSHOT_VERSION};
pub use search::{filter_items, match_ranges, FilteredView, SearchOverlay};
