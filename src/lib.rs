//! Practice Compiler - turns hierarchical security practice policies into
//! resolved enforcement documents.
//!
//! A practice document configures web-attack protection, anti-bot, intrusion
//! prevention, file security and Snort signatures for one asset class. Any
//! mode in it may defer to its parent (`inherited` / `as-top-level`). The
//! compiler validates the document, resolves every deferred mode against the
//! asset default and emits the sections each enforcement engine consumes.
//!
//! # Quick Example
//! ```
//! use practice_compiler::policy::{AssetIdentity, Mode, compile_practice};
//! use serde_json::json;
//!
//! let document = json!({
//!     "practiceMode": "inherited",
//!     "intrusionPrevention": {"overrideMode": "as-top-level"}
//! });
//! let identity = AssetIdentity::new("shop", "shop.example.com/");
//! let policy = compile_practice(&document, &identity, Mode::Detect)?;
//! assert_eq!(policy.ips().protections()[0].default_action(), "Detect");
//! # Ok::<(), practice_compiler::policy::PolicyCompilationError>(())
//! ```
//!
//! # Error Handling
//! The core returns [`policy::PolicyCompilationError`]: a document compiles
//! completely or not at all. Settings and file loading return
//! `eyre::Result<T>` with `WrapErr` context.
pub mod config;
pub mod policy;
pub mod tracing_setup;

pub use crate::policy::{
    AssetIdentity, CompiledPolicy, Mode, PolicyCompilationError, PracticeSpec, compile_practice,
};
