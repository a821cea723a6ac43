//! Security practice policy compilation.
//!
//! A practice document is loaded into typed [`practices`] models, collected
//! into a [`PracticeSpec`], and projected into engine [`sections`] with every
//! deferring mode resolved against the enclosing default.

pub mod archive;
pub mod compiler;
pub mod error;
pub mod practice_spec;
pub mod practices;
pub mod resolver;
pub mod sections;
pub mod triggers;
pub mod vocabulary;

pub use archive::{JsonArchive, Loadable, OnInvalid};
pub use compiler::{CompiledPolicy, compile_access_control, compile_practice};
pub use error::{CompileResult, PolicyCompilationError};
pub use practice_spec::PracticeSpec;
pub use resolver::{inherit_mode, resolve};
pub use sections::AssetIdentity;
pub use triggers::LogTrigger;
pub use vocabulary::{Mode, Vocabulary};
