//! Core types for the HFX effect compiler.
//!
//! - [`ShaderEffect`] is the effect description: code chunks, passes and
//!   properties compiled from one `.hfx` file.
//! - [`LiteralBuffer`] carries numeric literals from the lexer to the parser.
//! - [`HfxError`] is the error type shared by every HFX crate.
//! - [`logging::init_logging`] installs the `tracing` subscriber.

pub mod effect;
pub mod error;
pub mod literals;
pub mod logging;
pub mod properties;

// Re-export primary types at crate root for convenience.
pub use effect::{
    CodeChunk, Pass, PassKind, RenderState, Resource, ResourceList, ResourceType, Shader,
    ShaderEffect, ShaderStage, INVALID_INDEX, LOCAL_HFX_INCLUDE_FLAG, NO_STAGE_FLAG,
};
pub use error::{HfxError, Result};
pub use literals::{LiteralBuffer, LiteralCapacity, INVALID_LITERAL_INDEX};
pub use properties::{Property, PropertyData, PropertyKind, TextureDimension};
