//! Binary persistence for [`ShaderEffect`].
//!
//! [`BinarySerializer`] is opened for one direction and drives the
//! bidirectional [`Serializable`] trait: the same `serialize` call writes a
//! value or reads it back in place. Everything is little-endian, strings and
//! sequences carry a `u32` length prefix, and enums are stored as their `u32`
//! discriminant. There is no version field.

pub mod effect;
pub mod serializable;
pub mod serializer;

pub use serializable::{serialize_enum, Serializable};
pub use serializer::{BinarySerializer, SerializerAction};

use std::path::Path;

use hfx_core::{Result, ShaderEffect};
use tracing::debug;

/// Write `effect` to `path`, replacing any existing file.
pub fn save_effect(path: impl AsRef<Path>, effect: &ShaderEffect) -> Result<()> {
    let path = path.as_ref();
    let mut serializer = BinarySerializer::open(SerializerAction::Write, path)?;
    serializer.serialize(&mut effect.clone())?;
    serializer.finish()?;
    debug!(path = %path.display(), effect = %effect.name, "wrote effect binary");
    Ok(())
}

/// Read an effect previously written by [`save_effect`].
pub fn load_effect(path: impl AsRef<Path>) -> Result<ShaderEffect> {
    let mut serializer = BinarySerializer::open(SerializerAction::Read, path)?;
    let mut effect = ShaderEffect::default();
    serializer.serialize(&mut effect)?;
    serializer.finish()?;
    Ok(effect)
}

/// Encode `effect` into memory.
pub fn to_bytes(effect: &ShaderEffect) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let mut serializer = BinarySerializer::from_writer(&mut bytes);
    serializer.serialize(&mut effect.clone())?;
    serializer.finish()?;
    Ok(bytes)
}

/// Decode an effect from an in-memory blob, such as one embedded with
/// `include_bytes!`.
pub fn from_bytes(bytes: &[u8]) -> Result<ShaderEffect> {
    let mut effect = ShaderEffect::default();
    BinarySerializer::from_reader(bytes).serialize(&mut effect)?;
    Ok(effect)
}
