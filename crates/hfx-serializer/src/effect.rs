//! [`Serializable`] for the effect model. Field order here is the file
//! format; changing it breaks every existing blob.

use hfx_core::{
    CodeChunk, Pass, Property, PropertyData, RenderState, Resource, ResourceList, Result,
    Shader, ShaderEffect,
};

use crate::{BinarySerializer, Serializable};

impl Serializable for Resource {
    fn serialize(&mut self, s: &mut BinarySerializer<'_>) -> Result<()> {
        s.serialize(&mut self.kind)?;
        s.serialize(&mut self.name)
    }
}

impl Serializable for CodeChunk {
    fn serialize(&mut self, s: &mut BinarySerializer<'_>) -> Result<()> {
        s.serialize(&mut self.name)?;
        s.serialize(&mut self.includes)?;
        s.serialize(&mut self.include_flags)?;
        s.serialize(&mut self.resources)?;
        s.serialize(&mut self.code)
    }
}

impl Serializable for Shader {
    fn serialize(&mut self, s: &mut BinarySerializer<'_>) -> Result<()> {
        s.serialize(&mut self.stage)?;
        s.serialize(&mut self.code_chunk)
    }
}

impl Serializable for Pass {
    fn serialize(&mut self, s: &mut BinarySerializer<'_>) -> Result<()> {
        s.serialize(&mut self.name)?;
        s.serialize(&mut self.shaders)?;
        s.serialize(&mut self.resource_lists)?;
        s.serialize(&mut self.render_state)?;
        s.serialize(&mut self.kind)
    }
}

impl Serializable for ResourceList {
    fn serialize(&mut self, s: &mut BinarySerializer<'_>) -> Result<()> {
        s.serialize(&mut self.resources)
    }
}

impl Serializable for RenderState {
    fn serialize(&mut self, s: &mut BinarySerializer<'_>) -> Result<()> {
        s.serialize(&mut self.name)
    }
}

/// The kind tag goes first so a reader can build the right payload before
/// decoding it.
impl Serializable for Property {
    fn serialize(&mut self, s: &mut BinarySerializer<'_>) -> Result<()> {
        s.serialize(&mut self.name)?;
        s.serialize(&mut self.ui_name)?;

        let mut kind = self.kind();
        s.serialize(&mut kind)?;
        if s.is_reading() {
            self.data = PropertyData::empty(kind);
        }

        match &mut self.data {
            PropertyData::Float { default } => s.serialize(default),
            PropertyData::Int { default } => s.serialize(default),
            PropertyData::Range { min, max, default } => {
                s.serialize(min)?;
                s.serialize(max)?;
                s.serialize(default)
            }
            PropertyData::Texture { default, .. } => s.serialize(default),
            PropertyData::Color | PropertyData::Vector | PropertyData::Unknown => Ok(()),
        }
    }
}

impl Serializable for ShaderEffect {
    fn serialize(&mut self, s: &mut BinarySerializer<'_>) -> Result<()> {
        s.serialize(&mut self.name)?;
        s.serialize(&mut self.passes)?;
        s.serialize(&mut self.code_chunks)?;
        s.serialize(&mut self.resource_lists)?;
        s.serialize(&mut self.render_states)?;
        s.serialize(&mut self.properties)
    }
}
