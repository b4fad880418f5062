//! `LocalConstants` uniform block built from an effect's properties.
//!
//! Each `Float` property becomes one `float` member; other kinds are skipped.
//! The block is padded with `pad_tail` so its size in floats is a multiple of
//! four (one `vec4` slot under std140).

use hfx_core::{PropertyData, Result, ShaderEffect};
use hfx_serializer::BinarySerializer;

/// Binding slot of the generated block.
pub const LOCAL_CONSTANTS_BINDING: u32 = 7;

/// Generated uniform block plus the matching default values.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalConstants {
    /// GLSL block text, empty when the effect has no properties.
    pub glsl: String,
    /// Float slots in block order (member defaults, then zeroed padding).
    pub defaults: Vec<f32>,
}

/// Trailing floats needed after `floats` members. Always in `1..=4`.
pub fn tail_padding(floats: usize) -> usize {
    4 - floats % 4
}

pub fn generate_local_constants(effect: &ShaderEffect) -> LocalConstants {
    if effect.properties.is_empty() {
        return LocalConstants {
            glsl: String::new(),
            defaults: Vec::new(),
        };
    }

    let mut glsl = format!(
        "layout(std140, binding={LOCAL_CONSTANTS_BINDING}) uniform LocalConstants {{\n"
    );
    let mut defaults = Vec::new();
    for property in &effect.properties {
        match property.data {
            PropertyData::Float { default } => {
                glsl.push_str(&format!("\tfloat {};\n", property.name));
                defaults.push(default);
            }
            PropertyData::Int { .. }
            | PropertyData::Range { .. }
            | PropertyData::Color
            | PropertyData::Vector
            | PropertyData::Texture { .. }
            | PropertyData::Unknown => {}
        }
    }

    let padding = tail_padding(defaults.len());
    glsl.push_str(&format!("\tfloat pad_tail[{padding}];\n}};\n"));
    defaults.resize(defaults.len() + padding, 0.0);

    LocalConstants { glsl, defaults }
}

impl LocalConstants {
    /// Size of the block in bytes.
    pub fn byte_size(&self) -> u32 {
        (self.defaults.len() * std::mem::size_of::<f32>()) as u32
    }

    /// `u32` byte size followed by every slot as little-endian `f32`. A
    /// block-less effect encodes as just the `u32` zero.
    pub fn defaults_blob(&self) -> Result<Vec<u8>> {
        let mut blob = Vec::with_capacity(4 + self.defaults.len() * 4);
        let mut serializer = BinarySerializer::from_writer(&mut blob);
        serializer.serialize(&mut self.byte_size())?;
        for value in &self.defaults {
            serializer.serialize(&mut value.clone())?;
        }
        serializer.finish()?;
        Ok(blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hfx_core::{Property, PropertyKind};

    fn float(name: &str, default: f32) -> Property {
        let mut property = Property::new(name, name, PropertyKind::Float);
        property.data = PropertyData::Float { default };
        property
    }

    #[test]
    fn padding_completes_a_vec4() {
        for floats in 0..12 {
            let pad = tail_padding(floats);
            assert!((1..=4).contains(&pad));
            assert_eq!((floats + pad) % 4, 0);
        }
        assert_eq!(tail_padding(4), 4);
    }

    #[test]
    fn no_properties_yields_zero_marker() {
        let constants = generate_local_constants(&ShaderEffect::default());
        assert!(constants.glsl.is_empty());
        assert_eq!(constants.defaults_blob().unwrap(), [0, 0, 0, 0]);
    }

    #[test]
    fn float_properties_become_members() {
        let effect = ShaderEffect {
            properties: vec![
                float("scale", 2.0),
                Property::new("count", "Count", PropertyKind::Int),
                float("bias", 0.5),
            ],
            ..Default::default()
        };
        let constants = generate_local_constants(&effect);
        assert_eq!(
            constants.glsl,
            "layout(std140, binding=7) uniform LocalConstants {\n\
             \tfloat scale;\n\
             \tfloat bias;\n\
             \tfloat pad_tail[2];\n\
             };\n"
        );
        assert_eq!(constants.defaults, [2.0, 0.5, 0.0, 0.0]);
        assert_eq!(constants.byte_size(), 16);

        let blob = constants.defaults_blob().unwrap();
        assert_eq!(&blob[..4], &16u32.to_le_bytes());
        assert_eq!(&blob[4..8], &2.0f32.to_le_bytes());
        assert_eq!(blob.len(), 4 + 16);
    }

    #[test]
    fn non_float_properties_still_get_a_padded_block() {
        let effect = ShaderEffect {
            properties: vec![Property::new("tex", "Tex", PropertyKind::Texture2D)],
            ..Default::default()
        };
        let constants = generate_local_constants(&effect);
        assert!(constants.glsl.contains("float pad_tail[4];"));
        assert_eq!(constants.defaults.len(), 4);
    }
}
