//! User-tunable effect properties.
//!
//! A property is a name, a UI label and a [`PropertyData`] payload. The payload
//! variant doubles as the type tag, so consumers match on it directly.

use num_derive::{FromPrimitive, ToPrimitive};

/// Type tag of a property, as written in `.hfx` source and in binary blobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum PropertyKind {
    Float = 0,
    Int,
    Range,
    Color,
    Vector,
    Texture1D,
    Texture2D,
    Texture3D,
    TextureVolume,
    Unknown,
}

impl PropertyKind {
    /// Classify a type token. Matches the whole token, never a prefix.
    pub fn from_type_token(text: &str) -> Self {
        match text {
            "Float" => PropertyKind::Float,
            "Int" => PropertyKind::Int,
            "Range" => PropertyKind::Range,
            "Color" => PropertyKind::Color,
            "Vector" => PropertyKind::Vector,
            "1D" => PropertyKind::Texture1D,
            "2D" => PropertyKind::Texture2D,
            "3D" => PropertyKind::Texture3D,
            "Volume" => PropertyKind::TextureVolume,
            _ => PropertyKind::Unknown,
        }
    }

    pub fn texture_dimension(self) -> Option<TextureDimension> {
        match self {
            PropertyKind::Texture1D => Some(TextureDimension::D1),
            PropertyKind::Texture2D => Some(TextureDimension::D2),
            PropertyKind::Texture3D => Some(TextureDimension::D3),
            PropertyKind::TextureVolume => Some(TextureDimension::Volume),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureDimension {
    D1,
    D2,
    D3,
    Volume,
}

impl TextureDimension {
    pub fn kind(self) -> PropertyKind {
        match self {
            TextureDimension::D1 => PropertyKind::Texture1D,
            TextureDimension::D2 => PropertyKind::Texture2D,
            TextureDimension::D3 => PropertyKind::Texture3D,
            TextureDimension::Volume => PropertyKind::TextureVolume,
        }
    }
}

/// Kind-specific payload of a property.
///
/// `Color` and `Vector` are recognized but carry no default yet.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PropertyData {
    Float { default: f32 },
    Int { default: i32 },
    Range { min: f32, max: f32, default: f32 },
    Color,
    Vector,
    Texture {
        dimension: TextureDimension,
        default: String,
    },
    #[default]
    Unknown,
}

impl PropertyData {
    /// Payload with zeroed defaults for `kind`.
    pub fn empty(kind: PropertyKind) -> Self {
        match kind {
            PropertyKind::Float => PropertyData::Float { default: 0.0 },
            PropertyKind::Int => PropertyData::Int { default: 0 },
            PropertyKind::Range => PropertyData::Range {
                min: 0.0,
                max: 1.0,
                default: 0.0,
            },
            PropertyKind::Color => PropertyData::Color,
            PropertyKind::Vector => PropertyData::Vector,
            PropertyKind::Texture1D
            | PropertyKind::Texture2D
            | PropertyKind::Texture3D
            | PropertyKind::TextureVolume => PropertyData::Texture {
                dimension: kind.texture_dimension().unwrap_or(TextureDimension::D2),
                default: String::new(),
            },
            PropertyKind::Unknown => PropertyData::Unknown,
        }
    }

    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyData::Float { .. } => PropertyKind::Float,
            PropertyData::Int { .. } => PropertyKind::Int,
            PropertyData::Range { .. } => PropertyKind::Range,
            PropertyData::Color => PropertyKind::Color,
            PropertyData::Vector => PropertyKind::Vector,
            PropertyData::Texture { dimension, .. } => dimension.kind(),
            PropertyData::Unknown => PropertyKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Property {
    pub name: String,
    pub ui_name: String,
    pub data: PropertyData,
}

impl Property {
    pub fn new(name: impl Into<String>, ui_name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            ui_name: ui_name.into(),
            data: PropertyData::empty(kind),
        }
    }

    pub fn kind(&self) -> PropertyKind {
        self.data.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tokens_classify() {
        assert_eq!(PropertyKind::from_type_token("Float"), PropertyKind::Float);
        assert_eq!(PropertyKind::from_type_token("2D"), PropertyKind::Texture2D);
        assert_eq!(PropertyKind::from_type_token("Range"), PropertyKind::Range);
        assert_eq!(
            PropertyKind::from_type_token("Volume"),
            PropertyKind::TextureVolume
        );
        assert_eq!(PropertyKind::from_type_token("Floaty"), PropertyKind::Unknown);
        assert_eq!(PropertyKind::from_type_token("Flo"), PropertyKind::Unknown);
        assert_eq!(PropertyKind::from_type_token("4D"), PropertyKind::Unknown);
    }

    #[test]
    fn empty_payload_round_trips_kind() {
        let kinds = [
            PropertyKind::Float,
            PropertyKind::Int,
            PropertyKind::Range,
            PropertyKind::Color,
            PropertyKind::Vector,
            PropertyKind::Texture1D,
            PropertyKind::Texture2D,
            PropertyKind::Texture3D,
            PropertyKind::TextureVolume,
            PropertyKind::Unknown,
        ];
        for kind in kinds {
            assert_eq!(PropertyData::empty(kind).kind(), kind);
        }
    }
}
