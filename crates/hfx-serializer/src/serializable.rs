//! The [`Serializable`] trait and its implementations for primitives.
//!
//! Scalars are copied as little-endian bytes. Strings and sequences carry a
//! 32-bit length prefix. Enums travel as their `u32` discriminant.

use hfx_core::{HfxError, PassKind, PropertyKind, ResourceType, Result, ShaderStage};
use num_traits::{FromPrimitive, ToPrimitive};

use crate::BinarySerializer;

/// A value that can be written to, or read back from, a [`BinarySerializer`].
///
/// The same call does both: when the serializer is reading, `self` is
/// overwritten with the decoded value.
pub trait Serializable {
    fn serialize(&mut self, s: &mut BinarySerializer<'_>) -> Result<()>;
}

macro_rules! serializable_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Serializable for $ty {
                fn serialize(&mut self, s: &mut BinarySerializer<'_>) -> Result<()> {
                    let mut bytes = self.to_le_bytes();
                    s.bytes(&mut bytes)?;
                    *self = <$ty>::from_le_bytes(bytes);
                    Ok(())
                }
            }
        )*
    };
}

serializable_scalar!(u8, u16, u32, u64, i32, i64, f32, f64);

impl Serializable for bool {
    fn serialize(&mut self, s: &mut BinarySerializer<'_>) -> Result<()> {
        let mut byte = u8::from(*self);
        byte.serialize(s)?;
        *self = byte != 0;
        Ok(())
    }
}

impl Serializable for String {
    fn serialize(&mut self, s: &mut BinarySerializer<'_>) -> Result<()> {
        let len = s.length(self.len())?;
        if s.is_reading() {
            let mut bytes = vec![0; len];
            s.bytes(&mut bytes)?;
            *self = String::from_utf8(bytes)?;
        } else {
            let mut bytes = std::mem::take(self).into_bytes();
            let result = s.bytes(&mut bytes);
            *self = String::from_utf8(bytes)?;
            result?;
        }
        Ok(())
    }
}

/// Upper bound on slots reserved ahead of reading, so a corrupt count cannot
/// allocate unbounded memory before the stream runs dry.
const MAX_PREALLOCATED: usize = 1024;

impl<T: Serializable + Default> Serializable for Vec<T> {
    fn serialize(&mut self, s: &mut BinarySerializer<'_>) -> Result<()> {
        let count = s.length(self.len())?;
        if s.is_reading() {
            self.clear();
            self.reserve(count.min(MAX_PREALLOCATED));
            for _ in 0..count {
                let mut item = T::default();
                item.serialize(s)?;
                self.push(item);
            }
        } else {
            for item in self.iter_mut() {
                item.serialize(s)?;
            }
        }
        Ok(())
    }
}

/// Serialize an enum through its `u32` discriminant.
pub fn serialize_enum<E>(
    value: &mut E,
    what: &'static str,
    s: &mut BinarySerializer<'_>,
) -> Result<()>
where
    E: FromPrimitive + ToPrimitive,
{
    let mut raw = value
        .to_u32()
        .ok_or(HfxError::InvalidDiscriminant { what, value: u32::MAX })?;
    raw.serialize(s)?;
    *value = E::from_u32(raw).ok_or(HfxError::InvalidDiscriminant { what, value: raw })?;
    Ok(())
}

macro_rules! serializable_enum {
    ($($ty:ty => $what:literal),* $(,)?) => {
        $(
            impl Serializable for $ty {
                fn serialize(&mut self, s: &mut BinarySerializer<'_>) -> Result<()> {
                    serialize_enum(self, $what, s)
                }
            }
        )*
    };
}

serializable_enum!(
    ShaderStage => "shader stage",
    ResourceType => "resource type",
    PassKind => "pass kind",
    PropertyKind => "property kind",
);

#[cfg(test)]
mod tests {
    use super::*;

    fn written<T: Serializable>(mut value: T) -> Vec<u8> {
        let mut out = Vec::new();
        let mut s = BinarySerializer::from_writer(&mut out);
        s.serialize(&mut value).unwrap();
        s.finish().unwrap();
        out
    }

    fn read<T: Serializable + Default>(bytes: &[u8]) -> Result<T> {
        let mut value = T::default();
        BinarySerializer::from_reader(bytes).serialize(&mut value)?;
        Ok(value)
    }

    #[test]
    fn scalars_are_little_endian() {
        assert_eq!(written(0x1234_5678u32), [0x78, 0x56, 0x34, 0x12]);
        assert_eq!(written(-1i32), [0xff; 4]);
        assert_eq!(written(1.0f32), 1.0f32.to_le_bytes());
        assert_eq!(read::<f64>(&2.5f64.to_le_bytes()).unwrap(), 2.5);
    }

    #[test]
    fn strings_are_length_prefixed() {
        assert_eq!(written(String::from("Tex")), [3, 0, 0, 0, b'T', b'e', b'x']);
        assert_eq!(read::<String>(&[2, 0, 0, 0, b'o', b'k']).unwrap(), "ok");
        assert_eq!(read::<String>(&[0, 0, 0, 0]).unwrap(), "");
    }

    #[test]
    fn writing_a_string_leaves_it_intact() {
        let mut value = String::from("keep");
        let mut out = Vec::new();
        BinarySerializer::from_writer(&mut out)
            .serialize(&mut value)
            .unwrap();
        assert_eq!(value, "keep");
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = read::<String>(&[1, 0, 0, 0, 0xff]).unwrap_err();
        assert!(matches!(err, HfxError::InvalidUtf8(_)));
    }

    #[test]
    fn vectors_are_count_prefixed() {
        let bytes = written(vec![7u32, 9]);
        assert_eq!(bytes, [2, 0, 0, 0, 7, 0, 0, 0, 9, 0, 0, 0]);
        assert_eq!(read::<Vec<u32>>(&bytes).unwrap(), [7, 9]);
        assert!(read::<Vec<u32>>(&[0, 0, 0, 0]).unwrap().is_empty());
    }

    #[test]
    fn corrupt_count_fails_without_huge_allocation() {
        let err = read::<Vec<u64>>(&[0xff, 0xff, 0xff, 0x7f, 1]).unwrap_err();
        assert!(matches!(err, HfxError::Io(_)));
    }

    #[test]
    fn enums_travel_as_discriminants() {
        assert_eq!(written(ShaderStage::Compute), [3, 0, 0, 0]);
        assert_eq!(read::<ResourceType>(&[2, 0, 0, 0]).unwrap(), ResourceType::TextureRW);
        let err = read::<ShaderStage>(&[9, 0, 0, 0]).unwrap_err();
        assert!(matches!(
            err,
            HfxError::InvalidDiscriminant { what: "shader stage", value: 9 }
        ));
    }
}
