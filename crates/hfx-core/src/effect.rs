//! The effect description produced by the parser.
//!
//! Every string in here is owned: nothing borrows from the source text the
//! effect was parsed from, so a [`ShaderEffect`] can outlive its `.hfx` buffer,
//! be written to disk and be read back.

use std::fmt;

use num_derive::{FromPrimitive, ToPrimitive};

use crate::properties::Property;

/// Sentinel for an index that does not point anywhere (unresolved code chunk,
/// missing render state).
pub const INVALID_INDEX: u32 = u32::MAX;

/// Value stored in an include flag when no stage conditional is active.
pub const NO_STAGE_FLAG: u32 = ShaderStage::COUNT as u32;

/// Bit set in an include flag when the include came from `#pragma include_hfx`.
pub const LOCAL_HFX_INCLUDE_FLAG: u32 = 0x10;

const STAGE_NAMES: [&str; ShaderStage::COUNT] =
    ["VERTEX", "FRAGMENT", "GEOMETRY", "COMPUTE", "HULL", "DOMAIN"];
const STAGE_POSTFIXES: [&str; ShaderStage::COUNT] = ["vt", "fg", "gm", "cp", "hl", "dm"];

/// Pipeline stage a shader runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum ShaderStage {
    #[default]
    Vertex = 0,
    Fragment,
    Geometry,
    Compute,
    Hull,
    Domain,
}

impl ShaderStage {
    pub const COUNT: usize = 6;

    /// Name used in the generated `#define` line.
    pub fn define_name(self) -> &'static str {
        STAGE_NAMES[self as usize]
    }

    /// Short postfix used in generated file names.
    pub fn postfix(self) -> &'static str {
        STAGE_POSTFIXES[self as usize]
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderStage::Vertex => "Vertex",
            ShaderStage::Fragment => "Fragment",
            ShaderStage::Geometry => "Geometry",
            ShaderStage::Compute => "Compute",
            ShaderStage::Hull => "Hull",
            ShaderStage::Domain => "Domain",
        };
        f.write_str(name)
    }
}

/// Kind of GPU resource a code chunk binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum ResourceType {
    #[default]
    Sampler = 0,
    Texture,
    TextureRW,
    Constants,
    Buffer,
    BufferRW,
}

/// A resource binding mined from a `uniform` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resource {
    pub kind: ResourceType,
    pub name: String,
}

/// A named block of opaque shading-language text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeChunk {
    pub name: String,
    /// Names referenced by `#pragma include` / `#pragma include_hfx`.
    pub includes: Vec<String>,
    /// One flag per include: active stage (or [`NO_STAGE_FLAG`]), plus
    /// [`LOCAL_HFX_INCLUDE_FLAG`] for effect-local includes.
    pub include_flags: Vec<u32>,
    pub resources: Vec<Resource>,
    pub code: String,
}

/// One stage of a pass and the code chunk compiled for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shader {
    pub stage: ShaderStage,
    /// Index into [`ShaderEffect::code_chunks`], or [`INVALID_INDEX`].
    pub code_chunk: u32,
}

impl Shader {
    pub fn new(stage: ShaderStage) -> Self {
        Self {
            stage,
            code_chunk: INVALID_INDEX,
        }
    }

    pub fn code_chunk_index(&self) -> Option<usize> {
        (self.code_chunk != INVALID_INDEX).then_some(self.code_chunk as usize)
    }
}

impl Default for Shader {
    fn default() -> Self {
        Self::new(ShaderStage::Vertex)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum PassKind {
    #[default]
    Graphics = 0,
    Compute,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pass {
    pub name: String,
    pub shaders: Vec<Shader>,
    pub resource_lists: Vec<u32>,
    pub render_state: u32,
    pub kind: PassKind,
}

impl Pass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shaders: Vec::new(),
            resource_lists: Vec::new(),
            render_state: INVALID_INDEX,
            kind: PassKind::Graphics,
        }
    }
}

impl Default for Pass {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// A list of resources bound together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceList {
    pub resources: Vec<Resource>,
}

/// Fixed-function state a pass renders with. Only named for now; the parser
/// never produces one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderState {
    pub name: String,
}

/// Everything compiled from one `.hfx` file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShaderEffect {
    pub name: String,
    pub passes: Vec<Pass>,
    pub code_chunks: Vec<CodeChunk>,
    pub resource_lists: Vec<ResourceList>,
    pub render_states: Vec<RenderState>,
    pub properties: Vec<Property>,
}

impl ShaderEffect {
    /// Linear lookup of a code chunk by name.
    pub fn find_code_chunk(&self, name: &str) -> Option<usize> {
        self.code_chunks.iter().position(|chunk| chunk.name == name)
    }

    pub fn code_chunk(&self, shader: &Shader) -> Option<&CodeChunk> {
        shader
            .code_chunk_index()
            .and_then(|index| self.code_chunks.get(index))
    }
}

impl fmt::Display for ShaderEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Effect: {}", self.name)?;
        for chunk in &self.code_chunks {
            writeln!(f, "CodeChunk: {}", chunk.name)?;
            for (include, flag) in chunk.includes.iter().zip(&chunk.include_flags) {
                writeln!(f, "  Include: {include} (flags {flag:#x})")?;
            }
            for resource in &chunk.resources {
                writeln!(f, "  Resource: {:?} {}", resource.kind, resource.name)?;
            }
            writeln!(f, "  Code: {}", chunk.code)?;
        }
        for pass in &self.passes {
            writeln!(f, "Pass: {} ({:?})", pass.name, pass.kind)?;
            for shader in &pass.shaders {
                match self.code_chunk(shader) {
                    Some(chunk) => writeln!(f, "  {} --- {}", shader.stage, chunk.name)?,
                    None => writeln!(f, "  {} --- <unresolved>", shader.stage)?,
                }
            }
        }
        for property in &self.properties {
            writeln!(
                f,
                "Property: {} \"{}\" {:?}",
                property.name, property.ui_name, property.data
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::PropertyKind;

    #[test]
    fn stage_tables_follow_enum_order() {
        assert_eq!(ShaderStage::Vertex.define_name(), "VERTEX");
        assert_eq!(ShaderStage::Vertex.postfix(), "vt");
        assert_eq!(ShaderStage::Fragment.postfix(), "fg");
        assert_eq!(ShaderStage::Compute.define_name(), "COMPUTE");
        assert_eq!(ShaderStage::Compute.postfix(), "cp");
        assert_eq!(ShaderStage::Domain.postfix(), "dm");
    }

    #[test]
    fn unresolved_shader_has_no_chunk() {
        let effect = ShaderEffect::default();
        let shader = Shader::new(ShaderStage::Vertex);
        assert_eq!(shader.code_chunk_index(), None);
        assert!(effect.code_chunk(&shader).is_none());
    }

    #[test]
    fn find_code_chunk_is_exact() {
        let effect = ShaderEffect {
            code_chunks: vec![
                CodeChunk {
                    name: "Blur".into(),
                    ..Default::default()
                },
                CodeChunk {
                    name: "BlurH".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(effect.find_code_chunk("BlurH"), Some(1));
        assert_eq!(effect.find_code_chunk("Blu"), None);
    }

    #[test]
    fn display_dumps_every_section() {
        let mut pass = Pass::new("Main");
        pass.shaders.push(Shader {
            stage: ShaderStage::Vertex,
            code_chunk: 0,
        });
        pass.shaders.push(Shader::new(ShaderStage::Fragment));

        let effect = ShaderEffect {
            name: "Blit".into(),
            passes: vec![pass],
            code_chunks: vec![CodeChunk {
                name: "Copy".into(),
                includes: vec!["Common".into()],
                include_flags: vec![LOCAL_HFX_INCLUDE_FLAG],
                resources: vec![Resource {
                    kind: ResourceType::Texture,
                    name: "source".into(),
                }],
                code: "void main() { }".into(),
            }],
            properties: vec![Property::new("gain", "Gain", PropertyKind::Float)],
            ..Default::default()
        };

        let dump = effect.to_string();
        let lines: Vec<_> = dump.lines().collect();
        assert_eq!(lines[0], "Effect: Blit");
        assert_eq!(lines[1], "CodeChunk: Copy");
        assert_eq!(lines[2], format!("  Include: Common (flags {LOCAL_HFX_INCLUDE_FLAG:#x})"));
        assert_eq!(lines[3], "  Resource: Texture source");
        assert_eq!(lines[4], "  Code: void main() { }");
        assert_eq!(lines[5], "Pass: Main (Graphics)");
        assert_eq!(lines[6], "  Vertex --- Copy");
        assert_eq!(lines[7], "  Fragment --- <unresolved>");
        assert_eq!(lines[8], "Property: gain \"Gain\" Float { default: 0.0 }");
    }
}
