//! GLSL version header selection.

/// GLSL targets the generator can stamp on stage files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlslVersion {
    #[default]
    Glsl330Core,
    Glsl430,
    Glsl450,
    Glsl460,
}

impl GlslVersion {
    /// First line of every generated stage file.
    pub fn header(self) -> &'static str {
        match self {
            GlslVersion::Glsl330Core => "#version 330 core",
            GlslVersion::Glsl430 => "#version 430",
            GlslVersion::Glsl450 => "#version 450",
            GlslVersion::Glsl460 => "#version 460",
        }
    }

    /// Parse a version number as given on the command line (`330`, `460`).
    pub fn from_number(number: &str) -> Option<Self> {
        match number {
            "330" => Some(GlslVersion::Glsl330Core),
            "430" => Some(GlslVersion::Glsl430),
            "450" => Some(GlslVersion::Glsl450),
            "460" => Some(GlslVersion::Glsl460),
            _ => None,
        }
    }

    /// Whether the version has `layout(binding = N)` on uniform blocks.
    pub fn supports_explicit_binding(self) -> bool {
        !matches!(self, GlslVersion::Glsl330Core)
    }
}
