//! Fullscreen triangle demo.
//!
//! `build.rs` compiles `effects/fullscreen.hfx`; this crate embeds the stage
//! files and the effect binary and exposes them to a renderer.

use anyhow::{Context, Result};
use hfx::ShaderEffect;

const EFFECT_BYTES: &[u8] = hfx::include_hfx_binary!("fullscreen");

const STAGE_SOURCES: &[(&str, &str)] = &[
    ("Triangle_vt", hfx::include_hfx_shader!("fullscreen", "Triangle_vt")),
    ("Triangle_fg", hfx::include_hfx_shader!("fullscreen", "Triangle_fg")),
];

const LOCAL_CONSTANTS: &str = hfx::include_hfx_shader!("fullscreen", "Fullscreen_constants");

/// Compiled effect plus the GLSL text for each of its stages.
pub struct FullscreenEffect {
    pub effect: ShaderEffect,
    pub local_constants: &'static str,
}

impl FullscreenEffect {
    pub fn load() -> Result<Self> {
        let effect = hfx::load_effect_bytes(EFFECT_BYTES)?;
        Ok(Self {
            effect,
            local_constants: LOCAL_CONSTANTS,
        })
    }

    /// GLSL source for one stage file stem (`<chunk>_<postfix>`).
    pub fn stage_source(&self, stem: &str) -> Result<&'static str> {
        STAGE_SOURCES
            .iter()
            .find(|(name, _)| *name == stem)
            .map(|(_, source)| *source)
            .with_context(|| format!("No generated stage named {stem}"))
    }

    /// Sources for every shader of the named pass, in declaration order.
    pub fn pass_sources(&self, pass_name: &str) -> Result<Vec<&'static str>> {
        let pass = self
            .effect
            .passes
            .iter()
            .find(|pass| pass.name == pass_name)
            .with_context(|| format!("Effect has no pass {pass_name}"))?;

        pass.shaders
            .iter()
            .map(|shader| {
                let chunk = self
                    .effect
                    .code_chunk(shader)
                    .with_context(|| format!("Pass {pass_name} has an unresolved stage"))?;
                let stem = hfx::stage_file_name(chunk, shader.stage);
                self.stage_source(stem.trim_end_matches(".glsl"))
            })
            .collect()
    }
}
