//! Per-stage GLSL file generation.
//!
//! Every shader of every pass becomes `<chunk>_<postfix>.glsl`: the version
//! header, a `#define <STAGE>` line, then the chunk code verbatim. Unresolved
//! code chunk references, tolerated by the parser, are fatal here; they are
//! all checked before the first file is written.

use std::path::{Path, PathBuf};

use hfx_core::{CodeChunk, HfxError, Result, ShaderEffect, ShaderStage};
use tracing::{debug, info};

use crate::glsl::GlslVersion;

/// One stage file to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSource {
    pub file_name: String,
    pub source: String,
}

pub struct ShaderGenerator<'a> {
    effect: &'a ShaderEffect,
    version: GlslVersion,
}

impl<'a> ShaderGenerator<'a> {
    pub fn new(effect: &'a ShaderEffect) -> Self {
        Self {
            effect,
            version: GlslVersion::default(),
        }
    }

    pub fn with_version(mut self, version: GlslVersion) -> Self {
        self.version = version;
        self
    }

    /// Render every stage file in memory, in pass then shader order.
    pub fn stage_sources(&self) -> Result<Vec<StageSource>> {
        let mut sources = Vec::new();
        for pass in &self.effect.passes {
            for shader in &pass.shaders {
                let chunk = self.effect.code_chunk(shader).ok_or_else(|| {
                    HfxError::UnresolvedCodeChunk {
                        pass: pass.name.clone(),
                        stage: shader.stage.to_string(),
                        index: shader.code_chunk,
                    }
                })?;
                sources.push(StageSource {
                    file_name: stage_file_name(chunk, shader.stage),
                    source: self.stage_source(chunk, shader.stage),
                });
            }
        }
        Ok(sources)
    }

    pub fn stage_source(&self, chunk: &CodeChunk, stage: ShaderStage) -> String {
        format!(
            "{}\n#define {}\n{}",
            self.version.header(),
            stage.define_name(),
            chunk.code
        )
    }

    /// Write every stage file under `output_dir`, creating it if needed.
    pub fn generate(&self, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let sources = self.stage_sources()?;
        std::fs::create_dir_all(output_dir).map_err(|source| HfxError::Open {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(sources.len());
        for stage in sources {
            let path = output_dir.join(&stage.file_name);
            std::fs::write(&path, stage.source).map_err(|source| HfxError::Open {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "wrote stage file");
            written.push(path);
        }

        info!(
            effect = %self.effect.name,
            files = written.len(),
            dir = %output_dir.display(),
            "generated shaders"
        );
        Ok(written)
    }
}

/// `<chunk>_<postfix>.glsl`
pub fn stage_file_name(chunk: &CodeChunk, stage: ShaderStage) -> String {
    format!("{}_{}.glsl", chunk.name, stage.postfix())
}
