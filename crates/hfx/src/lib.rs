//! HFX shader effect compiler.
//!
//! This crate ties together [`hfx_core`] (effect model), [`hfx_parser`]
//! (lexer and parser) and [`hfx_serializer`] (binary blobs) into one compile
//! step: `.hfx` source in, per-stage GLSL files and an effect binary out.
//!
//! # Overview
//!
//! - [`compile_hfx`] runs the whole pipeline for one file.
//! - [`ShaderGenerator`] writes the per-stage GLSL files.
//! - [`generate_local_constants`] builds the `LocalConstants` uniform block.
//! - [`load_effect`] / [`load_effect_bytes`] restore a compiled effect.
//! - [`build_support`] compiles effects from a `build.rs`.

pub mod build_support;
pub mod constants;
pub mod generator;
pub mod glsl;

pub use constants::{generate_local_constants, tail_padding, LocalConstants};
pub use generator::{stage_file_name, ShaderGenerator, StageSource};
pub use glsl::GlslVersion;
pub use hfx_core::{logging::init_logging, HfxError, LiteralCapacity, ShaderEffect};

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

/// Settings for [`compile_hfx`].
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Directory receiving the stage files.
    pub output_dir: PathBuf,
    /// Where to write the effect binary, if anywhere.
    pub binary_path: Option<PathBuf>,
    pub glsl_version: GlslVersion,
    /// Fail on structural parse errors instead of compiling what was read.
    pub strict: bool,
    /// Also write `<effect>_constants.glsl` and `<effect>_defaults.bin`.
    pub emit_local_constants: bool,
    pub literal_capacity: LiteralCapacity,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            binary_path: None,
            glsl_version: GlslVersion::default(),
            strict: false,
            emit_local_constants: false,
            literal_capacity: LiteralCapacity::default(),
        }
    }
}

/// What one [`compile_hfx`] call produced.
#[derive(Debug)]
pub struct CompiledEffect {
    pub effect: ShaderEffect,
    pub stage_files: Vec<PathBuf>,
    pub binary_path: Option<PathBuf>,
    /// First structural parse error, when compiling leniently.
    pub parse_error: Option<HfxError>,
}

/// Compile `path` according to `options`.
pub fn compile_hfx(path: impl AsRef<Path>, options: &CompileOptions) -> Result<CompiledEffect> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read HFX source {}", path.display()))?;

    let output = hfx_parser::parse_effect_with(&source, options.literal_capacity)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let parse_error = output.error.map(HfxError::from);
    if let Some(err) = &parse_error {
        if options.strict {
            bail!("{}: {err}", path.display());
        }
        warn!(file = %path.display(), "{err}; compiling the declarations read so far");
    }
    let effect = output.effect;

    let stage_files = ShaderGenerator::new(&effect)
        .with_version(options.glsl_version)
        .generate(&options.output_dir)
        .with_context(|| format!("Failed to generate shaders for {}", path.display()))?;

    if options.emit_local_constants {
        write_local_constants(&effect, options)?;
    }

    if let Some(binary_path) = &options.binary_path {
        hfx_serializer::save_effect(binary_path, &effect)
            .with_context(|| format!("Failed to write {}", binary_path.display()))?;
    }

    info!(
        file = %path.display(),
        effect = %effect.name,
        stages = stage_files.len(),
        "compiled effect"
    );

    Ok(CompiledEffect {
        effect,
        stage_files,
        binary_path: options.binary_path.clone(),
        parse_error,
    })
}

fn write_local_constants(effect: &ShaderEffect, options: &CompileOptions) -> Result<()> {
    if !options.glsl_version.supports_explicit_binding() {
        warn!(
            version = options.glsl_version.header(),
            "uniform block binding qualifier needs GLSL 4.20 or an extension"
        );
    }

    let constants = generate_local_constants(effect);
    let glsl_path = options
        .output_dir
        .join(format!("{}_constants.glsl", effect.name));
    std::fs::write(&glsl_path, &constants.glsl)
        .with_context(|| format!("Failed to write {}", glsl_path.display()))?;

    let defaults_path = options
        .output_dir
        .join(format!("{}_defaults.bin", effect.name));
    std::fs::write(&defaults_path, constants.defaults_blob()?)
        .with_context(|| format!("Failed to write {}", defaults_path.display()))?;
    Ok(())
}

/// Restore an effect from a binary written by [`compile_hfx`].
pub fn load_effect(path: impl AsRef<Path>) -> Result<ShaderEffect> {
    let path = path.as_ref();
    hfx_serializer::load_effect(path)
        .with_context(|| format!("Failed to load effect binary {}", path.display()))
}

/// Restore an effect from embedded binary bytes.
pub fn load_effect_bytes(bytes: &[u8]) -> Result<ShaderEffect> {
    hfx_serializer::from_bytes(bytes).context("Failed to decode effect binary")
}
