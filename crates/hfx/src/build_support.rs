//! Effect compilation helpers for consumer `build.rs` scripts.
//!
//! These functions compile `.hfx` files at build time and emit the
//! appropriate `cargo:rerun-if-changed` directives.
//!
//! # Usage
//!
//! List the effects in your `build.rs`:
//!
//! ```rust,ignore
//! use hfx::build_support::{compile_hfx_effects, HfxEntry};
//!
//! fn main() {
//!     compile_hfx_effects(
//!         std::path::Path::new("effects"),
//!         &[HfxEntry {
//!             file: "fullscreen.hfx",
//!             name: "fullscreen",
//!         }],
//!     );
//! }
//! ```
//!
//! Then embed the artifacts in your Rust source:
//!
//! ```rust,ignore
//! let vertex = hfx::include_hfx_shader!("fullscreen", "Triangle_vt");
//! let effect = hfx::load_effect_bytes(hfx::include_hfx_binary!("fullscreen"))?;
//! ```

use std::path::{Path, PathBuf};

use crate::{compile_hfx, CompileOptions, GlslVersion};

/// An effect source to compile.
pub struct HfxEntry {
    /// `.hfx` file name (relative to the effect directory).
    pub file: &'static str,
    /// Output name: stage files go to `OUT_DIR/<name>/`, the binary to
    /// `OUT_DIR/<name>.hfxb`.
    pub name: &'static str,
}

/// Compile every entry for GLSL 4.30 with strict parsing and local constants
/// enabled.
///
/// Panics with a descriptive message on any failure, failing the build.
/// Emits `cargo:rerun-if-changed` for each `.hfx` file in `effect_dir`.
pub fn compile_hfx_effects(effect_dir: &Path, entries: &[HfxEntry]) {
    let out_dir = std::env::var("OUT_DIR").unwrap_or_else(|e| {
        panic!("OUT_DIR is not set; call this from a build script: {e}");
    });
    compile_hfx_effects_into(effect_dir, Path::new(&out_dir), entries);

    if let Ok(dir_entries) = std::fs::read_dir(effect_dir) {
        for dir_entry in dir_entries.flatten() {
            let path = dir_entry.path();
            if path.extension().is_some_and(|ext| ext == "hfx") {
                println!("cargo:rerun-if-changed={}", path.display());
            }
        }
    }
}

/// [`compile_hfx_effects`] with an explicit output directory.
pub fn compile_hfx_effects_into(effect_dir: &Path, out_dir: &Path, entries: &[HfxEntry]) {
    for entry in entries {
        let source_path = effect_dir.join(entry.file);
        let options = CompileOptions {
            output_dir: out_dir.join(entry.name),
            binary_path: Some(binary_path(out_dir, entry.name)),
            glsl_version: GlslVersion::Glsl430,
            strict: true,
            emit_local_constants: true,
            ..Default::default()
        };

        compile_hfx(&source_path, &options).unwrap_or_else(|e| {
            panic!("Failed to compile HFX effect {source_path:?}: {e:#}");
        });
    }
}

fn binary_path(out_dir: &Path, name: &str) -> PathBuf {
    out_dir.join(format!("{name}.hfxb"))
}

/// Load a generated stage file compiled by [`compile_hfx_effects`].
///
/// `$effect` is the entry name, `$stage` the file stem
/// (`<chunk>_<postfix>`).
///
/// Expands to `include_str!(concat!(env!("OUT_DIR"), "/", $effect, "/", $stage, ".glsl"))`.
#[macro_export]
macro_rules! include_hfx_shader {
    ($effect:literal, $stage:literal) => {
        include_str!(concat!(env!("OUT_DIR"), "/", $effect, "/", $stage, ".glsl"))
    };
}

/// Load the effect binary compiled by [`compile_hfx_effects`].
///
/// Expands to `include_bytes!(concat!(env!("OUT_DIR"), "/", $effect, ".hfxb"))`.
#[macro_export]
macro_rules! include_hfx_binary {
    ($effect:literal) => {
        include_bytes!(concat!(env!("OUT_DIR"), "/", $effect, ".hfxb"))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_into_named_directory() {
        let root = std::env::temp_dir().join(format!("hfx_build_support_{}", std::process::id()));
        let effect_dir = root.join("effects");
        let out_dir = root.join("out");
        std::fs::create_dir_all(&effect_dir).unwrap();
        std::fs::write(
            effect_dir.join("tiny.hfx"),
            "effect Tiny { glsl Main { void main() {} } pass P { fragment = Main } \
             properties { gain(\"Gain\", Float = 2) } }",
        )
        .unwrap();

        compile_hfx_effects_into(
            &effect_dir,
            &out_dir,
            &[HfxEntry {
                file: "tiny.hfx",
                name: "tiny",
            }],
        );

        let stage = std::fs::read_to_string(out_dir.join("tiny/Main_fg.glsl")).unwrap();
        assert!(stage.starts_with("#version 430\n#define FRAGMENT\n"));
        let constants = std::fs::read_to_string(out_dir.join("tiny/Tiny_constants.glsl")).unwrap();
        assert!(constants.starts_with("layout(std140, binding=7) uniform LocalConstants {"));
        let effect = crate::load_effect(out_dir.join("tiny.hfxb")).unwrap();
        assert_eq!(effect.name, "Tiny");

        std::fs::remove_dir_all(&root).ok();
    }
}
