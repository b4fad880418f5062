use std::path::PathBuf;

use hfx::{compile_hfx, load_effect, load_effect_bytes, CompileOptions, GlslVersion};
use hfx_core::{PassKind, PropertyData, ResourceType, ShaderStage};

const GLOW: &str = r#"
// Two-pass glow.
effect Glow {
    glsl Blur {
        #pragma include Common
        uniform sampler2D source;
        #if defined(COMPUTE)
        uniform image2D target;
        #endif
        void main() {
            vec4 c = texture(source, vec2(0.5));
        }
    }

    glsl Composite {
        uniform sampler2D blurred;
        void main() { }
    }

    pass Blur {
        compute = Blur
    }

    pass Composite {
        vertex = Composite
        fragment = Composite
    }

    properties {
        strength("Strength", Float = 0.8)
        radius("Radius", Range(1, 16) = 4)
        taps("Taps", Int = 9)
        noise("Noise", 2D = "noise.png")
    }
}
"#;

struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("hfx_{}_{name}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self(path)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.0).ok();
    }
}

fn write_source(dir: &TempDir, text: &str) -> PathBuf {
    let path = dir.0.join("effect.hfx");
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn compiles_stage_files_and_binary() {
    let dir = TempDir::new("compile");
    let input = write_source(&dir, GLOW);
    let options = CompileOptions {
        output_dir: dir.0.join("out"),
        binary_path: Some(dir.0.join("glow.hfxb")),
        ..Default::default()
    };

    let compiled = compile_hfx(&input, &options).unwrap();
    assert!(compiled.parse_error.is_none());

    let names: Vec<_> = compiled
        .stage_files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["Blur_cp.glsl", "Composite_vt.glsl", "Composite_fg.glsl"]);

    let blur = std::fs::read_to_string(dir.0.join("out/Blur_cp.glsl")).unwrap();
    assert!(blur.starts_with("#version 330 core\n#define COMPUTE\n"));
    assert!(blur.contains("vec4 c = texture(source, vec2(0.5));"));
    assert!(blur.trim_end().ends_with('}'));

    let effect = compiled.effect;
    assert_eq!(effect.name, "Glow");
    assert_eq!(effect.passes[0].kind, PassKind::Compute);
    assert_eq!(effect.passes[1].kind, PassKind::Graphics);
    assert_eq!(effect.passes[1].shaders[1].stage, ShaderStage::Fragment);
    assert_eq!(
        effect.code_chunks[0]
            .resources
            .iter()
            .map(|r| r.kind)
            .collect::<Vec<_>>(),
        [ResourceType::Texture, ResourceType::TextureRW]
    );
    assert_eq!(
        effect.properties[1].data,
        PropertyData::Range {
            min: 1.0,
            max: 16.0,
            default: 4.0
        }
    );

    let restored = load_effect(dir.0.join("glow.hfxb")).unwrap();
    assert_eq!(restored, effect);

    let bytes = std::fs::read(dir.0.join("glow.hfxb")).unwrap();
    assert_eq!(load_effect_bytes(&bytes).unwrap(), effect);
}

#[test]
fn writes_local_constants() {
    let dir = TempDir::new("constants");
    let input = write_source(&dir, GLOW);
    let options = CompileOptions {
        output_dir: dir.0.clone(),
        emit_local_constants: true,
        glsl_version: GlslVersion::Glsl450,
        ..Default::default()
    };
    compile_hfx(&input, &options).unwrap();

    let block = std::fs::read_to_string(dir.0.join("Glow_constants.glsl")).unwrap();
    assert!(block.starts_with("layout(std140, binding=7) uniform LocalConstants {"));
    assert!(block.contains("\tfloat strength;\n"));
    assert!(block.contains("\tfloat pad_tail[3];\n"));

    let defaults = std::fs::read(dir.0.join("Glow_defaults.bin")).unwrap();
    assert_eq!(&defaults[..4], &16u32.to_le_bytes());
    assert_eq!(&defaults[4..8], &0.8f32.to_le_bytes());
    assert_eq!(defaults.len(), 20);
}

#[test]
fn unresolved_chunk_fails_generation() {
    let dir = TempDir::new("unresolved");
    let input = write_source(&dir, "pass P { vertex = Later } glsl Later { }");
    let options = CompileOptions {
        output_dir: dir.0.join("out"),
        ..Default::default()
    };
    let err = compile_hfx(&input, &options).unwrap_err();
    assert!(format!("{err:#}").contains("missing code chunk"));
    assert!(!dir.0.join("out/Later_vt.glsl").exists());
}

#[test]
fn strict_mode_rejects_structural_errors() {
    let dir = TempDir::new("strict");
    let input = write_source(&dir, "glsl A { }\npass { vertex = A }");

    let lenient = CompileOptions {
        output_dir: dir.0.join("lenient"),
        ..Default::default()
    };
    let compiled = compile_hfx(&input, &lenient).unwrap();
    assert!(compiled.parse_error.is_some());

    let strict = CompileOptions {
        output_dir: dir.0.join("strict"),
        strict: true,
        ..Default::default()
    };
    let err = compile_hfx(&input, &strict).unwrap_err();
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn unsupported_default_aborts() {
    let dir = TempDir::new("unsupported");
    let input = write_source(&dir, r#"properties { a("A", Float = "x") }"#);
    let options = CompileOptions {
        output_dir: dir.0.join("out"),
        ..Default::default()
    };
    let err = compile_hfx(&input, &options).unwrap_err();
    assert!(format!("{err:#}").contains("unsupported default value"));
}

#[test]
fn missing_source_is_reported() {
    let err = compile_hfx("/definitely/not/here.hfx", &CompileOptions::default()).unwrap_err();
    assert!(err.to_string().contains("Failed to read HFX source"));
}
