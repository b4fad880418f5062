//! `hfxc <input.hfx> [-o <dir>] [--bin <file>] [--glsl <version>] [--strict] [--constants] [--dump]`

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use hfx::{compile_hfx, init_logging, CompileOptions, GlslVersion};

const USAGE: &str = "usage: hfxc <input.hfx> [-o <dir>] [--bin <file>] [--glsl <330|430|450|460>] \
                     [--strict] [--constants] [--dump]";

#[derive(Debug)]
struct Args {
    input: PathBuf,
    options: CompileOptions,
    dump: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut input = None;
    let mut options = CompileOptions::default();
    let mut dump = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" | "--out" => {
                let dir = args.next().ok_or_else(|| anyhow!("-o needs a directory"))?;
                options.output_dir = dir.into();
            }
            "--bin" => {
                let path = args.next().ok_or_else(|| anyhow!("--bin needs a file"))?;
                options.binary_path = Some(path.into());
            }
            "--glsl" => {
                let number = args.next().ok_or_else(|| anyhow!("--glsl needs a version"))?;
                options.glsl_version = GlslVersion::from_number(&number)
                    .ok_or_else(|| anyhow!("unsupported GLSL version {number}"))?;
            }
            "--strict" => options.strict = true,
            "--constants" => options.emit_local_constants = true,
            "--dump" => dump = true,
            "-h" | "--help" => bail!("{USAGE}"),
            flag if flag.starts_with('-') => bail!("unknown option {flag}\n{USAGE}"),
            _ if input.is_none() => input = Some(PathBuf::from(&arg)),
            _ => bail!("only one input file is accepted\n{USAGE}"),
        }
    }

    let input = input.ok_or_else(|| anyhow!("{USAGE}"))?;
    Ok(Args {
        input,
        options,
        dump,
    })
}

fn run() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    let compiled = compile_hfx(&args.input, &args.options)?;

    if args.dump {
        print!("{}", compiled.effect);
    }
    for path in &compiled.stage_files {
        println!("{}", path.display());
    }
    if let Some(path) = &compiled.binary_path {
        println!("{}", path.display());
    }
    Ok(())
}

fn main() {
    init_logging();
    if let Err(e) = run() {
        eprintln!("hfxc: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn flags_fill_compile_options() {
        let parsed = args(&[
            "glow.hfx",
            "-o",
            "out",
            "--bin",
            "glow.hfxb",
            "--glsl",
            "450",
            "--strict",
            "--constants",
            "--dump",
        ])
        .unwrap();
        assert_eq!(parsed.input, PathBuf::from("glow.hfx"));
        assert_eq!(parsed.options.output_dir, PathBuf::from("out"));
        assert_eq!(parsed.options.binary_path, Some(PathBuf::from("glow.hfxb")));
        assert_eq!(parsed.options.glsl_version, GlslVersion::Glsl450);
        assert!(parsed.options.strict);
        assert!(parsed.options.emit_local_constants);
        assert!(parsed.dump);
    }

    #[test]
    fn defaults_without_flags() {
        let parsed = args(&["glow.hfx"]).unwrap();
        assert_eq!(parsed.options.glsl_version, GlslVersion::Glsl330Core);
        assert_eq!(parsed.options.binary_path, None);
        assert!(!parsed.options.strict);
        assert!(!parsed.dump);
    }

    #[test]
    fn bad_arguments_are_rejected() {
        let unknown = args(&["glow.hfx", "--fast"]).unwrap_err();
        assert!(unknown.to_string().starts_with("unknown option --fast"));

        let two_inputs = args(&["a.hfx", "b.hfx"]).unwrap_err();
        assert!(two_inputs.to_string().starts_with("only one input file"));

        let no_input = args(&["--strict"]).unwrap_err();
        assert!(no_input.to_string().starts_with("usage: hfxc"));

        let version = args(&["glow.hfx", "--glsl", "120"]).unwrap_err();
        assert_eq!(version.to_string(), "unsupported GLSL version 120");

        let missing_dir = args(&["glow.hfx", "-o"]).unwrap_err();
        assert_eq!(missing_dir.to_string(), "-o needs a directory");
    }
}
