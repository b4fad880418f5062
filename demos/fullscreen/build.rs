fn main() {
    hfx::build_support::compile_hfx_effects(
        std::path::Path::new("effects"),
        &[hfx::build_support::HfxEntry {
            file: "fullscreen.hfx",
            name: "fullscreen",
        }],
    );
}
