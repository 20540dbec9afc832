// File: crates/kaplot-render-skia/build.rs
// Summary: Links the Windows system libraries skia-safe's font manager needs.

fn main() {
    #[cfg(target_os = "windows")]
    {
        // registry lookups in the font manager
        println!("cargo:rustc-link-lib=advapi32");
    }
}
