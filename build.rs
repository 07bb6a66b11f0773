use anyhow::Result;
use vergen::EmitBuilder;

// Embeds VERGEN_GIT_SHA for `bplt_converter --version`
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=build.rs");
    EmitBuilder::builder().git_sha(true).emit()?;
    Ok(())
}
