/// This build script is used to link the bl31 binary.

const LINKER_SCRIPT: &str = "bin/bl31/src/link.ld";

fn main() {
    println!("cargo:rerun-if-changed={}", LINKER_SCRIPT);
    // Host builds (clippy, docs) link with the default script.
    if std::env::var("CARGO_CFG_TARGET_ARCH").as_deref() == Ok("aarch64") {
        println!("cargo:rustc-link-arg=--script={}", LINKER_SCRIPT);
    }
}
