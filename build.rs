//! Build script for the nativebind test fixture.
//!
//! Compiles a tiny C shared library into OUT_DIR so the integration tests
//! have a real native artifact to load and bind against. The fixture is
//! test-only: the crate itself has no build-time codegen.

use std::env;
use std::fs;
use std::path::PathBuf;

const FIXTURE_SOURCE: &str = r#"
/* Exported entry points used by the loader integration tests. */

#if defined(_WIN32)
#define EXPORT __declspec(dllexport)
#else
#define EXPORT
#endif

EXPORT int add(int a, int b) {
    return a + b;
}

EXPORT int increment(int v) {
    return v + 1;
}

EXPORT unsigned long long mix64(unsigned long long a, unsigned long long b) {
    return a ^ (b << 1);
}
"#;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let target = env::var("TARGET").unwrap_or_default();

    println!("cargo:rerun-if-changed=build.rs");

    let src = out_dir.join("fixture.c");
    fs::write(&src, FIXTURE_SOURCE).expect("Failed to write fixture.c");

    let ext = if target.contains("windows") {
        "dll"
    } else if target.contains("apple") {
        "dylib"
    } else {
        "so"
    };
    let lib = out_dir.join(format!("nativebind_fixture.{}", ext));

    let compiler = match cc::Build::new().opt_level(2).try_get_compiler() {
        Ok(c) => c,
        Err(_) => {
            println!("cargo:warning=no C compiler found; fixture-backed tests will be skipped");
            return;
        }
    };

    let mut cmd = compiler.to_command();
    if compiler.is_like_msvc() {
        cmd.arg(&src)
            .arg("/LD")
            .arg(format!("/Fe:{}", lib.display()));
    } else {
        cmd.args(["-shared", "-fPIC", "-O2", "-o"]).arg(&lib).arg(&src);
    }

    match cmd.status() {
        Ok(status) if status.success() => {
            println!("cargo:rustc-env=NATIVEBIND_FIXTURE={}", lib.display());
        }
        _ => {
            println!("cargo:warning=fixture compilation failed; fixture-backed tests will be skipped");
        }
    }
}
