/* Credit where credit's due:
 * This build.rs is derived from: https://github.com/ysimonson/guile-sys.
 * Thanks to Yusuf Simonson for his work on the build script we use. */

use std::env::var;
use std::path::PathBuf;

const FALLBACK_INCLUDE: &str = "/usr/include/guile/3.0";
const FALLBACK_LIBS: [&str; 4] = ["guile-3.0", "gc", "pthread", "dl"];

/// Find the libguile include directories and emit the link flags.
///
/// `GUILE_INCLUDE_DIR` wins over pkg-config. If pkg-config can't find
/// guile-3.0 either, link the usual libraries by name and hope the headers
/// are in the distro default location.
fn configure_guile() -> Vec<PathBuf> {
    if let Ok(dir) = var("GUILE_LIB_DIR") {
        println!("cargo:rustc-link-search={dir}");
    }

    let probed = pkg_config::Config::new()
        .atleast_version("3.0")
        .probe("guile-3.0");

    if let Ok(dir) = var("GUILE_INCLUDE_DIR") {
        if probed.is_err() {
            link_fallback();
        }
        return vec![PathBuf::from(dir)];
    }

    match probed {
        Ok(lib) => lib.include_paths,
        Err(e) => {
            println!("cargo:warning=pkg-config could not find guile-3.0 ({e}), using {FALLBACK_INCLUDE}");
            link_fallback();
            vec![PathBuf::from(FALLBACK_INCLUDE)]
        }
    }
}

fn link_fallback() {
    for arg in FALLBACK_LIBS {
        println!("cargo:rustc-link-lib={}", arg);
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=wrapper.h");
    println!("cargo:rerun-if-changed=helpers.c");
    println!("cargo:rerun-if-env-changed=GUILE_INCLUDE_DIR");
    println!("cargo:rerun-if-env-changed=GUILE_LIB_DIR");

    let include_dirs = configure_guile();

    let mut bindings = bindgen::Builder::default().clang_arg("-pthread");
    for dir in &include_dirs {
        bindings = bindings.clang_arg(format!("-I{}", dir.display()));
    }

    // SCM and the immediate constants are written by hand in src/bindings.rs
    let bindings = bindings
        .header("wrapper.h")
        .allowlist_function("scm_.*")
        .allowlist_function("rust_.*")
        .allowlist_var("scm_.*")
        .allowlist_var("SCM_.*")
        .blocklist_type("SCM")
        .blocklist_item("SCM_(BOOL_T|BOOL_F|ELISP_NIL|EOL|UNSPECIFIED|UNDEFINED)")
        .blocklist_item("SCM_ALLOW_(OTHER_KEYS|NON_KEYWORD_ARGUMENTS)")
        .generate()
        .expect("Unable to generate bindings.");

    let bindings_out_path =
        PathBuf::from(var("OUT_DIR").expect("OUT_DIR set by cargo")).join("bindings.rs");

    bindings
        .write_to_file(bindings_out_path)
        .expect("Couldn't write bindings!");

    let mut helpers = cc::Build::new();
    helpers.file("helpers.c").flag_if_supported("-pthread");
    for dir in &include_dirs {
        helpers.include(dir);
    }
    helpers.compile("guile_sys_helpers");

    // exported to dependents as DEP_GUILE_INCLUDE
    let joined = std::env::join_paths(&include_dirs).expect("include paths are joinable");
    println!("cargo:include={}", joined.to_string_lossy());
}
