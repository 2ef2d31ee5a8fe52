// Build script for spotify-ffi
//
// libspotify is only linked with the `link` feature. When it lives outside
// the default linker search path, point LIBSPOTIFY_LIB_DIR at the directory
// containing the shared library.

fn main() {
    println!("cargo:rerun-if-changed=src/");
    println!("cargo:rerun-if-env-changed=LIBSPOTIFY_LIB_DIR");

    if std::env::var_os("CARGO_FEATURE_LINK").is_none() {
        return;
    }

    if let Some(dir) = std::env::var_os("LIBSPOTIFY_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir.to_string_lossy());
    }
}
