fn main() {
    // The endpoint can be baked in at build time, the same way the web bundle
    // picks it up from its build environment.
    println!("cargo:rerun-if-env-changed=YOGEASE_BACKEND_WS");

    #[cfg(feature = "desktop")]
    tauri_build::build();
}
