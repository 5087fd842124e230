fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo::rustc-check-cfg=cfg(getrandom_backend, values(\"wasm_js\"))");

    // Id generation draws from getrandom; in the browser that needs the wasm_js backend
    let target = std::env::var("TARGET").unwrap_or_default();
    if target == "wasm32-unknown-unknown" {
        println!("cargo:rustc-cfg=getrandom_backend=\"wasm_js\"");
    }
}
