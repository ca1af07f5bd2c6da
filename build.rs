fn main() {
    println!("cargo:rerun-if-changed=app.rc");
    println!("cargo:rerun-if-changed=app.manifest");
    // The manifest opts the demo into Common Controls v6 (themed tooltips)
    // and per-monitor DPI awareness. Build scripts run on the host, so the
    // target is read from the environment Cargo provides.
    if embeds_manifest(std::env::var("CARGO_CFG_TARGET_OS").ok().as_deref()) {
        let _ = embed_resource::compile("app.rc", &[] as &[&str]);
    }
}

fn embeds_manifest(target_os: Option<&str>) -> bool {
    target_os == Some("windows")
}
