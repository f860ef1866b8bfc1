fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use the vendored protoc so the build doesn't depend on a system install
    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }

    println!("cargo:rerun-if-changed=../../proto/assistant.proto");
    tonic_build::configure()
        .build_server(true)
        .compile(&["../../proto/assistant.proto"], &["../../proto"])?;
    Ok(())
}
