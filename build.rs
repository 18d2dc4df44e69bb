//! Compiles the Aggregator protobuf schema with a vendored protoc binary.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .include_file("aggregator_proto.rs")
        .compile_protos(&["proto/aggregator.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/aggregator.proto");
    Ok(())
}
