fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Compile the SSM proto for the server and for in-process test clients
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["../proto/ssm.proto"], &["../proto"])?;

    Ok(())
}
