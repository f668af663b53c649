fn main() {
    tonic_build::configure()
        .build_server(true)
        .build_client(false)
        .extern_path(".google.protobuf.Empty", "()")
        .compile_protos(&["proto/meta_transaction.proto"], &["proto"])
        .expect("failed to compile meta_transaction.proto");
}
