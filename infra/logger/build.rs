fn main() {
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_PROFILING");
    println!("cargo:rerun-if-env-changed=CARGO_CFG_TOKIO_UNSTABLE");

    let profiling = std::env::var_os("CARGO_FEATURE_PROFILING").is_some();
    let unstable = std::env::var_os("CARGO_CFG_TOKIO_UNSTABLE").is_some();
    if profiling && !unstable {
        println!(
            "cargo:warning=folio-logger: `profiling` only attaches tokio-console when built \
             with RUSTFLAGS=\"--cfg tokio_unstable\""
        );
    }
}
