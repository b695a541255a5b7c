#[tokio::main]
async fn main() {
    if let Err(e) = fabric_setup_lib::run().await {
        tracing::error!("{e}");
        eprintln!("fabric-setup: {e}");
        std::process::exit(1);
    }
}
