use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(err) = backend::run().await {
        error!("Backend exited with error: {}", err);
        std::process::exit(1);
    }
}
