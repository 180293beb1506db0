#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    askemall::utils::logging::init();
    askemall::cli::run().await
}
