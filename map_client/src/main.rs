#[tokio::main]
async fn main() -> std::io::Result<()> {
    map_client::frameworks::app::run_with_config().await
}
