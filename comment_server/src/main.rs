#[tokio::main]
async fn main() -> std::io::Result<()> {
    comment_server::frameworks::server::run_with_config().await
}
