#[tokio::main]
async fn main() -> anyhow::Result<()> {
    wordswipe_backend::run().await
}
