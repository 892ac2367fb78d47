#[tokio::main]
async fn main() -> anyhow::Result<()> {
    placescout_app::run().await
}
