use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    plx::run().await
}
