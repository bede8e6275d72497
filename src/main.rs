use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    air_poetry::app::run()
        .await
        .context("air-poetry service stopped with an error")
}
