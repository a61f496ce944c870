#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nim_proxy_lib::run().await
}
