#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = educonnect_client::run().await {
        eprintln!("educonnect fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
