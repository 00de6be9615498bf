use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    creatorscope::init_tracing();
    creatorscope::run(creatorscope::Cli::parse()).await?;
    Ok(())
}
