use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = alertdesk::cli::Cli::parse();
    if let Err(e) = alertdesk::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
