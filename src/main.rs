use clap::Parser;
use collector::api::Error;
use github_export_app::Args;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let report = github_export_app::export(args).await?;

    for path in &report.exported {
        println!("{}", path.display());
    }
    if !report.failed.is_empty() {
        eprintln!("Failed users: {}", report.failed.join(", "));
    }

    Ok(())
}
