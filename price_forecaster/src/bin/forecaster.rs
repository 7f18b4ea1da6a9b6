use anyhow::Result;
use clap::Parser;
use price_forecaster::{
    artifact::ModelArtifact,
    cli::{Cli, Commands},
    pipeline::{predict_next, train_for_asset},
};
use shared_utils::{config::DbConfig, env::load_dotenv, logging::init_tracing};
use tracing::info;

fn main() -> Result<()> {
    init_tracing();
    load_dotenv();
    let cli = Cli::parse();

    let db = DbConfig::from_env()?;
    info!(target_db = %db.describe(), "using database");

    match cli.command {
        Commands::Train(args) => {
            let cfg = args.resolve()?;
            let artifact = train_for_asset(&db, &cfg)?;
            artifact.save(&cfg.output)?;

            if let Some(loss) = artifact.report.final_val_loss() {
                info!(val_loss = loss, "final validation loss");
            }
            println!("{}", cfg.output.display());
        }
        Commands::Predict(args) => {
            let artifact = ModelArtifact::load(&args.model)?;
            let next = predict_next(&db, &artifact)?;
            println!("{next}");
        }
    }
    Ok(())
}
