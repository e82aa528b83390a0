//! Settlement runner binary

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use coinflip_settlement::{
    constants::SETTLE_SIGNATURE, json_lines, JsonEmitter, OsEntropy, SettlementBatchBuilder,
    SettlerConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load config from environment
    let config = SettlerConfig::from_env()?;

    // Setup logging; stdout carries the emitted batch
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Coin flip settlement runner");
    info!("  Settle call:  {}", SETTLE_SIGNATURE);
    info!("  Expiration:   {}s", config.expiration_secs);
    info!("  Gas limit:    {}", config.gas_limit);
    match config.signer_address {
        Some(address) => info!("  Signer:       {address:#x}"),
        None => warn!("  Signer:       not configured, settlements cannot be built"),
    }

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &config.params_path {
        Some(path) => {
            info!("  Requests:     {}", path.display());
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => {
            info!("  Requests:     stdin");
            Box::new(BufReader::new(tokio::io::stdin()))
        }
    };

    let mut builder =
        SettlementBatchBuilder::new(OsEntropy, config.signer(), config.batch_options());
    let emitter = JsonEmitter::new(std::io::stdout());

    let report = builder.run(json_lines(reader), &emitter).await?;
    info!(
        received = report.received,
        settled = report.transactions.len(),
        skipped = report.failures.len(),
        "Settlement run complete"
    );

    Ok(())
}
