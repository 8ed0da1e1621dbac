use playgram_common::config::NotifierConfig;
use playgram_notifier::TelegramNotifier;
use playgram_relay::relay;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdin carries the event stream.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playgram_relay=info,playgram_notifier=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!("Playgram relay starting...");

    let config = NotifierConfig::from_env()?;
    let mut notifier = TelegramNotifier::new(&config);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());

    tokio::select! {
        result = relay(stdin, &mut notifier) => {
            match result {
                Ok(dispatched) => tracing::info!(dispatched, "Event stream closed"),
                Err(e) => {
                    tracing::error!(error = %e, "Notification delivery failed");
                    return Err(e);
                }
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    tracing::info!("Playgram relay stopped.");
    Ok(())
}
