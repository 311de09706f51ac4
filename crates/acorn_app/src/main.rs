use acorn_app::app::{run, AppConfig};

fn main() {
    tracing_subscriber::fmt::init();
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(%err, "invalid configuration, falling back to defaults");
            AppConfig::default()
        }
    };
    if let Err(err) = run(config) {
        eprintln!("Failed to start acorn: {err:#}");
    }
}
