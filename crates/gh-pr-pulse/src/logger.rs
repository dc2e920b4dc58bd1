//! Console logging using env_logger
//!
//! Diagnostics go to stderr so the score report on stdout stays clean.
//! Verbosity defaults to `warn` and follows `RUST_LOG` when set.

use env_logger::Env;

/// Initialize the global logger
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .init();
}

/// Load a `.env` file when no token is present in the environment
pub fn load_dotenv() {
    if std::env::var("GITHUB_TOKEN").is_err() {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("Loaded .env file from: {:?}", path),
            Err(_) => log::debug!(".env file not found, will rely on environment variables"),
        }
    }
}
