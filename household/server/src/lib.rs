pub mod config {
    use serde::Deserialize;
    use std::path::Path;
    use std::time::Duration;

    const IN_MEMORY: &str = ":memory:";

    #[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
    pub struct Config {
        #[serde(default = "default_db_path")]
        pub db_path: String,
        #[serde(default = "default_port")]
        pub port: u16,
        #[serde(default = "default_static_dir")]
        pub static_dir: String,
        #[serde(default = "default_allowed_origin")]
        pub allowed_origin: String,
        #[serde(default = "default_query_timeout_ms")]
        pub query_timeout_ms: u64,
        #[serde(default = "default_request_timeout_secs")]
        pub request_timeout_secs: u64,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_environment(config::Environment::default())
        }

        pub fn from_environment(environment: config::Environment) -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(environment)
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }

        /// Connection URL for the configured SQLite database.
        ///
        /// Creates the parent directory of a file database if it is missing.
        pub fn database_url(&self) -> anyhow::Result<String> {
            if self.db_path == IN_MEMORY {
                return Ok("sqlite::memory:".to_string());
            }
            if let Some(parent) = Path::new(&self.db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Ok(format!("sqlite://{}?mode=rwc", self.db_path))
        }

        pub fn query_timeout(&self) -> Duration {
            Duration::from_millis(self.query_timeout_ms)
        }

        pub fn request_timeout(&self) -> Duration {
            Duration::from_secs(self.request_timeout_secs)
        }
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                db_path: default_db_path(),
                port: default_port(),
                static_dir: default_static_dir(),
                allowed_origin: default_allowed_origin(),
                query_timeout_ms: default_query_timeout_ms(),
                request_timeout_secs: default_request_timeout_secs(),
            }
        }
    }

    fn default_db_path() -> String {
        "household.db".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_static_dir() -> String {
        "./static".to_string()
    }

    fn default_allowed_origin() -> String {
        "http://localhost:3000".to_string()
    }

    fn default_query_timeout_ms() -> u64 {
        5000
    }

    fn default_request_timeout_secs() -> u64 {
        30
    }

}
pub mod crud;
pub mod db;
pub mod entities;
pub mod note;
pub mod project;
pub mod shopping;
pub mod task;
pub mod web;
pub mod wishlist;
