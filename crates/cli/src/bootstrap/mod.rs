pub mod config;
pub mod database;
pub mod logging;
pub mod tls_keys;

pub use config::load_config;
pub use database::init_database;
pub use logging::init_logging;
pub use tls_keys::ensure_aes_key_material;
