mod dispatch;
mod listener;
mod tls;

pub use listener::CommandServer;
pub use tls::load_or_generate_server_config;
