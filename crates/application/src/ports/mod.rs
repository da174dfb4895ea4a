mod block_list;
mod connection_log;
mod event_publisher;
mod export;
mod geo_resolver;
mod packet_filter;
mod plugin;
mod scheduler;
mod store;

pub use block_list::BlockListPort;
pub use connection_log::ConnectionLogPort;
pub use event_publisher::EventPublisherPort;
pub use export::ExportPort;
pub use geo_resolver::GeoResolverPort;
pub use packet_filter::PacketFilterPort;
pub use plugin::{FirewallApiPort, PluginCapabilities, PluginHandlerPort};
pub use scheduler::{JobCallback, SchedulerPort};
pub use store::{StorePort, StoreStats};
