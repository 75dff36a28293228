pub mod schema;

pub use schema::{ChannelsConfig, Config, GatewayConfig, ResetConfig};
