//! Channels and the registry that routes messages to them

mod channel;
mod registry;

pub use channel::{Channel, ChannelStats, Delivery, LossyChannel};
pub use registry::ChannelRegistry;
