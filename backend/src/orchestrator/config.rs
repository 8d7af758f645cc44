//! Simulation configuration
//!
//! Everything needed to build a [`System`](super::System): the RNG seed,
//! whether tracing is on, and the channel registry. Serializable so a
//! scenario can live in a JSON file.
//!
//! ```json
//! {
//!   "rng_seed": 12345,
//!   "trace": true,
//!   "channels": [
//!     { "sender": 1, "receiver": 2, "type": "lossy", "fixed_delay": 5, "loss_probability": 0.5 },
//!     { "sender": 2, "receiver": 1, "type": "lossy", "fixed_delay": 5, "loss_probability": 0.5 }
//!   ]
//! }
//! ```

use crate::core::time::SimTime;
use crate::error::{SimError, SimResult};
use crate::models::actor::ActorId;
use crate::network::{Channel, LossyChannel};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::rc::Rc;

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seed for the deterministic RNG
    pub rng_seed: u64,

    /// Emit trace lines through the sink
    #[serde(default)]
    pub trace: bool,

    /// One entry per directed actor pair
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rng_seed: 12345,
            trace: false,
            channels: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Add a channel entry (builder style)
    pub fn with_channel(mut self, channel: ChannelConfig) -> Self {
        self.channels.push(channel);
        self
    }

    /// Check channel parameters and reject duplicate pairs
    pub fn validate(&self) -> SimResult<()> {
        let mut seen = HashSet::new();
        for channel in &self.channels {
            channel.policy.validate()?;
            if !seen.insert((channel.sender, channel.receiver)) {
                return Err(SimError::DuplicateChannel {
                    sender: channel.sender,
                    receiver: channel.receiver,
                });
            }
        }
        Ok(())
    }

    /// SHA-256 of the JSON form, used to label runs
    pub fn config_hash(&self) -> SimResult<String> {
        let json = serde_json::to_string(self)?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}

/// Channel bound to one directed actor pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub sender: ActorId,
    pub receiver: ActorId,
    #[serde(flatten)]
    pub policy: ChannelPolicy,
}

impl ChannelConfig {
    /// Lossy channel `sender -> receiver`
    pub fn lossy(sender: u32, receiver: u32, fixed_delay: SimTime, loss_probability: f64) -> Self {
        Self {
            sender: ActorId::new(sender),
            receiver: ActorId::new(receiver),
            policy: ChannelPolicy::Lossy {
                fixed_delay,
                loss_probability,
            },
        }
    }
}

/// Delivery policy and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChannelPolicy {
    Lossy {
        fixed_delay: SimTime,
        loss_probability: f64,
    },
}

impl ChannelPolicy {
    pub fn validate(&self) -> SimResult<()> {
        match self {
            ChannelPolicy::Lossy {
                loss_probability, ..
            } => {
                if !(0.0..=1.0).contains(loss_probability) {
                    return Err(SimError::InvalidConfig(format!(
                        "loss_probability {} outside [0, 1]",
                        loss_probability
                    )));
                }
                Ok(())
            }
        }
    }

    /// Instantiate the channel
    pub fn build(&self) -> SimResult<Rc<dyn Channel>> {
        match self {
            ChannelPolicy::Lossy {
                fixed_delay,
                loss_probability,
            } => Ok(Rc::new(LossyChannel::new(*fixed_delay, *loss_probability)?)),
        }
    }
}
