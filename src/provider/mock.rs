//! Randomized mock backend.
//!
//! Produces 1..=`max_children` nodes per call after a fixed delay. Child ids are
//! `<parent>-<index>`, which keeps ids unique across the tree as long as the root ids are.

use crate::error::ProviderError;
use crate::provider::ChildProvider;
use crate::tree::{Node, NodeKind};
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Mock provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockProviderConfig {
    /// Artificial latency per fetch (default: 1000)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Upper bound of generated children; 0 always yields an empty directory
    #[serde(default = "default_max_children")]
    pub max_children: usize,

    /// Probability in [0, 1] that a fetch fails
    #[serde(default)]
    pub failure_rate: f64,

    /// Fixed RNG seed for reproducible trees
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_max_children() -> usize {
    5
}

impl Default for MockProviderConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            max_children: default_max_children(),
            failure_rate: 0.0,
            seed: None,
        }
    }
}

pub struct MockChildProvider {
    config: MockProviderConfig,
    rng: Mutex<StdRng>,
}

impl MockChildProvider {
    pub fn new(config: MockProviderConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &MockProviderConfig {
        &self.config
    }

    fn generate(&self, parent_id: &str) -> Result<Vec<Node>, ProviderError> {
        let mut rng = self.rng.lock();

        let failure_rate = self.config.failure_rate.clamp(0.0, 1.0);
        if failure_rate > 0.0 && rng.gen_bool(failure_rate) {
            return Err(ProviderError::fetch_failed(
                parent_id,
                "mock backend rejected the request",
            ));
        }

        if self.config.max_children == 0 {
            return Ok(Vec::new());
        }

        let count = rng.gen_range(1..=self.config.max_children);
        let children = (0..count)
            .map(|index| {
                let kind = NodeKind::ALL[rng.gen_range(0..NodeKind::ALL.len())];
                let number: u32 = rng.gen_range(0..100);
                let id = format!("{}-{}", parent_id, index);
                match kind.extension() {
                    Some(ext) => {
                        let size = format!("{}KB", rng.gen_range(1..=100u32));
                        Node::file(id, format!("File_{}.{}", number, ext), kind, Some(size))
                    }
                    None => Node::directory(id, format!("Folder_{}", number)),
                }
            })
            .collect();
        Ok(children)
    }
}

impl Default for MockChildProvider {
    fn default() -> Self {
        Self::new(MockProviderConfig::default())
    }
}

#[async_trait]
impl ChildProvider for MockChildProvider {
    async fn fetch_children(&self, parent_id: &str) -> Result<Vec<Node>, ProviderError> {
        if self.config.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;
        }
        let result = self.generate(parent_id);
        if let Ok(children) = &result {
            debug!(parent_id, count = children.len(), "Generated mock children");
        }
        result
    }
}
