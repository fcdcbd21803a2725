use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type BlockHeight = u64;

/// One record per block seen in a chain-head snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockObservation {
    pub producer_id: String,
    pub observed_at: DateTime<Utc>,
    pub is_watched: bool,
    pub height: BlockHeight,
}

/// The ordered output of one poll cycle, in source order.
pub type ObservationBatch = Vec<BlockObservation>;

/// The fixed set of producer identities the operator tracks.
///
/// Membership is exact string equality, case-sensitive. Non-emptiness is
/// enforced at configuration load, before a poller is constructed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchList {
    members: HashSet<String>,
}

impl WatchList {
    pub fn new<I>(producer_ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            members: producer_ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, producer_id: &str) -> bool {
        self.members.contains(producer_id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
