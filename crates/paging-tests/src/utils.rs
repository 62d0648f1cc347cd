use connectors::{error::SourceError, kv::source::SledSource};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Name of the sled tree the fixtures are written to.
pub const ACTOR_TREE: &str = "actor";

/// Row type stored by the fixtures.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Actor {
    pub actor_id: u64,
    pub first_name: String,
    pub last_name: String,
}

pub fn actor(actor_id: u64) -> Actor {
    Actor {
        actor_id,
        first_name: format!("first-{actor_id}"),
        last_name: format!("last-{actor_id}"),
    }
}

/// Open a sled source at `dir` holding actors `0..count`, keyed by id.
pub fn seed_actors(dir: &Path, count: u64) -> Result<SledSource<Actor>, SourceError> {
    let mut source = SledSource::open(dir, ACTOR_TREE)?;
    for id in 0..count {
        source.insert(id.to_be_bytes(), &actor(id))?;
    }
    info!("Seeded {count} actors into tree '{ACTOR_TREE}'");
    Ok(source)
}
