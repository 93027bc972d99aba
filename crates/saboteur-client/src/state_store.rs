//! The single current authoritative snapshot.
//!
//! A snapshot is replaced wholesale by swapping the stored [`Arc`]. Readers
//! borrow it for the duration of one tick and so never observe a
//! half-applied update; the `Arc` handed back by
//! [`StateStore::apply_snapshot`] outlives later replacements.

use std::sync::Arc;

use saboteur_core::protocol::GameSnapshot;
use tracing::{debug, warn};

use crate::error::ProtocolError;

#[derive(Debug, Default)]
pub struct StateStore {
    current: Option<Arc<GameSnapshot>>,
    /// Number of snapshots applied since start-up.
    applied: u64,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `raw` as a complete snapshot and make it current.
    ///
    /// On failure the previous snapshot is kept.
    pub fn apply_snapshot(&mut self, raw: &str) -> Result<Arc<GameSnapshot>, ProtocolError> {
        if raw.trim().is_empty() {
            warn!("empty frame");
            return Err(ProtocolError::Empty);
        }
        let snapshot = GameSnapshot::from_json(raw).map_err(|e| {
            warn!(error = %e, "malformed snapshot");
            ProtocolError::Malformed(e)
        })?;
        let snapshot = Arc::new(snapshot);
        self.current = Some(Arc::clone(&snapshot));
        self.applied += 1;
        debug!(
            status = ?snapshot.status,
            level = snapshot.level,
            points = snapshot.player_points,
            count = self.applied,
            "snapshot applied"
        );
        Ok(snapshot)
    }

    pub fn current(&self) -> Option<&GameSnapshot> {
        self.current.as_deref()
    }
}
