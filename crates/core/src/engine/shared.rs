use std::{future::Future, sync::Arc};

use anyhow::Result;
use parking_lot::RwLock;
use tracing::debug;

use crate::models::{Player, ProjectedStats};

use super::{checked, ProspectEngine, RefreshReport};

/// Cloneable handle to a [`ProspectEngine`] shared between a renderer and a
/// background refresh.
///
/// Queries take a read lock for their duration only. A refresh awaits each
/// prediction without holding any lock and applies each result under a short
/// write lock, so concurrent readers observe every player either before or
/// after its own update. Callers must still run at most one `load` or
/// refresh at a time.
#[derive(Debug, Clone, Default)]
pub struct SharedEngine {
    inner: Arc<RwLock<ProspectEngine>>,
}

impl SharedEngine {
    /// Wrap an engine for sharing.
    pub fn new(engine: ProspectEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    /// Replace the whole player collection.
    pub fn load(&self, players: Vec<Player>) {
        self.inner.write().load(players);
    }

    /// Run a query against the current state.
    pub fn read<R>(&self, query: impl FnOnce(&ProspectEngine) -> R) -> R {
        query(&self.inner.read())
    }

    /// Copy of the current players.
    pub fn snapshot(&self) -> Vec<Player> {
        self.inner.read().players()
    }

    /// Refresh every player's projection from `predictor`.
    ///
    /// Players are taken from a snapshot at the start. A result is dropped if
    /// its slot no longer holds the same player (the collection was replaced
    /// mid-refresh).
    pub async fn refresh_projections<F, Fut>(&self, mut predictor: F) -> RefreshReport
    where
        F: FnMut(Player) -> Fut,
        Fut: Future<Output = Result<ProjectedStats>>,
    {
        let snapshot = self.snapshot();
        let mut report = RefreshReport::default();
        for (index, player) in snapshot.into_iter().enumerate() {
            report.attempted += 1;
            match checked(predictor(player.clone()).await) {
                Ok(projection) => {
                    let applied = self
                        .inner
                        .write()
                        .replace_projection(index, player.id(), projection);
                    if applied {
                        report.updated += 1;
                    } else {
                        debug!(
                            player_id = player.id(),
                            "player no longer loaded; projection dropped"
                        );
                    }
                }
                Err(err) => report.record_failure(&player, &err),
            }
        }
        report.log_completion();
        report
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;
    use crate::engine::fixtures::{hitter, names};

    fn projection(debut: &str) -> ProjectedStats {
        ProjectedStats::new(0.85, 4.2, Vec::new(), debut)
    }

    #[tokio::test]
    async fn readers_see_partial_progress() {
        let engine = SharedEngine::new(ProspectEngine::new());
        engine.load(vec![
            hitter(1, "One", 0.90, 5.0),
            hitter(2, "Two", 0.80, 4.0),
            hitter(3, "Three", 0.70, 3.0),
        ]);

        let probe = engine.clone();
        let report = engine
            .refresh_projections(move |player| {
                let probe = probe.clone();
                async move {
                    if player.id() == 2 {
                        let seen = probe.snapshot();
                        assert_eq!(seen[0].projected_stats().projected_debut, "2026");
                        assert_eq!(seen[1].projected_stats().projected_debut, "2024");
                        return Err(anyhow!("model offline"));
                    }
                    Ok(projection("2026"))
                }
            })
            .await;

        assert_eq!(report.updated, 2);
        assert_eq!(report.failures.len(), 1);
        let debuts: Vec<String> = engine
            .snapshot()
            .iter()
            .map(|p| p.projected_stats().projected_debut.clone())
            .collect();
        assert_eq!(debuts, vec!["2026", "2024", "2026"]);
    }

    #[tokio::test]
    async fn results_for_replaced_players_are_dropped() {
        let engine = SharedEngine::new(ProspectEngine::new());
        engine.load(vec![hitter(1, "One", 0.90, 5.0), hitter(2, "Two", 0.80, 4.0)]);

        let probe = engine.clone();
        let report = engine
            .refresh_projections(move |player| {
                let probe = probe.clone();
                async move {
                    if player.id() == 1 {
                        probe.load(vec![hitter(7, "Replacement", 0.5, 1.0)]);
                    }
                    Ok(projection("2026"))
                }
            })
            .await;

        assert_eq!(report.attempted, 2);
        assert_eq!(report.updated, 0);
        let current = engine.snapshot();
        assert_eq!(names(&current), vec!["Replacement"]);
        assert_eq!(current[0].projected_stats().projected_debut, "2024");
        assert_eq!(engine.read(|e| e.len()), 1);
    }
}
