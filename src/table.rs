use rand::{rngs::SmallRng, SeedableRng};
use tracing::{debug, info, warn};

use crate::{
    config::TableConfig,
    error::{StoreError, TableError},
    records::{GameResult, LeaderboardEntry, RecordStore, Summary},
    round::{Resolution, Round},
    session::SessionStore,
    view::RoundView,
};

/// Runs one action per call: load the session's round, apply the action,
/// record a finished round, save the round back. The record store keys
/// results by round id, so an action retried after a failed save cannot
/// record the same round twice.
pub struct Table<S, R> {
    config: TableConfig,
    sessions: S,
    records: R,
    rng: SmallRng,
}

impl<S: SessionStore, R: RecordStore> Table<S, R> {
    pub fn new(config: TableConfig, sessions: S, records: R) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Table {
            config,
            sessions,
            records,
            rng,
        }
    }

    /// Deals a fresh round, replacing whatever the session held.
    pub fn start(&mut self, session_id: &str) -> Result<RoundView, TableError> {
        let round = Round::deal(&mut self.rng)?;
        self.sessions.save(session_id, &round)?;
        debug!(session_id, "round started");
        Ok(RoundView::from(&round))
    }

    pub fn hit(&mut self, session_id: &str, user: &str) -> Result<RoundView, TableError> {
        let mut round = self.load(session_id)?;
        let resolution = round.hit().map_err(|err| {
            warn!(session_id, %err, "hit rejected");
            err
        })?;
        if let Some(resolution) = resolution {
            self.record(user, &mut round, resolution)?;
        }
        self.sessions.save(session_id, &round)?;
        Ok(RoundView::from(&round))
    }

    pub fn stand(&mut self, session_id: &str, user: &str) -> Result<RoundView, TableError> {
        let mut round = self.load(session_id)?;
        let resolution = round.stand().map_err(|err| {
            warn!(session_id, %err, "stand rejected");
            err
        })?;
        self.record(user, &mut round, resolution)?;
        self.sessions.save(session_id, &round)?;
        Ok(RoundView::from(&round))
    }

    /// The session's round as currently shown, if one was ever dealt.
    pub fn current(&self, session_id: &str) -> Result<Option<RoundView>, TableError> {
        let round = self.sessions.load(session_id)?;
        Ok(round.as_ref().map(RoundView::from))
    }

    pub fn leave(&mut self, session_id: &str) -> Result<(), TableError> {
        self.sessions.clear(session_id)?;
        Ok(())
    }

    pub fn summary(&self, user: &str) -> Result<Summary, TableError> {
        Ok(self.records.summary(user)?)
    }

    pub fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, TableError> {
        Ok(self.records.top_n(self.config.leaderboard_size)?)
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    pub fn sessions_mut(&mut self) -> &mut S {
        &mut self.sessions
    }

    pub fn records(&self) -> &R {
        &self.records
    }

    fn load(&self, session_id: &str) -> Result<Round, StoreError> {
        Ok(self.sessions.load(session_id)?.unwrap_or_default())
    }

    fn record(
        &mut self,
        user: &str,
        round: &mut Round,
        resolution: Resolution,
    ) -> Result<(), StoreError> {
        if round.is_recorded() {
            warn!(user, "round already recorded");
            return Ok(());
        }
        let appended = self
            .records
            .append(GameResult::new(round.id(), user, resolution))?;
        round.mark_recorded();
        if !appended {
            warn!(user, round_id = round.id(), "result already stored");
            return Ok(());
        }
        info!(
            user,
            round_id = round.id(),
            player_score = resolution.player_score,
            dealer_score = resolution.dealer_score,
            outcome = ?resolution.outcome,
            "result recorded"
        );
        Ok(())
    }
}
