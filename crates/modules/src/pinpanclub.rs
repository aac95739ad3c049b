// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ping-pong club ladder
//!
//! Finished matches update an Elo rating table. Every player whose ladder
//! position changed is announced with a nested `pinpanclub.ranking.updated`
//! event.

use crate::{to_payload, ModuleError};
use agora_core::{
    handler_fn, BusError, Event, EventBus, HandlerError, IdGen, Module, ModuleEmitter,
    PublishOutcome, SequentialIdGen, SubscriptionId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const MATCH_FINISHED: &str = "pinpanclub.match.finished";
pub const RANKING_UPDATED: &str = "pinpanclub.ranking.updated";

pub const INITIAL_RATING: f64 = 1200.0;
pub const K_FACTOR: f64 = 32.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFinished {
    pub match_id: String,
    pub winner_id: String,
    pub loser_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingUpdated {
    pub player_id: String,
    pub old_rank: Option<u32>,
    pub new_rank: u32,
    pub rating: i64,
}

/// One row of the ladder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub rank: u32,
    pub player_id: String,
    pub rating: f64,
    pub wins: u32,
    pub losses: u32,
}

#[derive(Debug, Clone)]
struct Player {
    rating: f64,
    wins: u32,
    losses: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            rating: INITIAL_RATING,
            wins: 0,
            losses: 0,
        }
    }
}

#[derive(Default)]
struct Ladder {
    players: HashMap<String, Player>,
}

impl Ladder {
    /// Standings ordered by rating, ties broken by player id
    fn standings(&self) -> Vec<Standing> {
        let mut rows: Vec<_> = self.players.iter().collect();
        rows.sort_by(|(a_id, a), (b_id, b)| {
            b.rating
                .total_cmp(&a.rating)
                .then_with(|| a_id.cmp(b_id))
        });
        rows.into_iter()
            .enumerate()
            .map(|(i, (id, p))| Standing {
                rank: i as u32 + 1,
                player_id: id.clone(),
                rating: p.rating,
                wins: p.wins,
                losses: p.losses,
            })
            .collect()
    }

    fn ranks(&self) -> HashMap<String, u32> {
        self.standings()
            .into_iter()
            .map(|s| (s.player_id, s.rank))
            .collect()
    }

    /// Apply a result and return the players whose rank changed
    fn apply(&mut self, result: &MatchFinished) -> Vec<RankingUpdated> {
        let before = self.ranks();

        let winner = self.players.entry(result.winner_id.clone()).or_default().rating;
        let loser = self.players.entry(result.loser_id.clone()).or_default().rating;
        let (winner, loser) = elo_update(winner, loser, K_FACTOR);

        if let Some(p) = self.players.get_mut(&result.winner_id) {
            p.rating = winner;
            p.wins += 1;
        }
        if let Some(p) = self.players.get_mut(&result.loser_id) {
            p.rating = loser;
            p.losses += 1;
        }

        self.standings()
            .into_iter()
            .filter_map(|s| {
                let old_rank = before.get(&s.player_id).copied();
                (old_rank != Some(s.rank)).then(|| RankingUpdated {
                    player_id: s.player_id,
                    old_rank,
                    new_rank: s.rank,
                    rating: s.rating.round() as i64,
                })
            })
            .collect()
    }
}

/// New (winner, loser) ratings after one game
pub fn elo_update(winner: f64, loser: f64, k: f64) -> (f64, f64) {
    let expected = 1.0 / (1.0 + 10f64.powf((loser - winner) / 400.0));
    let delta = k * (1.0 - expected);
    (winner + delta, loser - delta)
}

pub struct Pinpanclub {
    emitter: ModuleEmitter,
    ladder: Arc<Mutex<Ladder>>,
    match_ids: SequentialIdGen,
}

impl Pinpanclub {
    pub fn new(bus: &EventBus) -> Self {
        Self {
            emitter: bus.emitter("pinpanclub"),
            ladder: Arc::default(),
            match_ids: SequentialIdGen::new("match"),
        }
    }

    /// Announce a finished match; the ladder updates in reaction
    pub async fn record_match(
        &self,
        winner_id: &str,
        loser_id: &str,
    ) -> Result<PublishOutcome, ModuleError> {
        if winner_id == loser_id {
            return Err(ModuleError::Invalid(format!(
                "{} cannot play against themselves",
                winner_id
            )));
        }
        let body = MatchFinished {
            match_id: self.match_ids.next(),
            winner_id: winner_id.to_string(),
            loser_id: loser_id.to_string(),
        };
        Ok(self.emitter.emit(MATCH_FINISHED, to_payload(&body)?).await?)
    }

    pub fn standings(&self) -> Vec<Standing> {
        self.ladder
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .standings()
    }
}

async fn update_ladder(
    ladder: &Mutex<Ladder>,
    emitter: &ModuleEmitter,
    event: &Event,
) -> Result<(), HandlerError> {
    let result: MatchFinished = event.payload_as()?;
    if result.winner_id == result.loser_id {
        return Err(HandlerError::msg(format!(
            "match {} has the same winner and loser",
            result.match_id
        )));
    }

    let changes = ladder
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .apply(&result);
    tracing::debug!(
        match_id = %result.match_id,
        changes = changes.len(),
        "ladder updated"
    );

    for change in changes {
        let payload = to_payload(&change).map_err(HandlerError::other)?;
        emitter.emit(RANKING_UPDATED, payload).await?;
    }
    Ok(())
}

impl Module for Pinpanclub {
    fn name(&self) -> &'static str {
        "pinpanclub"
    }

    fn register(&self, bus: &EventBus) -> Result<Vec<SubscriptionId>, BusError> {
        let ladder = Arc::clone(&self.ladder);
        let emitter = self.emitter.clone();
        let handler = handler_fn("pinpanclub.update_ladder", move |event| {
            let ladder = Arc::clone(&ladder);
            let emitter = emitter.clone();
            async move { update_ladder(&ladder, &emitter, &event).await }
        });
        Ok(vec![bus.subscribe(MATCH_FINISHED, handler)?])
    }
}

#[cfg(test)]
#[path = "pinpanclub_tests.rs"]
mod tests;
