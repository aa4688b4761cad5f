//! Run scoring for the tracked human actor.

use std::collections::BTreeMap;

use crate::events::{InteractionEvent, InteractionObserver};
use crate::ids::ActorId;

/// Minutes of in-world time one turn represents.
pub const MINUTES_PER_TURN: u64 = 2;

/// Whole days and hours an actor lived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetailedLifetime {
    pub days: u64,
    pub hours: u64,
}

impl DetailedLifetime {
    pub fn from_turns(turns: u64) -> Self {
        let hours_total = turns * MINUTES_PER_TURN / 60;
        Self {
            days: hours_total / 24,
            hours: hours_total % 24,
        }
    }
}

/// Counts survived turns and defeats scored by one actor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreManager {
    player: ActorId,
    turns: u64,
    frags: u32,
    perks_leveled: u32,
    victims: BTreeMap<ActorId, u64>,
    alive: bool,
    exited: bool,
}

impl ScoreManager {
    pub fn new(player: ActorId) -> Self {
        Self {
            player,
            turns: 0,
            frags: 0,
            perks_leveled: 0,
            victims: BTreeMap::new(),
            alive: true,
            exited: false,
        }
    }

    pub fn player(&self) -> ActorId {
        self.player
    }

    pub fn turns(&self) -> u64 {
        self.turns
    }

    pub fn frags(&self) -> u32 {
        self.frags
    }

    pub fn perks_leveled(&self) -> u32 {
        self.perks_leveled
    }

    /// Turn on which each victim fell.
    pub fn victims(&self) -> &BTreeMap<ActorId, u64> {
        &self.victims
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn has_exited(&self) -> bool {
        self.exited
    }

    pub fn lifetime(&self) -> DetailedLifetime {
        DetailedLifetime::from_turns(self.turns)
    }
}

impl InteractionObserver for ScoreManager {
    fn on_event(&mut self, event: &InteractionEvent) {
        match event {
            InteractionEvent::ActorDied { actor, .. } if *actor == self.player => self.alive = false,
            InteractionEvent::ActorDied {
                actor,
                killer: Some(killer),
            } if *killer == self.player => {
                self.frags += 1;
                self.victims.insert(*actor, self.turns);
            }
            InteractionEvent::PerkLeveledUp { actor, .. } if *actor == self.player => self.perks_leveled += 1,
            InteractionEvent::SectorExit { actors, .. } if actors.contains(&self.player) => self.exited = true,
            _ => {}
        }
    }

    fn on_turn_end(&mut self, _turn: u64) {
        if self.alive {
            self.turns += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifetime_splits_turns_into_days_and_hours() {
        assert_eq!(DetailedLifetime::from_turns(0), DetailedLifetime::default());
        // 29 turns are 58 minutes.
        assert_eq!(DetailedLifetime::from_turns(29).hours, 0);
        assert_eq!(DetailedLifetime::from_turns(30), DetailedLifetime { days: 0, hours: 1 });
        assert_eq!(DetailedLifetime::from_turns(750), DetailedLifetime { days: 1, hours: 1 });
    }

    #[test]
    fn counts_turns_until_death_and_frags() {
        let (player, rat) = (ActorId(0), ActorId(1));
        let mut score = ScoreManager::new(player);

        score.on_turn_end(1);
        score.on_event(&InteractionEvent::ActorDied {
            actor: rat,
            killer: Some(player),
        });
        score.on_turn_end(2);
        score.on_event(&InteractionEvent::ActorDied {
            actor: player,
            killer: None,
        });
        score.on_turn_end(3);
        score.on_turn_end(4);

        assert_eq!(score.turns(), 2);
        assert_eq!(score.frags(), 1);
        assert_eq!(score.victims().get(&rat), Some(&1));
        assert!(!score.is_alive());
    }

    #[test]
    fn foreign_kills_do_not_count() {
        let mut score = ScoreManager::new(ActorId(0));
        score.on_event(&InteractionEvent::ActorDied {
            actor: ActorId(2),
            killer: Some(ActorId(1)),
        });
        assert_eq!(score.frags(), 0);
    }
}
