//! Actors placed in a sector and the manager that owns them.

use crate::ids::{ActorId, NodeId, Player};
use crate::person::Person;

/// A person standing on the map, owned by a player.
#[derive(Debug)]
pub struct Actor {
    pub id: ActorId,
    pub player: Player,
    pub person: Person,
    /// Back-reference kept in sync with the map's occupancy.
    pub node: NodeId,
    /// Behaviour family used to pick a patrol strategy for bots.
    pub archetype: Option<String>,
}

impl Actor {
    pub fn is_dead(&self) -> bool {
        self.person.is_dead()
    }

    pub fn is_hostile_to(&self, other: &Actor) -> bool {
        self.player != other.player
    }
}

/// Live actors ordered by id.
#[derive(Debug, Default)]
pub struct ActorManager {
    actors: Vec<Actor>,
    next_id: u32,
}

impl ActorManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an actor with the next free id.
    pub(crate) fn spawn(
        &mut self,
        player: Player,
        person: Person,
        node: NodeId,
        archetype: Option<String>,
    ) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        self.actors.push(Actor {
            id,
            player,
            person,
            node,
            archetype,
        });
        id
    }

    pub(crate) fn remove(&mut self, id: ActorId) -> Option<Actor> {
        let index = self.position(id)?;
        Some(self.actors.remove(index))
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(self.position(id)?)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        let index = self.position(id)?;
        self.actors.get_mut(index)
    }

    /// Two distinct actors borrowed mutably at once.
    pub fn pair_mut(&mut self, a: ActorId, b: ActorId) -> Option<(&mut Actor, &mut Actor)> {
        let (ia, ib) = (self.position(a)?, self.position(b)?);
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (left, right) = self.actors.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.actors.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> Vec<ActorId> {
        self.actors.iter().map(|a| a.id).collect()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn humans(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter().filter(|a| a.player.is_human())
    }

    fn position(&self, id: ActorId) -> Option<usize> {
        self.actors.binary_search_by_key(&id, |a| a.id).ok()
    }
}
