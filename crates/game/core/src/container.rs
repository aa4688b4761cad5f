//! Loot containers placed on the map (chests, corpses, crates).

use crate::ids::{ContainerId, NodeId};
use crate::inventory::Prop;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropContainer {
    pub id: ContainerId,
    pub node: NodeId,
    pub props: Vec<Prop>,
    /// Map-blocking containers make their node impassable.
    pub is_map_block: bool,
    pub opened: bool,
}

impl PropContainer {
    /// Empties the container and marks it opened.
    pub fn take_props(&mut self) -> Vec<Prop> {
        self.opened = true;
        std::mem::take(&mut self.props)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ContainerManager {
    containers: Vec<PropContainer>,
}

impl ContainerManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, node: NodeId, props: Vec<Prop>, is_map_block: bool) -> ContainerId {
        let id = ContainerId(self.containers.len() as u32);
        self.containers.push(PropContainer {
            id,
            node,
            props,
            is_map_block,
            opened: false,
        });
        id
    }

    pub fn get(&self, id: ContainerId) -> Option<&PropContainer> {
        self.containers.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ContainerId) -> Option<&mut PropContainer> {
        self.containers.get_mut(id.0 as usize)
    }

    pub fn at_node(&self, node: NodeId) -> Option<&PropContainer> {
        self.containers.iter().find(|c| c.node == node)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropContainer> {
        self.containers.iter()
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}
