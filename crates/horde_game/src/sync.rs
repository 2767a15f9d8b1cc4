//! Body–visual association table

use crate::scene::RenderScene;
use horde_core::NodeId;
use horde_physics::{PhysicsWorld, RigidBodyHandle};

/// Which side of a pair owns the transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncMode {
    /// The body moves; its pose is copied onto the node after each step
    PhysicsDriven,
    /// The node moves and drags the body along itself (agents)
    Excluded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Link {
    body: RigidBodyHandle,
    node: NodeId,
    mode: SyncMode,
}

/// One visual node per physics body
#[derive(Debug, Clone, Default)]
pub struct BodyVisualMap {
    links: Vec<Link>,
}

impl BodyVisualMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pair. Returns the node previously linked to `body`, if any
    pub fn insert(&mut self, body: RigidBodyHandle, node: NodeId, mode: SyncMode) -> Option<NodeId> {
        if let Some(link) = self.links.iter_mut().find(|l| l.body == body) {
            let old = link.node;
            link.node = node;
            link.mode = mode;
            return Some(old);
        }
        self.links.push(Link { body, node, mode });
        None
    }

    /// Drop a pair, returning its node
    pub fn remove(&mut self, body: RigidBodyHandle) -> Option<NodeId> {
        let index = self.links.iter().position(|l| l.body == body)?;
        Some(self.links.remove(index).node)
    }

    pub fn node(&self, body: RigidBodyHandle) -> Option<NodeId> {
        self.links.iter().find(|l| l.body == body).map(|l| l.node)
    }

    pub fn mode(&self, body: RigidBodyHandle) -> Option<SyncMode> {
        self.links.iter().find(|l| l.body == body).map(|l| l.mode)
    }

    /// Registered pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (RigidBodyHandle, NodeId, SyncMode)> + '_ {
        self.links.iter().map(|l| (l.body, l.node, l.mode))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn clear(&mut self) {
        self.links.clear();
    }

    /// Copy every physics-driven body's pose onto its node.
    ///
    /// A pure copy of body state: running it twice without a physics step in
    /// between changes nothing. Returns the number of nodes written.
    pub fn sync<S: RenderScene>(&self, physics: &PhysicsWorld, scene: &mut S) -> usize {
        let mut written = 0;
        for link in self.links.iter().filter(|l| l.mode == SyncMode::PhysicsDriven) {
            let pose = physics
                .body_position(link.body)
                .and_then(|p| physics.body_rotation(link.body).map(|r| (p, r)));
            match pose {
                Ok((position, rotation)) => {
                    scene.set_transform(link.node, position, rotation);
                    written += 1;
                }
                Err(e) => log::trace!("skipping {} during sync: {}", link.node, e),
            }
        }
        written
    }
}
