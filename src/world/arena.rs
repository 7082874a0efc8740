//! Dense body storage addressed through generation-checked handles.
//!
//! Bodies live contiguously so the solver can iterate and split them by
//! index. A handle resolves through a slot table to the current dense
//! index; removal swaps the last body into the hole and patches that
//! body's slot. The arena alone records which handle owns each dense
//! index, so callers may overwrite a body wholesale.

use std::fmt;

use crate::objects::RigidBody;

/// Stable reference to a body owned by a [`PhysicsWorld`](super::PhysicsWorld).
///
/// A handle stays valid until its body is destroyed or the world is reset.
/// Stale handles are detected by generation and never alias a newer body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    /// Slot number; reused after the body is destroyed.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    dense: Option<usize>,
}

#[derive(Debug, Default)]
pub(crate) struct BodyArena {
    bodies: Vec<RigidBody>,
    // Owner of each dense index, parallel to `bodies`.
    owners: Vec<BodyHandle>,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl BodyArena {
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn insert(&mut self, body: RigidBody) -> BodyHandle {
        let dense = self.bodies.len();
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.dense = Some(dense);
                BodyHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    dense: Some(dense),
                });
                BodyHandle {
                    index,
                    generation: 0,
                }
            }
        };
        self.bodies.push(body);
        self.owners.push(handle);
        handle
    }

    /// Removes the body; the previously last body takes its dense index.
    pub fn remove(&mut self, handle: BodyHandle) -> Option<RigidBody> {
        let dense = self.index_of(handle)?;
        let body = self.bodies.swap_remove(dense);
        self.owners.swap_remove(dense);
        if let Some(moved) = self.owners.get(dense) {
            self.slots[moved.index as usize].dense = Some(dense);
        }
        let slot = &mut self.slots[handle.index as usize];
        slot.dense = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        Some(body)
    }

    /// Drops every body and invalidates every outstanding handle.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.owners.clear();
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.dense.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index as u32);
        }
        // Hand out low slot numbers first.
        self.free.reverse();
    }

    pub fn index_of(&self, handle: BodyHandle) -> Option<usize> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.dense)
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.index_of(handle).map(|i| &self.bodies[i])
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.index_of(handle).map(move |i| &mut self.bodies[i])
    }

    /// Handles in dense order.
    pub fn handles(&self) -> &[BodyHandle] {
        &self.owners
    }

    pub fn as_slice(&self) -> &[RigidBody] {
        &self.bodies
    }

    pub fn as_mut_slice(&mut self) -> &mut [RigidBody] {
        &mut self.bodies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use crate::shapes::{Circle, Shape};

    fn ball(x: f64) -> RigidBody {
        RigidBody::new(Shape::Circle(Circle::new(1.0)), Vec2::new(x, 0.0), 1.0)
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut arena = BodyArena::default();
        let a = arena.insert(ball(1.0));
        let b = arena.insert(ball(2.0));
        assert_ne!(a, b);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a).unwrap().position.x, 1.0);
        assert_eq!(arena.handles(), &[a, b]);
        assert_eq!(arena.index_of(b), Some(1));
    }

    #[test]
    fn test_remove_swaps_last_into_hole() {
        let mut arena = BodyArena::default();
        let a = arena.insert(ball(1.0));
        let _b = arena.insert(ball(2.0));
        let c = arena.insert(ball(3.0));

        let removed = arena.remove(a).unwrap();
        assert_eq!(removed.position.x, 1.0);
        assert_eq!(arena.len(), 2);
        // c moved into dense slot 0 and is still reachable.
        assert_eq!(arena.index_of(c), Some(0));
        assert_eq!(arena.get(c).unwrap().position.x, 3.0);
        assert_eq!(arena.handles()[0], c);
    }

    #[test]
    fn test_overwritten_body_keeps_its_slot() {
        let mut arena = BodyArena::default();
        let a = arena.insert(ball(1.0));
        let b = arena.insert(ball(2.0));
        let c = arena.insert(ball(3.0));

        // Replace c with a copy of a; slot bookkeeping must not follow the contents.
        let copy = arena.get(a).unwrap().clone();
        *arena.get_mut(c).unwrap() = copy;

        arena.remove(a).unwrap();
        assert_eq!(arena.index_of(c), Some(0));
        assert_eq!(arena.index_of(b), Some(1));
        assert_eq!(arena.get(c).unwrap().position.x, 1.0);
        arena.remove(c).unwrap();
        assert_eq!(arena.get(b).unwrap().position.x, 2.0);
        assert_eq!(arena.handles(), &[b]);
    }

    #[test]
    fn test_stale_handle_is_rejected_after_slot_reuse() {
        let mut arena = BodyArena::default();
        let a = arena.insert(ball(1.0));
        arena.remove(a).unwrap();
        assert!(arena.get(a).is_none());
        assert!(arena.remove(a).is_none());

        let d = arena.insert(ball(4.0));
        assert_eq!(d.index(), a.index());
        assert_ne!(d.generation(), a.generation());
        assert!(arena.get(a).is_none());
        assert_eq!(arena.get(d).unwrap().position.x, 4.0);
    }

    #[test]
    fn test_clear_invalidates_everything() {
        let mut arena = BodyArena::default();
        let a = arena.insert(ball(1.0));
        let b = arena.insert(ball(2.0));
        arena.clear();
        assert_eq!(arena.len(), 0);
        assert!(arena.get(a).is_none());
        assert!(arena.get(b).is_none());

        let c = arena.insert(ball(3.0));
        assert_eq!(c.index(), 0);
        assert!(arena.get(c).is_some());
    }

    #[test]
    fn test_handle_display() {
        let mut arena = BodyArena::default();
        let a = arena.insert(ball(1.0));
        assert_eq!(a.to_string(), "0v0");
    }
}
