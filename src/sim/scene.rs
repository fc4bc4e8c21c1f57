//! Scene: body registry, force creators and the simulation step
//!
//! Bodies keep insertion order, so `body(index)` is stable until a body in
//! front of it is swept. Force creators refer to bodies by [`BodyId`] and are
//! registered together with the bodies they depend on; sweeping any of those
//! bodies drops the registration (and whatever state it owns) first.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::body::Body;

/// Initial body capacity of a new scene
const INITIAL_BODY_CAPACITY: usize = 10;

/// Stable handle for a body inside a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(u32);

impl BodyId {
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Slot {
    id: BodyId,
    body: Body,
}

/// The scene's ordered body store
///
/// Force creators receive this during a step. It allows lookups and mutation
/// of bodies but no insertion or deletion.
pub struct Bodies {
    /// Sorted by id (ids are handed out in insertion order)
    slots: Vec<Slot>,
}

impl Bodies {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current index of a body, if it is still in the scene
    pub fn index_of(&self, id: BodyId) -> Option<usize> {
        self.slots.binary_search_by_key(&id, |slot| slot.id).ok()
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.index_of(id).map(|i| &self.slots[i].body)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.index_of(id).map(|i| &mut self.slots[i].body)
    }

    /// Mutable access to two distinct bodies at once
    ///
    /// Returns `None` if either is missing or both ids are the same.
    pub fn pair_mut(&mut self, a: BodyId, b: BodyId) -> Option<(&mut Body, &mut Body)> {
        let (i, j) = (self.index_of(a)?, self.index_of(b)?);
        if i == j {
            return None;
        }
        if i < j {
            let (lo, hi) = self.slots.split_at_mut(j);
            Some((&mut lo[i].body, &mut hi[0].body))
        } else {
            let (lo, hi) = self.slots.split_at_mut(i);
            Some((&mut hi[0].body, &mut lo[j].body))
        }
    }

    /// Body at `index`; panics when out of range
    pub fn at(&self, index: usize) -> &Body {
        &self.slot(index).body
    }

    /// Body at `index`; panics when out of range
    pub fn at_mut(&mut self, index: usize) -> &mut Body {
        self.check_index(index);
        &mut self.slots[index].body
    }

    /// Id of the body at `index`; panics when out of range
    pub fn id_at(&self, index: usize) -> BodyId {
        self.slot(index).id
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.slots.iter().map(|slot| (slot.id, &slot.body))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyId, &mut Body)> {
        self.slots.iter_mut().map(|slot| (slot.id, &mut slot.body))
    }

    fn slot(&self, index: usize) -> &Slot {
        self.check_index(index);
        &self.slots[index]
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.slots.len(),
            "body index {index} out of range (scene has {} bodies)",
            self.slots.len()
        );
    }
}

/// Something that applies forces, impulses or removals once per step
///
/// Any `FnMut(&mut Bodies)` closure is a force creator; its captures are its
/// auxiliary state.
pub trait ForceCreator {
    fn apply(&mut self, bodies: &mut Bodies);
}

impl<F> ForceCreator for F
where
    F: FnMut(&mut Bodies),
{
    fn apply(&mut self, bodies: &mut Bodies) {
        self(bodies)
    }
}

/// A force creator plus the bodies whose removal unregisters it
struct ForceRegistration {
    creator: Box<dyn ForceCreator>,
    dependents: Vec<BodyId>,
}

/// A collection of bodies and the force creators acting on them
pub struct Scene {
    bodies: Bodies,
    force_creators: Vec<ForceRegistration>,
    next_id: u32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("bodies", &self.bodies.len())
            .field("force_creators", &self.force_creators.len())
            .finish()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            bodies: Bodies::with_capacity(INITIAL_BODY_CAPACITY),
            force_creators: Vec::new(),
            next_id: 0,
        }
    }

    /// Append a body; it takes the next index and a fresh id
    pub fn add_body(&mut self, body: Body) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.slots.push(Slot { id, body });
        id
    }

    #[inline]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Body at `index`; panics when out of range
    pub fn body(&self, index: usize) -> &Body {
        self.bodies.at(index)
    }

    /// Body at `index`; panics when out of range
    pub fn body_mut(&mut self, index: usize) -> &mut Body {
        self.bodies.at_mut(index)
    }

    pub fn try_body(&self, index: usize) -> Option<&Body> {
        self.bodies.slots.get(index).map(|slot| &slot.body)
    }

    /// Id of the body at `index`; panics when out of range
    pub fn body_id(&self, index: usize) -> BodyId {
        self.bodies.id_at(index)
    }

    pub fn find(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn find_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    pub fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.index_of(id)
    }

    pub fn bodies(&self) -> &Bodies {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut Bodies {
        &mut self.bodies
    }

    /// Mark the body at `index` for removal on the next tick
    pub fn remove_body(&mut self, index: usize) {
        self.bodies.at_mut(index).remove();
    }

    /// Register a force creator that is never unregistered automatically
    pub fn add_force_creator<C>(&mut self, creator: C)
    where
        C: ForceCreator + 'static,
    {
        self.add_bodies_force_creator(creator, Vec::new());
    }

    /// Register a force creator that lives only as long as all of `dependents`
    ///
    /// Panics if a dependent is not in the scene.
    pub fn add_bodies_force_creator<C>(&mut self, creator: C, dependents: Vec<BodyId>)
    where
        C: ForceCreator + 'static,
    {
        for &id in &dependents {
            assert!(
                self.bodies.contains(id),
                "force creator depends on body {id}, which is not in the scene"
            );
        }
        self.force_creators.push(ForceRegistration {
            creator: Box::new(creator),
            dependents,
        });
    }

    #[inline]
    pub fn force_creator_count(&self) -> usize {
        self.force_creators.len()
    }

    /// Number of registered force creators that depend on `id`
    pub fn force_creators_on(&self, id: BodyId) -> usize {
        self.force_creators
            .iter()
            .filter(|reg| reg.dependents.contains(&id))
            .count()
    }

    /// Advance the scene by `dt`
    ///
    /// Runs every force creator in registration order, then walks the bodies
    /// from the highest index down: removed bodies are dropped along with
    /// every registration depending on them, all others are integrated once.
    pub fn tick(&mut self, dt: f64) {
        for reg in &mut self.force_creators {
            reg.creator.apply(&mut self.bodies);
        }

        for index in (0..self.bodies.len()).rev() {
            if !self.bodies.slots[index].body.is_removed() {
                self.bodies.slots[index].body.tick(dt);
                continue;
            }

            let id = self.bodies.slots[index].id;
            let before = self.force_creators.len();
            for j in (0..self.force_creators.len()).rev() {
                if self.force_creators[j].dependents.contains(&id) {
                    self.force_creators.remove(j);
                }
            }
            // Drops the body and its payload
            drop(self.bodies.slots.remove(index));

            log::debug!(
                "swept body {id} at index {index}, dropped {} force creator(s)",
                before - self.force_creators.len()
            );
        }
    }

    /// Rotate every body about its centroid by `rotation_speed * dt`
    ///
    /// Kept out of `tick` so the integrator stays translational.
    pub fn spin_bodies(&mut self, dt: f64) {
        for (_, body) in self.bodies.iter_mut() {
            body.spin(dt);
        }
    }
}
