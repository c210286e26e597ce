#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Road-graph level model for PathX.
//!
//! A level is a directed-weighted graph of intersections and roads plus the
//! metadata the game needs to stage it: image names, start and destination
//! markers, and the opposition counts. Roads reference intersections by
//! arena index ([`IntersectionId`]) rather than by pointer, which keeps the
//! binary layout trivial and avoids cyclic ownership. Levels are mutable in
//! the editor and held immutably once a session starts.

use pathx_core::IntersectionId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A node of the road graph positioned in level space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intersection {
    x: i32,
    y: i32,
    open: bool,
}

impl Intersection {
    /// Creates a new open intersection at the provided coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y, open: true }
    }

    /// Horizontal position of the intersection in level space.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical position of the intersection in level space.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Reports whether traffic may pass through the intersection.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Opens or closes the intersection for traffic.
    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Moves the intersection to a new position.
    pub fn move_to(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }
}

/// An edge of the road graph connecting two intersections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Road {
    from: IntersectionId,
    to: IntersectionId,
    one_way: bool,
    speed_limit: i32,
}

impl Road {
    /// Creates a new road between the two intersections.
    #[must_use]
    pub const fn new(
        from: IntersectionId,
        to: IntersectionId,
        one_way: bool,
        speed_limit: i32,
    ) -> Self {
        Self {
            from,
            to,
            one_way,
            speed_limit,
        }
    }

    /// Intersection the road leaves from.
    #[must_use]
    pub const fn from(&self) -> IntersectionId {
        self.from
    }

    /// Intersection the road arrives at.
    #[must_use]
    pub const fn to(&self) -> IntersectionId {
        self.to
    }

    /// Reports whether the road may only be driven from `from` to `to`.
    #[must_use]
    pub const fn is_one_way(&self) -> bool {
        self.one_way
    }

    /// Speed limit posted along the road.
    #[must_use]
    pub const fn speed_limit(&self) -> i32 {
        self.speed_limit
    }

    /// Updates the posted speed limit.
    pub fn set_speed_limit(&mut self, speed_limit: i32) {
        self.speed_limit = speed_limit;
    }

    /// Reports whether the road can be traversed from the given endpoint.
    #[must_use]
    pub fn traversable_from(&self, id: IntersectionId) -> Option<IntersectionId> {
        if self.from == id {
            Some(self.to)
        } else if self.to == id && !self.one_way {
            Some(self.from)
        } else {
            None
        }
    }
}

/// A complete playable level: the road graph plus staging metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    name: String,
    background_image: String,
    starting_location_image: String,
    destination_image: String,
    intersections: Vec<Intersection>,
    roads: Vec<Road>,
    start: IntersectionId,
    destination: IntersectionId,
    money: i32,
    num_police: i32,
    num_bandits: i32,
    num_zombies: i32,
}

/// Builder-style constructor arguments for [`Level`].
///
/// All fields are public; the struct exists so the codec and the editor can
/// assemble a level without a constructor that takes twelve positional
/// arguments.
#[derive(Clone, Debug, Default)]
pub struct LevelSeed {
    /// Display name of the level.
    pub name: String,
    /// Background image file name.
    pub background_image: String,
    /// Image file name drawn at the starting location.
    pub starting_location_image: String,
    /// Image file name drawn at the destination.
    pub destination_image: String,
    /// Reward for completing the level.
    pub money: i32,
    /// Number of police cars roaming the graph.
    pub num_police: i32,
    /// Number of bandits roaming the graph.
    pub num_bandits: i32,
    /// Number of zombies roaming the graph.
    pub num_zombies: i32,
}

impl Level {
    /// Creates an empty level from staging metadata.
    ///
    /// The level starts with no intersections; callers must add at least one
    /// and then point `start` and `destination` somewhere sensible before
    /// the level passes [`Level::validate`].
    #[must_use]
    pub fn new(seed: LevelSeed) -> Self {
        Self {
            name: seed.name,
            background_image: seed.background_image,
            starting_location_image: seed.starting_location_image,
            destination_image: seed.destination_image,
            intersections: Vec::new(),
            roads: Vec::new(),
            start: IntersectionId::new(0),
            destination: IntersectionId::new(0),
            money: seed.money,
            num_police: seed.num_police,
            num_bandits: seed.num_bandits,
            num_zombies: seed.num_zombies,
        }
    }

    /// Display name of the level.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Background image file name.
    #[must_use]
    pub fn background_image(&self) -> &str {
        &self.background_image
    }

    /// Image file name drawn at the starting location.
    #[must_use]
    pub fn starting_location_image(&self) -> &str {
        &self.starting_location_image
    }

    /// Image file name drawn at the destination.
    #[must_use]
    pub fn destination_image(&self) -> &str {
        &self.destination_image
    }

    /// Intersections composing the road graph, in arena order.
    #[must_use]
    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    /// Roads composing the road graph, in arena order.
    #[must_use]
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    /// Identifier of the starting intersection.
    #[must_use]
    pub const fn start(&self) -> IntersectionId {
        self.start
    }

    /// Identifier of the destination intersection.
    #[must_use]
    pub const fn destination(&self) -> IntersectionId {
        self.destination
    }

    /// Reward for completing the level.
    #[must_use]
    pub const fn money(&self) -> i32 {
        self.money
    }

    /// Number of police cars roaming the graph.
    #[must_use]
    pub const fn num_police(&self) -> i32 {
        self.num_police
    }

    /// Number of bandits roaming the graph.
    #[must_use]
    pub const fn num_bandits(&self) -> i32 {
        self.num_bandits
    }

    /// Number of zombies roaming the graph.
    #[must_use]
    pub const fn num_zombies(&self) -> i32 {
        self.num_zombies
    }

    /// Looks up an intersection by identifier.
    #[must_use]
    pub fn intersection(&self, id: IntersectionId) -> Option<&Intersection> {
        self.intersections.get(id.index())
    }

    /// Looks up an intersection for mutation by identifier.
    #[must_use]
    pub fn intersection_mut(&mut self, id: IntersectionId) -> Option<&mut Intersection> {
        self.intersections.get_mut(id.index())
    }

    /// Appends an intersection to the arena, returning its identifier.
    pub fn add_intersection(&mut self, intersection: Intersection) -> IntersectionId {
        let id = IntersectionId::new(self.intersections.len() as u32);
        self.intersections.push(intersection);
        id
    }

    /// Appends a road, rejecting endpoints outside the arena.
    pub fn add_road(&mut self, road: Road) -> Result<(), LevelIntegrityError> {
        let road_index = self.roads.len();
        for endpoint in [road.from(), road.to()] {
            if self.intersection(endpoint).is_none() {
                return Err(LevelIntegrityError::DanglingRoadEndpoint {
                    road: road_index,
                    endpoint,
                });
            }
        }
        self.roads.push(road);
        Ok(())
    }

    /// Points the start marker at an existing intersection.
    pub fn set_start(&mut self, id: IntersectionId) -> Result<(), LevelIntegrityError> {
        if self.intersection(id).is_none() {
            return Err(LevelIntegrityError::InvalidStart { id });
        }
        self.start = id;
        Ok(())
    }

    /// Points the destination marker at an existing intersection.
    pub fn set_destination(&mut self, id: IntersectionId) -> Result<(), LevelIntegrityError> {
        if self.intersection(id).is_none() {
            return Err(LevelIntegrityError::InvalidDestination { id });
        }
        self.destination = id;
        Ok(())
    }

    /// Enumerates the intersections reachable in one hop from `id`.
    ///
    /// One-way roads contribute their destination only when departing from
    /// their origin; two-way roads contribute both directions. Closed
    /// neighbours are still reported; whether traffic may enter a closed
    /// intersection is a gameplay decision, not a graph property.
    pub fn neighbours(&self, id: IntersectionId) -> impl Iterator<Item = IntersectionId> + '_ {
        self.roads
            .iter()
            .filter_map(move |road| road.traversable_from(id))
    }

    /// Checks every cross-reference in the level.
    ///
    /// The start and destination markers must resolve into the intersection
    /// arena and every road endpoint must do the same. A level that fails
    /// validation must never reach a session or the encoder.
    pub fn validate(&self) -> Result<(), LevelIntegrityError> {
        if self.intersection(self.start).is_none() {
            return Err(LevelIntegrityError::InvalidStart { id: self.start });
        }
        if self.intersection(self.destination).is_none() {
            return Err(LevelIntegrityError::InvalidDestination {
                id: self.destination,
            });
        }
        for (road_index, road) in self.roads.iter().enumerate() {
            for endpoint in [road.from(), road.to()] {
                if self.intersection(endpoint).is_none() {
                    return Err(LevelIntegrityError::DanglingRoadEndpoint {
                        road: road_index,
                        endpoint,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Cross-reference violations detectable in a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LevelIntegrityError {
    /// The start marker does not resolve into the intersection arena.
    #[error("start intersection {id:?} does not exist")]
    InvalidStart {
        /// The offending identifier.
        id: IntersectionId,
    },
    /// The destination marker does not resolve into the intersection arena.
    #[error("destination intersection {id:?} does not exist")]
    InvalidDestination {
        /// The offending identifier.
        id: IntersectionId,
    },
    /// A road references an intersection outside the arena.
    #[error("road {road} references missing intersection {endpoint:?}")]
    DanglingRoadEndpoint {
        /// Arena index of the offending road.
        road: usize,
        /// The endpoint that failed to resolve.
        endpoint: IntersectionId,
    },
}
