//! bump2d: continuous AABB collision detection and kinematic resolution
//! over a persistent uniform grid.
//!
//! The grid ([`grid`]) narrows a query down to a handful of neighbor cells;
//! [`narrowphase`] resolves a single pair exactly via a Minkowski-difference
//! clip; [`collision`] is the result type both [`World::project`] and
//! [`World::check`] return; [`response`] is the pluggable reaction
//! (`touch`/`cross`/`slide`/`bounce`) a [`Filter`] selects per pair.

pub mod collision;
pub mod error;
pub mod grid;
pub mod narrowphase;
pub mod rect;
pub mod response;
pub mod world;

pub use crate::collision::{Collision, SegmentHit};
pub use crate::error::WorldError;
pub use crate::rect::Rect;
pub use crate::response::{Filter, Response, bounce, cross, default_filter, slide, touch};
pub use crate::world::World;
