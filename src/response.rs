//! The four built-in collision responses (`touch`, `cross`, `slide`,
//! `bounce`) plus the `Filter`/`Response` capability aliases that make them
//! (and user-registered responses) first-class, caller-injected callables.
//!
//! Responses are plain `fn` pointers rather than boxed `dyn Fn`: all four
//! built-ins are stateless, and a response that needs caller state can reach
//! it through the filter, which *is* a trait object and may capture freely
//! (see SPEC_FULL.md §9a).

use std::hash::Hash;

use crate::collision::Collision;
use crate::rect::Rect;
use crate::world::World;

/// `(item, other) -> response name`. `item` is `None` when the mover is a
/// hypothetical probe passed to `project` without being present in the world.
pub type Filter<I> = dyn Fn(Option<I>, I) -> Option<String>;

/// The default filter every new `World` is constructed with: everything
/// slides against everything.
pub fn default_filter<I>(_item: Option<I>, _other: I) -> Option<String> {
    Some("slide".to_string())
}

/// A registered response. Receives the collision that selected it, the
/// mover's *original* rect (unchanged across a `check` loop's iterations)
/// and the goal as of this bounce, and returns the revised goal plus
/// whatever further collisions its own re-projection (if any) turned up.
pub type Response<I> = fn(
    &World<I>,
    I,
    &Collision<I>,
    f64,
    f64,
    f64,
    f64,
    f64,
    f64,
    &Filter<I>,
) -> (f64, f64, Vec<Collision<I>>);

/// Stops the item at the contact point; no further projection.
pub fn touch<I: Copy + Eq + Hash>(
    _world: &World<I>,
    _item: I,
    col: &Collision<I>,
    _x: f64,
    _y: f64,
    _w: f64,
    _h: f64,
    _goal_x: f64,
    _goal_y: f64,
    _filter: &Filter<I>,
) -> (f64, f64, Vec<Collision<I>>) {
    (col.touch.0, col.touch.1, Vec::new())
}

/// Pretends the collision didn't move the item; re-projects from the
/// original position toward the original goal, so the caller can collect
/// every sensor crossed along the way.
pub fn cross<I: Copy + Eq + Hash>(
    world: &World<I>,
    item: I,
    _col: &Collision<I>,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    goal_x: f64,
    goal_y: f64,
    filter: &Filter<I>,
) -> (f64, f64, Vec<Collision<I>>) {
    let rect = Rect::new(x, y, w, h);
    let next = world.project(Some(item), rect, Some((goal_x, goal_y)), Some(filter));
    (goal_x, goal_y, next)
}

/// Cancels the residual movement's component along the contact normal, then
/// re-projects from the touch point toward the adjusted goal.
pub fn slide<I: Copy + Eq + Hash>(
    world: &World<I>,
    item: I,
    col: &Collision<I>,
    _x: f64,
    _y: f64,
    w: f64,
    h: f64,
    goal_x: f64,
    goal_y: f64,
    filter: &Filter<I>,
) -> (f64, f64, Vec<Collision<I>>) {
    let (mut gx, mut gy) = (goal_x, goal_y);
    if col.move_.0 != 0.0 || col.move_.1 != 0.0 {
        if col.normal.0 != 0 {
            gx = col.touch.0;
        } else {
            gy = col.touch.1;
        }
    }
    let rect = Rect::new(col.touch.0, col.touch.1, w, h);
    let next = world.project(Some(item), rect, Some((gx, gy)), Some(filter));
    (gx, gy, next)
}

/// Reflects the residual movement's perpendicular component about the
/// contact normal, then re-projects from the touch point toward the
/// reflected goal.
pub fn bounce<I: Copy + Eq + Hash>(
    world: &World<I>,
    item: I,
    col: &Collision<I>,
    _x: f64,
    _y: f64,
    w: f64,
    h: f64,
    goal_x: f64,
    goal_y: f64,
    filter: &Filter<I>,
) -> (f64, f64, Vec<Collision<I>>) {
    let (mut gx, mut gy) = (goal_x, goal_y);
    if col.move_.0 != 0.0 || col.move_.1 != 0.0 {
        if col.normal.0 == 0 {
            gy = 2.0 * col.touch.1 - goal_y;
        } else {
            gx = 2.0 * col.touch.0 - goal_x;
        }
    }
    let rect = Rect::new(col.touch.0, col.touch.1, w, h);
    let next = world.project(Some(item), rect, Some((gx, gy)), Some(filter));
    (gx, gy, next)
}
