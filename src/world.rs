//! The persistent broadphase grid and the public entry point for every
//! operation in the crate: `World<I>` owns every item's rect, the sparse
//! grid that indexes them, and the response table `check`/`move_item` drive.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use log::{debug, trace};

use crate::collision::{Collision, SegmentHit};
use crate::error::WorldError;
use crate::grid::{self};
use crate::narrowphase::{detect_collision, segment_intersect_rect};
use crate::rect::Rect;
use crate::response::{self, Filter, Response, default_filter};

struct Cell<I> {
    items: HashSet<I>,
}

impl<I> Default for Cell<I> {
    fn default() -> Self {
        Cell { items: HashSet::new() }
    }
}

/// An AABB broadphase/narrowphase world over caller-supplied item handles
/// `I`. `I` is typically an index, slot key, or newtype wrapper the caller
/// already uses to name entities; the world never inspects it beyond
/// equality and hashing.
pub struct World<I: Copy + Eq + Hash> {
    cell_size: f64,
    rects: HashMap<I, Rect>,
    rows: HashMap<i32, HashMap<i32, Cell<I>>>,
    non_empty_cells: HashSet<(i32, i32)>,
    responses: HashMap<String, Response<I>>,
}

impl<I: Copy + Eq + Hash> World<I> {
    /// Builds an empty world whose grid cells are `cell_size` world units
    /// square. `touch`, `cross`, `slide`, and `bounce` are pre-registered.
    pub fn new(cell_size: f64) -> Result<Self, WorldError> {
        if !(cell_size > 0.0) {
            return Err(WorldError::BadArgument(cell_size));
        }
        let mut responses: HashMap<String, Response<I>> = HashMap::new();
        responses.insert("touch".to_string(), response::touch::<I> as Response<I>);
        responses.insert("cross".to_string(), response::cross::<I> as Response<I>);
        responses.insert("slide".to_string(), response::slide::<I> as Response<I>);
        responses.insert("bounce".to_string(), response::bounce::<I> as Response<I>);
        debug!("created world with cell_size={cell_size}");
        Ok(Self {
            cell_size,
            rects: HashMap::new(),
            rows: HashMap::new(),
            non_empty_cells: HashSet::new(),
            responses,
        })
    }

    /// Registers (or replaces) a named response, for use as the `kind` a
    /// caller's filter returns.
    pub fn add_response(&mut self, name: impl Into<String>, response: Response<I>) {
        self.responses.insert(name.into(), response);
    }

    /// Inserts `item` with the given rect. Errors if `item` is already present.
    pub fn add(&mut self, item: I, rect: Rect) -> Result<(), WorldError> {
        if self.rects.contains_key(&item) {
            return Err(WorldError::DuplicateItem);
        }
        let cr = grid::to_cell_rect(self.cell_size, rect);
        for (cx, cy) in cr.cells() {
            self.add_item_to_cell(item, cx, cy);
        }
        self.rects.insert(item, rect);
        trace!("added item to world");
        Ok(())
    }

    /// Removes `item`. Errors if it isn't present.
    pub fn remove(&mut self, item: I) -> Result<(), WorldError> {
        let rect = self.rects.remove(&item).ok_or(WorldError::UnknownItem)?;
        let cr = grid::to_cell_rect(self.cell_size, rect);
        for (cx, cy) in cr.cells() {
            self.remove_item_from_cell(item, cx, cy);
        }
        trace!("removed item from world");
        Ok(())
    }

    /// Moves `item`'s rect in place, re-indexing only the cells that
    /// actually changed. `w`/`h` default to the item's current extents when
    /// omitted. Errors if `item` isn't present.
    pub fn update(
        &mut self,
        item: I,
        x: f64,
        y: f64,
        w: Option<f64>,
        h: Option<f64>,
    ) -> Result<(), WorldError> {
        let old_rect = *self.rects.get(&item).ok_or(WorldError::UnknownItem)?;
        let rect = Rect::new(x, y, w.unwrap_or(old_rect.w), h.unwrap_or(old_rect.h));
        let old_cr = grid::to_cell_rect(self.cell_size, old_rect);
        let new_cr = grid::to_cell_rect(self.cell_size, rect);
        if old_cr != new_cr {
            let old_cells: HashSet<(i32, i32)> = old_cr.cells().collect();
            let new_cells: HashSet<(i32, i32)> = new_cr.cells().collect();
            for &(cx, cy) in old_cells.difference(&new_cells) {
                self.remove_item_from_cell(item, cx, cy);
            }
            for &(cx, cy) in new_cells.difference(&old_cells) {
                self.add_item_to_cell(item, cx, cy);
            }
        }
        self.rects.insert(item, rect);
        trace!("updated item rect");
        Ok(())
    }

    pub fn get_rect(&self, item: I) -> Result<Rect, WorldError> {
        self.rects.get(&item).copied().ok_or(WorldError::UnknownItem)
    }

    pub fn has_item(&self, item: I) -> bool {
        self.rects.contains_key(&item)
    }

    pub fn get_items(&self) -> Vec<I> {
        self.rects.keys().copied().collect()
    }

    pub fn count_items(&self) -> usize {
        self.rects.len()
    }

    /// Number of distinct non-empty grid cells currently occupied.
    pub fn count_cells(&self) -> usize {
        self.non_empty_cells.len()
    }

    pub fn to_cell(&self, x: f64, y: f64) -> (i32, i32) {
        grid::to_cell(self.cell_size, x, y)
    }

    pub fn to_world(&self, cx: i32, cy: i32) -> (f64, f64) {
        grid::to_world(self.cell_size, cx, cy)
    }

    fn add_item_to_cell(&mut self, item: I, cx: i32, cy: i32) {
        let row = self.rows.entry(cy).or_default();
        let cell = row.entry(cx).or_default();
        cell.items.insert(item);
        self.non_empty_cells.insert((cx, cy));
    }

    fn remove_item_from_cell(&mut self, item: I, cx: i32, cy: i32) {
        let Some(row) = self.rows.get_mut(&cy) else { return };
        if let Some(cell) = row.get_mut(&cx) {
            cell.items.remove(&item);
            if cell.items.is_empty() {
                row.remove(&cx);
                self.non_empty_cells.remove(&(cx, cy));
            }
        }
        if row.is_empty() {
            self.rows.remove(&cy);
        }
    }

    fn candidates_in_rect(&self, rect: Rect) -> HashSet<I> {
        let cr = grid::to_cell_rect(self.cell_size, rect);
        let mut out = HashSet::new();
        for (cx, cy) in cr.cells() {
            if let Some(row) = self.rows.get(&cy) {
                if let Some(cell) = row.get(&cx) {
                    out.extend(cell.items.iter().copied());
                }
            }
        }
        out
    }

    /// All items whose rect overlaps `rect` (open-interval: touching edges
    /// don't count), in no particular order.
    pub fn query_rect(&self, rect: Rect, filter: Option<&dyn Fn(I) -> bool>) -> Vec<I> {
        self.candidates_in_rect(rect)
            .into_iter()
            .filter(|&it| {
                self.rects
                    .get(&it)
                    .is_some_and(|r| r.intersects_open(&rect))
            })
            .filter(|&it| filter.is_none_or(|f| f(it)))
            .collect()
    }

    /// All items whose rect strictly contains `(x, y)` (edges excluded).
    pub fn query_point(&self, x: f64, y: f64, filter: Option<&dyn Fn(I) -> bool>) -> Vec<I> {
        let (cx, cy) = grid::to_cell(self.cell_size, x, y);
        let mut out = Vec::new();
        if let Some(row) = self.rows.get(&cy) {
            if let Some(cell) = row.get(&cx) {
                for &item in &cell.items {
                    if let Some(r) = self.rects.get(&item) {
                        if r.contains_point_margin(x, y) && filter.is_none_or(|f| f(item)) {
                            out.push(item);
                        }
                    }
                }
            }
        }
        out
    }

    /// Items whose rect the segment `(x1,y1) -> (x2,y2)` crosses, nearest
    /// first.
    pub fn query_segment(
        &self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        filter: Option<&dyn Fn(I) -> bool>,
    ) -> Vec<I> {
        self.query_segment_with_coords(x1, y1, x2, y2, filter)
            .into_iter()
            .map(|hit| hit.item)
            .collect()
    }

    /// Like `query_segment`, but also returns each hit's clipped `[0,1]`
    /// parameters and the world-space entry/exit points. A candidate is
    /// accepted only if its `[0,1]`-clipped entry or exit parameter lies
    /// strictly inside `(0,1)` (a segment entirely inside a rect, which
    /// clips to exactly `0` and `1`, is excluded). Results are ordered by
    /// `min(ti1, ti2)` from the *unbounded* clip, not the clamped one, so
    /// ties at `ti1 = 0` still resolve in the natural order of the infinite
    /// line through the rectangles.
    pub fn query_segment_with_coords(
        &self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        filter: Option<&dyn Fn(I) -> bool>,
    ) -> Vec<SegmentHit<I>> {
        let mut candidates = HashSet::new();
        grid::traverse(self.cell_size, x1, y1, x2, y2, |cx, cy| {
            if let Some(row) = self.rows.get(&cy) {
                if let Some(cell) = row.get(&cx) {
                    candidates.extend(cell.items.iter().copied());
                }
            }
        });

        let dx = x2 - x1;
        let dy = y2 - y1;
        let mut weighted: Vec<(f64, SegmentHit<I>)> = candidates
            .into_iter()
            .filter(|&it| filter.is_none_or(|f| f(it)))
            .filter_map(|item| {
                let rect = *self.rects.get(&item)?;
                let clip = segment_intersect_rect(rect, x1, y1, dx, dy, 0.0, 1.0)?;
                let hits_open = (0.0 < clip.ti1 && clip.ti1 < 1.0) || (0.0 < clip.ti2 && clip.ti2 < 1.0);
                if !hits_open {
                    return None;
                }
                let unbounded =
                    segment_intersect_rect(rect, x1, y1, dx, dy, f64::NEG_INFINITY, f64::INFINITY)?;
                let weight = unbounded.ti1.min(unbounded.ti2);
                Some((
                    weight,
                    SegmentHit {
                        item,
                        ti1: clip.ti1,
                        ti2: clip.ti2,
                        entry: (x1 + dx * clip.ti1, y1 + dy * clip.ti1),
                        exit: (x1 + dx * clip.ti2, y1 + dy * clip.ti2),
                    },
                ))
            })
            .collect();
        weighted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        weighted.into_iter().map(|(_, hit)| hit).collect()
    }

    /// Pure, single-step narrowphase scan: collisions a rect moving from its
    /// current position to `goal` (default: no movement) would have against
    /// every neighbor the filter accepts, nearest first. `item` names the
    /// mover if it's actually in the world (`None` for a hypothetical probe)
    /// and is excluded from the candidate set when present. Does not mutate
    /// the world and does not run any response.
    pub fn project(
        &self,
        item: Option<I>,
        rect: Rect,
        goal: Option<(f64, f64)>,
        filter: Option<&Filter<I>>,
    ) -> Vec<Collision<I>> {
        let (goal_x, goal_y) = goal.unwrap_or((rect.x, rect.y));
        let default_fn: fn(Option<I>, I) -> Option<String> = default_filter::<I>;
        let filter = filter.unwrap_or(&default_fn);

        let goal_rect = Rect::new(goal_x, goal_y, rect.w, rect.h);
        let sweep = rect.union(&goal_rect);

        let mut collisions: Vec<Collision<I>> = self
            .candidates_in_rect(sweep)
            .into_iter()
            .filter(|&other| Some(other) != item)
            .filter_map(|other| {
                let other_rect = *self.rects.get(&other)?;
                let kind = filter(item, other)?;
                let hit = detect_collision(rect, other_rect, goal_x, goal_y)?;
                Some(Collision {
                    item,
                    other,
                    overlaps: hit.overlaps,
                    ti: hit.ti,
                    move_: (goal_x - rect.x, goal_y - rect.y),
                    normal: hit.normal,
                    touch: hit.touch,
                    item_rect: rect,
                    other_rect,
                    kind,
                    slide: None,
                    bounce: None,
                })
            })
            .collect();

        let center = |r: &Rect| (r.x + r.w / 2.0, r.y + r.h / 2.0);
        let dist2 = |c: &Collision<I>| {
            let (ax, ay) = center(&c.item_rect);
            let (bx, by) = center(&c.other_rect);
            (ax - bx).powi(2) + (ay - by).powi(2)
        };
        collisions.sort_by(|a, b| {
            a.ti.partial_cmp(&b.ti)
                .unwrap()
                .then_with(|| dist2(a).partial_cmp(&dist2(b)).unwrap())
        });
        collisions
    }

    /// Iterative multi-bounce resolution: repeatedly `project`s toward the
    /// current goal, runs whichever response the filter names for the first
    /// (nearest) unvisited collision, and folds the response's revised goal
    /// back in, until no more collisions are found. Does not mutate the
    /// world; pair with `update` (or call `move_item`) to commit the result.
    pub fn check(
        &self,
        item: I,
        goal_x: f64,
        goal_y: f64,
        filter: Option<&Filter<I>>,
    ) -> Result<(f64, f64, Vec<Collision<I>>), WorldError> {
        let rect = *self.rects.get(&item).ok_or(WorldError::UnknownItem)?;
        let default_fn: fn(Option<I>, I) -> Option<String> = default_filter::<I>;
        let user_filter = filter.unwrap_or(&default_fn);

        let visited = RefCell::new(HashSet::new());
        visited.borrow_mut().insert(item);

        let wrapped = |mover: Option<I>, other: I| -> Option<String> {
            if visited.borrow().contains(&other) {
                None
            } else {
                user_filter(mover, other)
            }
        };

        let mut goal_x = goal_x;
        let mut goal_y = goal_y;
        let mut all_collisions: Vec<Collision<I>> = Vec::new();

        loop {
            let mut projected = self.project(Some(item), rect, Some((goal_x, goal_y)), Some(&wrapped));
            if projected.is_empty() {
                break;
            }
            let mut col = projected.remove(0);
            visited.borrow_mut().insert(col.other);

            let response_fn = *self
                .responses
                .get(&col.kind)
                .ok_or_else(|| WorldError::UnknownResponse(col.kind.clone()))?;

            let (nx, ny, further) = response_fn(
                self, item, &col, rect.x, rect.y, rect.w, rect.h, goal_x, goal_y, &wrapped,
            );

            match col.kind.as_str() {
                "slide" => col.slide = Some((nx, ny)),
                "bounce" => col.bounce = Some((nx, ny)),
                _ => {}
            }

            goal_x = nx;
            goal_y = ny;
            all_collisions.push(col);
            all_collisions.extend(further);
        }

        Ok((goal_x, goal_y, all_collisions))
    }

    /// `check`, then commits the resolved position via `update`.
    pub fn move_item(
        &mut self,
        item: I,
        goal_x: f64,
        goal_y: f64,
        filter: Option<&Filter<I>>,
    ) -> Result<(f64, f64, Vec<Collision<I>>), WorldError> {
        let (actual_x, actual_y, collisions) = self.check(item, goal_x, goal_y, filter)?;
        self.update(item, actual_x, actual_y, None, None)?;
        Ok((actual_x, actual_y, collisions))
    }
}
