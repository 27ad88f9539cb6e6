use crate::narrowphase::Normal;
use crate::rect::Rect;

/// A single collision produced by `project`/`check`, carrying everything a
/// caller needs to react: who hit what, where, along which normal, and
/// (once a response has run) where the response sent the mover next.
#[derive(Clone, Debug)]
pub struct Collision<I> {
    /// `None` when this collision came from a `project` call on a rect that
    /// isn't actually in the world (a hypothetical probe).
    pub item: Option<I>,
    pub other: I,
    pub overlaps: bool,
    pub ti: f64,
    pub move_: (f64, f64),
    pub normal: Normal,
    pub touch: (f64, f64),
    pub item_rect: Rect,
    pub other_rect: Rect,
    /// Response name the filter chose for this pair (`type` in the source
    /// vocabulary; renamed since `type` is a reserved word in Rust).
    pub kind: String,
    pub slide: Option<(f64, f64)>,
    pub bounce: Option<(f64, f64)>,
}

/// One match from `querySegmentWithCoords`: the `[0,1]`-clipped entry/exit
/// parameters plus the world-space points they correspond to.
#[derive(Clone, Debug)]
pub struct SegmentHit<I> {
    pub item: I,
    pub ti1: f64,
    pub ti2: f64,
    pub entry: (f64, f64),
    pub exit: (f64, f64),
}
