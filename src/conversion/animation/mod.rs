//! Re-basing of animation curves. Curves store every transform channel separately, so the static
//! conversion has to be re-expressed per keyframe on groups of curves that belong together.
pub mod curve_set;
pub mod rebaser;
