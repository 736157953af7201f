//! Game rules for Chomp.
//!
//! Pure functions over [`Board`](super::Board). Rules are kept apart from
//! board storage so contracts and invariants can compose them.

pub mod chomp;
pub mod poison;

pub use chomp::{apply_chomp, bite_region, legal_moves};
pub use poison::is_poison_eaten;
