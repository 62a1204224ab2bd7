//! Selection algorithms for separating backdrop from sprite.
//!
//! - **Candidate mask**: per-pixel color classification
//! - **Components**: connected-component labelling, keeps only the
//!   border-connected background region

pub mod candidate;
pub mod components;

pub use candidate::candidate_mask;
pub use components::{LabelMap, isolate_foreground, label_components};
