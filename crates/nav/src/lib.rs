//! `mediboard-nav` — role-to-surface mapping.
//!
//! Pure, total functions from a role to its default landing surface and to
//! the ordered set of navigation affordances it is permitted to see. No
//! side effects, no failure mode; the tables are fixed per role.

pub mod surface;

pub use surface::{Affordance, IconKey, affordances, default_landing};
