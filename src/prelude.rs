//! The prelude is a collection of all the traits in this crate.
//!
//! The traits have been imported anonymously to avoid collisions with
//! `embedded-hal`'s `Read` and `Write` traits when glob importing.

pub use crate::Read as _;
pub use crate::Transport as _;
pub use crate::Write as _;
