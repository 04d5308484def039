//! Subcommand handlers. Each translates arguments into a core call and
//! reports the result; no business logic lives here.

pub mod completions;
pub mod make;
pub mod render;
