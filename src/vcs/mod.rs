mod git_cli;
mod version_control;

#[cfg(test)]
mod fake;

#[cfg(test)]
pub use self::fake::FakeVcs;
pub use self::{git_cli::*, version_control::*};
