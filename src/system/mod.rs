//! # System Interaction Layer
//!
//! The boundary between rigging and the operating system.
//!
//! - **`executor`**: the subprocess service. A [`executor::CommandLine`] goes in,
//!   combined output comes back, and a non-zero exit is an error. Everything that
//!   shells out to `dotnet`, `docker`, `helm` or `kubectl` goes through the
//!   [`executor::CommandRunner`] trait so it can be swapped in tests.

pub mod executor;

#[cfg(test)]
pub(crate) mod testing;
