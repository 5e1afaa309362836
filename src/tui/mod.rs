//! Terminal front end state.
//!
//! All state and key handling lives in [`app`] so it can be tested
//! without a terminal. The `algoviz-tui` binary owns terminal I/O and
//! drawing.

pub mod app;

#[cfg(test)]
mod tests;
