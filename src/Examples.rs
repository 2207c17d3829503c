//! examples of usage of RustedGruntz
/// limits at infinity, at finite points from both sides, traced and configured runs
pub mod limit_examples;
