//! Property-based tests

mod normalize_proptest;
mod queue_proptest;
