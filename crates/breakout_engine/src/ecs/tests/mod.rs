//! Store and simulation integration tests over the shipped assets

mod level_integration;
