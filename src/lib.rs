//! Pokedex CLI Library
//!
//! Exposes the response cache, command layer and CLI parsing for use in
//! integration tests.

pub mod cache;
pub mod cli;
pub mod commands;
pub mod data;
pub mod repl;
pub mod session;
