//! Console front end and process bootstrap for rework-bot.
//!
//! Wires the infrastructure adapters into the use cases and drives them from
//! lines of text, standing in for a chat gateway.

pub mod adapters;
pub mod bootstrap;
pub mod console;
