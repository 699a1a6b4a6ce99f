#[macro_use]
extern crate log;

pub mod client;
pub mod command;
pub mod connection;
pub mod message;
