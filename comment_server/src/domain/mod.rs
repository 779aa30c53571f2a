// Domain layer: comment, account and session records plus their ports.

pub mod entities;
pub mod errors;
pub mod ports;
