//! Client/server synchronization
//!
//! A [`Server`] owns the authoritative document and a linear history of
//! accepted revisions. Each [`Client`] keeps a local replica and at most one
//! revision in flight; edits made while waiting are composed into a buffer.
//! Transport is left to the caller: clients hand outgoing revisions to a
//! send callback, and whoever relays server responses calls
//! [`Client::ack`] or [`Client::recv`].

mod client;
mod server;

pub use client::{Client, ClientState};
pub use server::Server;
