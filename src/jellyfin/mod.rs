//! Jellyfin API integration
//!
//! Library listing, view and item lookup, item refresh and library scan
//! requests against a Jellyfin server.
//!
//! API docs: https://api.jellyfin.org/

pub mod dto;
mod adapter;
mod client;

pub use client::JellyfinClient;
