//! HubApp backend: tool registry, file proxy, chat relay, and remote
//! desktop bridging

pub mod chat;
pub mod config;
pub mod error;
pub mod files;
pub mod registry;
pub mod remote;
pub mod web;
