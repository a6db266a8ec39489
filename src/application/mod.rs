pub(crate) mod config;
pub(crate) mod context;
pub(crate) mod dto;
pub(crate) mod listener;
pub(crate) mod websocket;
