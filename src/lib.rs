//! Staff console for styled customer QR codes.
//!
//! The library holds the composer, the style controller, the saved-design
//! repository and the HTTP surface. `main.rs` only wires them into a server.

pub mod client;
pub mod config;
pub mod controller;
pub mod editor;
pub mod error;
pub mod handlers;
pub mod middlewares;
pub mod models;
pub mod qr;
pub mod repository;
pub mod routes;
pub mod state;
pub mod structs;
pub mod utils;
