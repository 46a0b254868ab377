//! HTTP handlers, one module per route.

mod multipart;

pub mod article;
pub mod authenticate;
pub mod game;
pub mod share;
pub mod upload;
