//! DeskCat - input-to-animation bridge for a desktop virtual pet
//!
//! Turns keyboard, mouse and gamepad events forwarded by the native host into
//! parameter writes on the cat's animation rig, and keeps the pet window and
//! its preferences in sync.

pub mod app;
pub mod config;
pub mod host;
pub mod input;
pub mod mapper;
pub mod menu;
pub mod model;
pub mod paths;
pub mod rig;
pub mod stores;
pub mod window;
