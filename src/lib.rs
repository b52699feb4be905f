pub mod animation;
pub mod collision;
pub mod config;
pub mod entity;
pub mod event;
pub mod game;
pub mod helpers;
pub mod hero;
pub mod input;
pub mod level;
pub mod physics;
pub mod session;
pub mod r#trait;
