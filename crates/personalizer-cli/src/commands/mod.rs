pub mod config;
pub mod message;
pub mod persona;
pub mod state;
pub mod theme;
