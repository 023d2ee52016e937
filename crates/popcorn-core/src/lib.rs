pub mod config;
pub mod error;
pub mod keymap;
pub mod models;
pub mod persisted;
pub mod rating;
pub mod storage;
pub mod watched;
