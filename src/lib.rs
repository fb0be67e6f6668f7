//! Desktop to-do list manager.
//!
//! The task list lives in a [`store::TaskStore`] persisted as JSON. A
//! [`controller::Controller`] turns user actions into store mutations and keeps
//! the filtered view and the theme transition up to date; [`app`] renders it
//! all with egui.

pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod store;
pub mod task;
pub mod theme;
pub mod view;

pub use controller::{Action, Controller};
pub use error::{ConfigError, StoreError};
pub use store::TaskStore;
pub use task::Task;
