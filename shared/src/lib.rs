// lib.rs - portfolio behaviour core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]

//! Shared core for the portfolio site.
//!
//! The browser shell forwards DOM events as [`Event`]s, the core keeps every
//! piece of UI state in a single [`Model`] and answers with capability
//! effects plus a [`ViewModel`] the shell projects onto the document.

pub mod a11y;
pub mod app;
pub mod capabilities;
pub mod config;
pub mod dom;
pub mod error;
pub mod event;
pub mod filter;
pub mod form;
pub mod media;
pub mod model;
pub mod navigation;
pub mod perf;
pub mod scroll;
pub mod subscription;
pub mod theme;
pub mod timing;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::SiteConfig;
pub use error::{AppError, ErrorKind};
pub use event::Event;
pub use model::Model;
pub use view::ViewModel;

pub use crux_core::{render::Render, App as CruxApp};
