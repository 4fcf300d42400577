//! PixelFE — a grid-based pixel-art editor.
//!
//! The library crate holds everything except the binary entry point: the
//! raster grid core ([`canvas`]), the event-driven drawing session
//! ([`editor`]), the JSON artwork store ([`store`]), the egui shell
//! ([`app`] + [`components`]), and the headless CLI ([`cli`]).

pub mod app;
pub mod canvas;
pub mod cli;
pub mod components;
pub mod editor;
pub mod io;
pub mod logger;
pub mod store;
