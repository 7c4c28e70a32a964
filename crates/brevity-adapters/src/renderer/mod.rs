//! Template engine adapters.

mod case;
mod handlebars;

pub use self::handlebars::HandlebarsEngine;
