//! Text generation module.

mod provider;
pub mod providers;

pub use provider::{TextProvider, TextRequest};
