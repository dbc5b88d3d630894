//! Application state module

mod app_state;
mod category;
mod drawer;

pub use app_state::*;
pub use category::*;
pub use drawer::*;
