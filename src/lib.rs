pub mod error;
pub mod event;
pub mod ui;
pub mod wizard;

pub use error::{QuarryError, Result};
