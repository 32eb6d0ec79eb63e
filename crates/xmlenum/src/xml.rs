//! XML tokenizer module

pub mod event;
pub mod reader;

pub use event::Event;
pub use reader::{Config, Reader};
