//! Terminal front-end.
//!
//! - [`TerminalView`]: renders controller updates as text lines
//! - [`repl`]: reads commands and questions and dispatches them

pub mod repl;
mod view;

pub use repl::{Command, run};
pub use view::TerminalView;
