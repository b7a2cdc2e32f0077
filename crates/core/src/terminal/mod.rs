//! Terminal collaborator interface

mod traits;

pub use traits::{Console, InputEvent, MockConsole, Terminal};
