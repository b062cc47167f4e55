pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{BatchResult, InsertReply, Item, NIL_TODO_ID, TodoList};
