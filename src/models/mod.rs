//! Resource types shared by the HTTP and storage layers.

pub mod todo;

pub use todo::{Todo, TodoBase, TodoStatus};
