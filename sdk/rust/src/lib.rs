//! Client SDK for the todo API.

pub mod client;

pub use client::{NewTodo, SdkError, Todo, TodoClient};
