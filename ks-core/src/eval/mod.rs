pub mod config;
pub mod error;
pub mod interpreter;
mod signal;

pub mod prelude {
    pub use super::config::*;
    pub use super::error::*;
    pub use super::interpreter::*;
}

#[cfg(test)]
mod tests;
