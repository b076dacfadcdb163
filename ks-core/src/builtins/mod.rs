mod collection;
mod system;
mod math;
mod string;

pub mod registry;

pub mod prelude {
    pub use super::registry::*;
}

#[cfg(test)]
mod tests;
