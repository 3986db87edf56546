//! Configuration: YAML schema plus layered loading from file and env.

pub mod loader;
pub mod schema;
