//! Pipeline front-ends.

pub mod yaml;
