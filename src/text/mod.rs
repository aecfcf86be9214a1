pub mod engine;
pub mod fonts;
pub mod wrap;
