pub mod chunk;
pub mod normalize;
