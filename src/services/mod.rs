pub mod client;
pub mod fallback;
pub mod normalize;
pub mod pipeline;
pub mod transport;
