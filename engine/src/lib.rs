mod cache;
mod grid;
mod linebreak;
mod metrics;

pub use cache::*;
pub use grid::*;
pub use linebreak::*;
pub use metrics::*;
