mod block;
mod block_list;
mod capability;
mod commands;
mod header;
mod history;
mod ids;
mod persist;

pub use block::*;
pub use block_list::*;
pub use capability::*;
pub use commands::*;
pub use header::*;
pub use history::*;
pub use ids::*;
pub use persist::*;
