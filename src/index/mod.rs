pub mod inverted;
pub mod stats;

pub use inverted::InvertedIndex;
pub use stats::{show_stats, IndexStats};
