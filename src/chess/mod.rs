pub mod error;
pub mod log;
pub mod reader;
pub mod timecontrol;
pub mod types;
pub mod visitor;

pub use error::{ErrorAccumulator, ProfileError};
pub use reader::{Compression, read_games, read_games_from};
pub use timecontrol::{TimeControlCategory, TimeControlError, classify};
pub use types::{Color, GameRecord, GameResult};
