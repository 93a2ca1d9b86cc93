pub mod storage;
pub mod types;

pub use storage::{get_standings_path, load_standings, save_standings};
pub use types::{AthleteStanding, RankedAthlete, Standings};
