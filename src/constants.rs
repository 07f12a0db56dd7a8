pub const DEFAULT_ROWS: i64 = 6;
pub const DEFAULT_COLUMNS: i64 = 6;
pub const DEFAULT_BALLOON_PROBABILITY: i64 = 30;

pub const MAX_GRID_SIDE: i64 = 64;
pub const MAX_BALLOON_PROBABILITY: u8 = 100;

pub const ROWS_ENV: &str = "BALLOON_ROWS";
pub const COLUMNS_ENV: &str = "BALLOON_COLUMNS";
pub const PROBABILITY_ENV: &str = "BALLOON_PROBABILITY";

/// Upper bound on buffered runtime events between two draining snapshots.
pub const MAX_PENDING_EVENTS: usize = 256;
