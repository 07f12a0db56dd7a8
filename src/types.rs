use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Playing,
    Cleared,
    Failed,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        self != Self::Playing
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Cleared => "cleared",
            Self::Failed => "failed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredReason {
    NotPlaying,
    EmptyCell,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ClickOutcome {
    Popped {
        size: usize,
        remaining: usize,
    },
    Cleared {
        size: usize,
    },
    Failed {
        size: usize,
        #[serde(rename = "maxGroupSize")]
        max_group_size: usize,
    },
    Ignored {
        reason: IgnoredReason,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    GroupPopped {
        row: usize,
        col: usize,
        size: usize,
    },
    ClickRejected {
        row: usize,
        col: usize,
        size: usize,
        #[serde(rename = "maxGroupSize")]
        max_group_size: usize,
    },
    BoardCleared {
        pops: u32,
    },
    SessionReset {
        seed: u32,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub rows: usize,
    pub columns: usize,
    pub cells: Vec<Vec<bool>>,
    pub status: SessionStatus,
    pub catalog: Vec<usize>,
    #[serde(rename = "maxGroupSize")]
    pub max_group_size: Option<usize>,
    #[serde(rename = "balloonsRemaining")]
    pub balloons_remaining: usize,
    pub pops: u32,
    pub seed: u32,
    pub events: Vec<RuntimeEvent>,
}

impl Snapshot {
    /// Plain terminal view: `o` for a balloon, `.` for an empty cell.
    pub fn render_text(&self) -> String {
        let mut out = String::from("   ");
        for col in 0..self.columns {
            out.push_str(&format!("{col:>3}"));
        }
        out.push('\n');
        for (row, cells) in self.cells.iter().enumerate() {
            out.push_str(&format!("{row:>3}"));
            for &balloon in cells {
                out.push_str(if balloon { "  o" } else { "  ." });
            }
            out.push('\n');
        }
        out.push_str(&format!(
            "status: {}  balloons: {}  groups: {:?}\n",
            self.status.as_str(),
            self.balloons_remaining,
            self.catalog
        ));
        out
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub status: SessionStatus,
    pub seed: u32,
    pub pops: u32,
    pub popped: usize,
    #[serde(rename = "initialBalloons")]
    pub initial_balloons: usize,
    #[serde(rename = "initialGroups")]
    pub initial_groups: usize,
    pub remaining: usize,
}
