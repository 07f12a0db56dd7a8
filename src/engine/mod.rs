use crate::config::GameConfig;
use crate::constants::MAX_PENDING_EVENTS;
use crate::error::ConfigError;
use crate::grid::{generate_grid, Grid};
use crate::groups::{group_representatives, GroupCatalog};
use crate::rng::Rng;
use crate::types::{Cell, RuntimeEvent, SessionStatus, SessionSummary, Snapshot};

mod click_system;

/// One balloon-popping session. All board mutation goes through [`GameEngine::click`]
/// and [`GameEngine::reset`].
#[derive(Clone, Debug)]
pub struct GameEngine {
    config: GameConfig,
    seed: u32,
    rng: Rng,
    grid: Grid,
    catalog: GroupCatalog,
    status: SessionStatus,
    events: Vec<RuntimeEvent>,

    pops: u32,
    popped: usize,
    initial_balloons: usize,
    initial_groups: usize,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    pub fn with_seed(config: GameConfig, seed: u32) -> Self {
        let mut rng = Rng::new(seed);
        let grid = generate_grid(&config, &mut rng);
        Self::from_parts(config, seed, rng, grid)
    }

    /// Starts a session on a prepared board. The board must match the configured size;
    /// later resets generate boards from `config` as usual.
    pub fn from_grid(config: GameConfig, grid: Grid, seed: u32) -> Result<Self, ConfigError> {
        if grid.rows() != config.rows() {
            return Err(ConfigError::InvalidConfiguration {
                field: "rows",
                value: grid.rows() as i64,
                reason: "board does not match the configured rows",
            });
        }
        if grid.columns() != config.columns() {
            return Err(ConfigError::InvalidConfiguration {
                field: "columns",
                value: grid.columns() as i64,
                reason: "board does not match the configured columns",
            });
        }
        Ok(Self::from_parts(config, seed, Rng::new(seed), grid))
    }

    fn from_parts(config: GameConfig, seed: u32, rng: Rng, grid: Grid) -> Self {
        let catalog = GroupCatalog::scan(&grid);
        let status = if grid.is_cleared() {
            SessionStatus::Cleared
        } else {
            SessionStatus::Playing
        };
        Self {
            config,
            seed,
            rng,
            initial_balloons: catalog.total_balloons(),
            initial_groups: catalog.group_count(),
            grid,
            catalog,
            status,
            events: Vec::new(),
            pops: 0,
            popped: 0,
        }
    }

    /// Replaces the board with a fresh one and resumes play, whatever the current status.
    /// The next seed comes from the session rng so seeded runs replay across resets.
    pub fn reset(&mut self) {
        self.seed = self.rng.next_u32();
        self.rng = Rng::new(self.seed);
        self.grid = generate_grid(&self.config, &mut self.rng);
        self.catalog = GroupCatalog::scan(&self.grid);
        self.status = SessionStatus::Playing;
        self.pops = 0;
        self.popped = 0;
        self.initial_balloons = self.catalog.total_balloons();
        self.initial_groups = self.catalog.group_count();
        self.push_event(RuntimeEvent::SessionReset { seed: self.seed });
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_ended(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn catalog(&self) -> &GroupCatalog {
        &self.catalog
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn pops(&self) -> u32 {
        self.pops
    }

    /// One cell from each largest group; clicking any of them is legal.
    pub fn legal_cells(&self) -> Vec<Cell> {
        if self.status != SessionStatus::Playing {
            return Vec::new();
        }
        let Some(max) = self.catalog.max_group_size() else {
            return Vec::new();
        };
        group_representatives(&self.grid)
            .into_iter()
            .filter(|(_, size)| *size == max)
            .map(|(cell, _)| cell)
            .collect()
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        let snapshot = Snapshot {
            rows: self.grid.rows(),
            columns: self.grid.columns(),
            cells: self.grid.to_rows(),
            status: self.status,
            catalog: self.catalog.sizes().to_vec(),
            max_group_size: self.catalog.max_group_size(),
            balloons_remaining: self.catalog.total_balloons(),
            pops: self.pops,
            seed: self.seed,
            events: if include_events {
                self.events.clone()
            } else {
                Vec::new()
            },
        };
        if include_events {
            self.events.clear();
        }
        snapshot
    }

    pub fn build_summary(&self) -> SessionSummary {
        SessionSummary {
            status: self.status,
            seed: self.seed,
            pops: self.pops,
            popped: self.popped,
            initial_balloons: self.initial_balloons,
            initial_groups: self.initial_groups,
            remaining: self.catalog.total_balloons(),
        }
    }

    fn push_event(&mut self, event: RuntimeEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }
}
