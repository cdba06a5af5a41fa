use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::models::SimParams;
use crate::state::ServerInstance;

/// Occupancy of every live server after one tick, in creation order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TickRow {
    pub tick: u64,
    pub occupancies: Vec<u32>,
}

impl fmt::Display for TickRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.occupancies.is_empty() {
            return write!(f, "0");
        }
        for (idx, occupancy) in self.occupancies.iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", occupancy)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SimulationResult {
    pub params: SimParams,
    pub rows: Vec<TickRow>,
    pub total_cost: u64,
    pub peak_servers: usize,
}

/// The server pool. Servers stay in creation order, which is both the
/// admission priority and the column order of every row.
pub struct SimulationEngine {
    params: SimParams,
    servers: Vec<ServerInstance>,
    tick: u64,
    total_cost: u64,
    peak_servers: usize,
}

impl SimulationEngine {
    pub fn new(params: SimParams) -> Self {
        Self {
            params,
            servers: Vec::new(),
            tick: 0,
            total_cost: 0,
            peak_servers: 0,
        }
    }

    /// Runs the next tick (the first call is tick 1): expiry, then
    /// admission of `arrivals`, then the occupancy row.
    pub fn step(&mut self, arrivals: u64) -> TickRow {
        let tick = self.tick + 1;
        self.advance_tick(tick);
        if arrivals > 0 {
            self.admit_users(tick, arrivals);
        }
        self.row(tick)
    }

    /// Expiry phase. Every server present is charged one unit of cost,
    /// including the ones that empty out and are dropped here. Returns
    /// the number of servers charged.
    pub fn advance_tick(&mut self, tick: u64) -> u64 {
        self.tick = tick;
        let visited = self.servers.len() as u64;
        for server in &mut self.servers {
            server.expire(tick);
        }
        self.total_cost += visited;

        let before = self.servers.len();
        self.servers.retain(|server| !server.is_empty());
        let removed = before - self.servers.len();
        if removed > 0 {
            trace!(tick, removed, "released empty servers");
        }
        visited
    }

    /// Admission phase. Existing servers are filled oldest first, then new
    /// servers are appended until every user has a slot.
    pub fn admit_users(&mut self, tick: u64, count: u64) {
        let mut remaining = count;
        for server in &mut self.servers {
            if remaining == 0 {
                break;
            }
            remaining = server.admit(tick, remaining);
        }

        let SimParams { ttask, umax } = self.params;
        while remaining > 0 {
            let users = remaining.min(u64::from(umax)) as u32;
            self.servers.push(ServerInstance::create(tick, users, ttask, umax));
            remaining -= u64::from(users);
            trace!(tick, users, servers = self.servers.len(), "opened server");
        }
    }

    pub fn row(&mut self, tick: u64) -> TickRow {
        self.peak_servers = self.peak_servers.max(self.servers.len());
        TickRow {
            tick,
            occupancies: self.servers.iter().map(ServerInstance::occupancy).collect(),
        }
    }

    pub fn servers(&self) -> &[ServerInstance] {
        &self.servers
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn total_cost(&self) -> u64 {
        self.total_cost
    }

    pub fn peak_servers(&self) -> usize {
        self.peak_servers
    }
}

pub fn run_simulation(params: SimParams, arrivals: &[u64]) -> SimulationResult {
    let mut engine = SimulationEngine::new(params);
    let rows = arrivals.iter().map(|&count| engine.step(count)).collect();

    SimulationResult {
        params,
        rows,
        total_cost: engine.total_cost(),
        peak_servers: engine.peak_servers(),
    }
}
