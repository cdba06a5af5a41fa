/// Users admitted to one server at one tick.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UserBatch {
    pub arrival_tick: u64,
    pub user_count: u32,
}

#[derive(Clone, Debug)]
pub struct ServerInstance {
    batches: Vec<UserBatch>,
    occupancy: u32,
    ttask: u32,
    umax: u32,
}

impl ServerInstance {
    /// Opens a server holding `users` admitted at `tick`. Callers never
    /// open a server for zero users or for more than it can hold.
    pub fn create(tick: u64, users: u32, ttask: u32, umax: u32) -> Self {
        debug_assert!(users > 0 && users <= umax);
        Self {
            batches: vec![UserBatch {
                arrival_tick: tick,
                user_count: users,
            }],
            occupancy: users,
            ttask,
            umax,
        }
    }

    /// Drops every batch whose age is exactly `ttask` and returns the
    /// remaining occupancy.
    pub fn expire(&mut self, current_tick: u64) -> u32 {
        let ttask = u64::from(self.ttask);
        let mut released = 0;
        self.batches.retain(|batch| {
            // Exact match: each batch is checked once per tick, never skipped.
            let expired = current_tick.checked_sub(batch.arrival_tick) == Some(ttask);
            if expired {
                released += batch.user_count;
            }
            !expired
        });
        self.occupancy -= released;
        self.occupancy
    }

    /// Takes as many of `requested` users as fit and returns the rest.
    pub fn admit(&mut self, tick: u64, requested: u64) -> u64 {
        if self.is_full() || requested == 0 {
            return requested;
        }
        let free = self.umax - self.occupancy;
        let accepted = requested.min(u64::from(free)) as u32;
        self.batches.push(UserBatch {
            arrival_tick: tick,
            user_count: accepted,
        });
        self.occupancy += accepted;
        requested - u64::from(accepted)
    }

    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    pub fn is_full(&self) -> bool {
        self.occupancy == self.umax
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy == 0
    }

    pub fn batches(&self) -> &[UserBatch] {
        &self.batches
    }
}
