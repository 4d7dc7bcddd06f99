//! Core domain: scheduled continuations for timed gameplay effects.
//!
//! A timed effect registers a resume condition and an action. The owner polls
//! the list exactly once per simulation tick (and once at frame end), so an
//! action never runs concurrently with another tick or reentrantly.

/// When a pending continuation becomes due.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resume {
    /// Due on the first poll at or after this simulation time.
    At(f32),
    /// Due when the current frame ends.
    EndOfFrame,
}

#[derive(Debug, Clone)]
struct Pending<A> {
    resume: Resume,
    action: A,
}

/// Independent timed effects waiting on the simulation clock.
#[derive(Debug, Clone)]
pub struct Continuations<A> {
    pending: Vec<Pending<A>>,
}

impl<A> Default for Continuations<A> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<A> Continuations<A> {
    pub fn at(&mut self, time: f32, action: A) {
        self.pending.push(Pending {
            resume: Resume::At(time),
            action,
        });
    }

    pub fn after(&mut self, now: f32, delay: f32, action: A) {
        self.at(now + delay, action);
    }

    /// Resume on the next tick poll.
    pub fn next_tick(&mut self, now: f32, action: A) {
        self.at(now, action);
    }

    pub fn at_end_of_frame(&mut self, action: A) {
        self.pending.push(Pending {
            resume: Resume::EndOfFrame,
            action,
        });
    }

    /// Remove and return every time-based continuation due at `now`,
    /// earliest deadline first (ties keep scheduling order).
    pub fn take_due(&mut self, now: f32) -> Vec<A> {
        let (mut due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| matches!(p.resume, Resume::At(time) if time <= now));
        self.pending = waiting;

        due.sort_by(|a, b| match (a.resume, b.resume) {
            (Resume::At(x), Resume::At(y)) => x.total_cmp(&y),
            _ => std::cmp::Ordering::Equal,
        });
        due.into_iter().map(|p| p.action).collect()
    }

    /// Remove and return every continuation waiting on the frame boundary.
    pub fn take_end_of_frame(&mut self) -> Vec<A> {
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.resume == Resume::EndOfFrame);
        self.pending = waiting;
        due.into_iter().map(|p| p.action).collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &A> {
        self.pending.iter().map(|p| &p.action)
    }
}
