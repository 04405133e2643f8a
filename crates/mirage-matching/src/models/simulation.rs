//! The simulation catalog.

use super::pair::Pair;
use parking_lot::RwLock;
use std::sync::Arc;

/// An insertion-ordered catalog of matcher/response pairs.
///
/// The pair sequence is copy-on-write: appends and rebuilds clone the
/// current sequence and swap the reference, so a lookup that captured a
/// [`Simulation::snapshot`] keeps iterating a consistent catalog even while
/// a collaborator reloads it.
#[derive(Debug, Default)]
pub struct Simulation {
    pairs: RwLock<Arc<Vec<Arc<Pair>>>>,
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair at the end of the catalog. O(1) unless a lookup holds a
    /// snapshot, in which case the sequence is cloned first.
    pub fn add_pair(&self, pair: Pair) {
        let mut guard = self.pairs.write();
        Arc::make_mut(&mut *guard).push(Arc::new(pair));
    }

    /// Replace the whole catalog atomically.
    pub fn replace(&self, pairs: impl IntoIterator<Item = Pair>) {
        let next: Vec<Arc<Pair>> = pairs.into_iter().map(Arc::new).collect();
        *self.pairs.write() = Arc::new(next);
    }

    /// Capture the current pair sequence in insertion order.
    pub fn snapshot(&self) -> Arc<Vec<Arc<Pair>>> {
        Arc::clone(&self.pairs.read())
    }

    pub fn len(&self) -> usize {
        self.pairs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.read().is_empty()
    }
}

impl FromIterator<Pair> for Simulation {
    fn from_iter<I: IntoIterator<Item = Pair>>(pairs: I) -> Self {
        let simulation = Simulation::new();
        simulation.replace(pairs);
        simulation
    }
}
