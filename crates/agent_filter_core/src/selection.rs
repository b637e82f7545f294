use rand::seq::{index, SliceRandom};
use rand::Rng;

/// Random subset drawn from a candidate pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub candidates: Vec<String>,
    pub requested: usize,
    /// Set when `requested` exceeded the pool and was reduced to its size.
    pub clamped_to: Option<usize>,
}

/// Draws `requested` identities without replacement, keeping pool order.
pub fn sample_candidates<R: Rng + ?Sized>(
    pool: &[String],
    requested: usize,
    rng: &mut R,
) -> Selection {
    let (amount, clamped_to) = if requested > pool.len() {
        (pool.len(), Some(pool.len()))
    } else {
        (requested, None)
    };

    let mut picked = index::sample(rng, pool.len(), amount).into_vec();
    picked.sort_unstable();

    Selection {
        candidates: picked.into_iter().map(|i| pool[i].clone()).collect(),
        requested,
        clamped_to,
    }
}

/// Identities that received a 200 response, in probe order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AcceptedSet {
    identities: Vec<String>,
}

impl AcceptedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, identity: String) {
        self.identities.push(identity);
    }

    pub fn as_slice(&self) -> &[String] {
        &self.identities
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Picks one accepted identity for a downstream request.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.identities.choose(rng).map(String::as_str)
    }
}

impl From<Vec<String>> for AcceptedSet {
    fn from(identities: Vec<String>) -> Self {
        Self { identities }
    }
}
