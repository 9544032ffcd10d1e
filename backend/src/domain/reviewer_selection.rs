//! Candidate pools and randomised reviewer selection.
//!
//! Pools are built from a team roster: active members only, in roster order,
//! minus an exclusion set. Selection draws from the pool through a
//! [`ReviewerPicker`] so tests can substitute seeded or scripted randomness.

use std::sync::{Mutex, PoisonError};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::pull_request::MAX_REVIEWERS;
use super::team::TeamMember;
use super::user::UserId;

/// Source of randomness for reviewer selection.
#[cfg_attr(test, mockall::automock)]
pub trait ReviewerPicker: Send + Sync {
    /// Return a uniformly random permutation of `pool`.
    fn shuffle(&self, pool: Vec<UserId>) -> Vec<UserId>;

    /// Return a uniformly random index in `0..len`. `len` is never zero.
    fn pick_index(&self, len: usize) -> usize;
}

/// Production picker backed by a ChaCha8 stream.
#[derive(Debug)]
pub struct RandomReviewerPicker {
    rng: Mutex<ChaCha8Rng>,
}

impl RandomReviewerPicker {
    /// Seed from operating system entropy.
    pub fn from_os_rng() -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::from_os_rng()),
        }
    }

    /// Deterministic stream for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut ChaCha8Rng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}

impl ReviewerPicker for RandomReviewerPicker {
    fn shuffle(&self, mut pool: Vec<UserId>) -> Vec<UserId> {
        self.with_rng(|rng| pool.shuffle(rng));
        pool
    }

    fn pick_index(&self, len: usize) -> usize {
        self.with_rng(|rng| rng.random_range(0..len))
    }
}

/// Active members of `members`, in roster order, skipping `excluded`.
///
/// # Examples
/// ```
/// use backend::domain::{candidate_pool, TeamMember, UserId, Username};
///
/// let member = |id: &str, active| TeamMember {
///     user_id: UserId::new(id).unwrap(),
///     username: Username::new(id).unwrap(),
///     is_active: active,
/// };
/// let roster = [member("a", true), member("b", true), member("c", false)];
/// let author = UserId::new("a").unwrap();
/// let pool = candidate_pool(&roster, &[&author]);
/// assert_eq!(pool, vec![UserId::new("b").unwrap()]);
/// ```
pub fn candidate_pool(members: &[TeamMember], excluded: &[&UserId]) -> Vec<UserId> {
    members
        .iter()
        .filter(|member| member.is_active)
        .filter(|member| !excluded.contains(&&member.user_id))
        .map(|member| member.user_id.clone())
        .collect()
}

/// Initial reviewers: the first `min(2, |pool|)` entries of a shuffled pool.
///
/// An empty pool yields no reviewers.
pub fn select_initial(picker: &dyn ReviewerPicker, pool: Vec<UserId>) -> Vec<UserId> {
    if pool.is_empty() {
        return pool;
    }
    let mut shuffled = picker.shuffle(pool);
    shuffled.truncate(MAX_REVIEWERS);
    shuffled
}

/// A single uniformly drawn replacement, or `None` for an empty pool.
pub fn select_replacement(picker: &dyn ReviewerPicker, pool: Vec<UserId>) -> Option<UserId> {
    if pool.is_empty() {
        return None;
    }
    // Out-of-range picks wrap instead of panicking.
    let index = picker.pick_index(pool.len()) % pool.len();
    pool.into_iter().nth(index)
}
