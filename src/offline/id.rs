//! # Collision-Safe ID Generation
//!
//! Entities created on the client need an id before the store has seen them.
//! Ids are built from the wall clock and a random suffix so that devices and
//! sessions never need to coordinate:
//!
//! ```text
//! primary:  now_millis * 1_000_000 + random(0..=999_999)   (up to 10 tries)
//! fallback: now_millis * 1_000     + random(0..=999)       (not re-checked)
//! ```
//!
//! A candidate is rejected when it matches an id in the collection or one this
//! process handed out recently. After ten rejected candidates the coarser
//! fallback is returned as is, so generation always terminates.
//!
//! Randomness comes from the OS CSPRNG. If that is unavailable a time-seeded
//! `StdRng` takes over and a warning is logged once.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, OnceLock};

use crate::shared::entity::{Entity, EntityId};

/// Primary candidates tried before falling back
pub const PRIMARY_ATTEMPTS: usize = 10;

const PRIMARY_SCALE: u64 = 1_000_000;
const FALLBACK_SCALE: u64 = 1_000;
/// How many recently issued ids are remembered per generator
const RECENT_CAPACITY: usize = 4096;

/// Clock and random numbers used for id generation
pub trait EntropySource {
    /// Milliseconds since the Unix epoch
    fn now_millis(&mut self) -> u64;

    /// Uniform value in `0..bound`
    fn random_below(&mut self, bound: u32) -> u32;
}

impl<E: EntropySource + ?Sized> EntropySource for &mut E {
    fn now_millis(&mut self) -> u64 {
        (**self).now_millis()
    }

    fn random_below(&mut self, bound: u32) -> u32 {
        (**self).random_below(bound)
    }
}

/// System clock plus OS randomness
#[derive(Debug, Default)]
pub struct SystemEntropy {
    fallback: Option<StdRng>,
}

impl SystemEntropy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntropySource for SystemEntropy {
    fn now_millis(&mut self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }

    fn random_below(&mut self, bound: u32) -> u32 {
        if bound <= 1 {
            return 0;
        }
        if self.fallback.is_none() {
            match secure_below(bound) {
                Ok(value) => return value,
                Err(e) => {
                    tracing::warn!("OS randomness unavailable ({}), using seeded PRNG for ids", e);
                    let seed = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
                    self.fallback = Some(StdRng::seed_from_u64(seed));
                }
            }
        }
        match self.fallback.as_mut() {
            Some(rng) => rng.gen_range(0..bound),
            None => 0,
        }
    }
}

/// Unbiased value in `0..bound` from the OS CSPRNG
fn secure_below(bound: u32) -> Result<u32, getrandom::Error> {
    let limit = u32::MAX - (u32::MAX % bound);
    loop {
        let mut buf = [0u8; 4];
        getrandom::fill(&mut buf)?;
        let value = u32::from_le_bytes(buf);
        if value < limit {
            return Ok(value % bound);
        }
    }
}

/// Id generator remembering what it recently issued
#[derive(Debug)]
pub struct IdGenerator<E: EntropySource = SystemEntropy> {
    entropy: E,
    recent: VecDeque<EntityId>,
    recent_set: HashSet<EntityId>,
}

impl Default for IdGenerator<SystemEntropy> {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator<SystemEntropy> {
    pub fn new() -> Self {
        Self::with_entropy(SystemEntropy::new())
    }
}

impl<E: EntropySource> IdGenerator<E> {
    pub fn with_entropy(entropy: E) -> Self {
        Self {
            entropy,
            recent: VecDeque::with_capacity(RECENT_CAPACITY),
            recent_set: HashSet::with_capacity(RECENT_CAPACITY),
        }
    }

    /// New id not used by any entity in `existing`
    pub fn generate<T: Entity>(&mut self, existing: &[T]) -> EntityId {
        let taken: HashSet<EntityId> = existing.iter().filter_map(Entity::id).collect();
        self.generate_excluding(&taken)
    }

    /// New id not contained in `taken`
    pub fn generate_excluding(&mut self, taken: &HashSet<EntityId>) -> EntityId {
        for _ in 0..PRIMARY_ATTEMPTS {
            let now = self.entropy.now_millis();
            let candidate = now
                .saturating_mul(PRIMARY_SCALE)
                .saturating_add(u64::from(self.entropy.random_below(PRIMARY_SCALE as u32)));
            if candidate > 0 && !taken.contains(&candidate) && !self.recent_set.contains(&candidate) {
                self.remember(candidate);
                return candidate;
            }
        }

        let now = self.entropy.now_millis();
        let fallback = now
            .saturating_mul(FALLBACK_SCALE)
            .saturating_add(u64::from(self.entropy.random_below(FALLBACK_SCALE as u32)))
            .max(1);
        tracing::warn!(
            "{} id candidates collided, using coarse fallback id {}",
            PRIMARY_ATTEMPTS,
            fallback
        );
        self.remember(fallback);
        fallback
    }

    fn remember(&mut self, id: EntityId) {
        if self.recent.len() == RECENT_CAPACITY {
            if let Some(oldest) = self.recent.pop_front() {
                self.recent_set.remove(&oldest);
            }
        }
        self.recent.push_back(id);
        self.recent_set.insert(id);
    }
}

fn shared_generator() -> &'static Mutex<IdGenerator> {
    static GENERATOR: OnceLock<Mutex<IdGenerator>> = OnceLock::new();
    GENERATOR.get_or_init(|| Mutex::new(IdGenerator::new()))
}

/// New id for an entity joining `existing`, using the process-wide generator
pub fn generate_id<T: Entity>(existing: &[T]) -> EntityId {
    let mut generator = shared_generator().lock().unwrap_or_else(|e| e.into_inner());
    generator.generate(existing)
}
