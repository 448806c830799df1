use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use thread_local::ThreadLocal;

use super::encoder::SampleRate;

// Golden-ratio increment, spreads consecutive stream ids across the seed space.
const STREAM_SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;

/// Decides whether a sampled update is emitted.
///
/// The sampler is seeded once. Every thread that draws through it gets a
/// private generator derived from that seed, so concurrent callers never
/// share generator state and never contend on a lock.
pub struct Sampler {
    seed: u64,
    next_stream: AtomicU64,
    generators: ThreadLocal<RefCell<Xoshiro256PlusPlus>>,
}

impl Sampler {
    /// Creates a sampler seeded from the wall clock.
    #[must_use]
    pub fn from_time() -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_nanos() as u64);
        Self::with_seed(seed)
    }

    /// Creates a sampler with a fixed seed. Single-threaded draws are reproducible.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            next_stream: AtomicU64::new(0),
            generators: ThreadLocal::new(),
        }
    }

    /// Returns whether an update at `rate` should be emitted.
    ///
    /// Full and empty rates are decided without consuming randomness.
    pub fn accept(&self, rate: SampleRate) -> bool {
        if rate.is_always() {
            return true;
        }
        if rate.is_never() {
            return false;
        }
        self.draw() <= rate.value()
    }

    /// Uniform draw in `[0, 1)` from the calling thread's generator.
    fn draw(&self) -> f32 {
        let generator = self.generators.get_or(|| {
            let stream = self.next_stream.fetch_add(1, Ordering::Relaxed);
            let seed = self.seed.wrapping_add(stream.wrapping_mul(STREAM_SPREAD));
            RefCell::new(Xoshiro256PlusPlus::seed_from_u64(seed))
        });
        generator.borrow_mut().random::<f32>()
    }
}

impl std::fmt::Debug for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sampler").field("seed", &self.seed).finish()
    }
}
