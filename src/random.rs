/// Random streams a generator can draw from
///
/// A generator either owns a private `StdRng` (reproducible when seeded) or
/// holds a handle to a shared stream. Generators on the same shared stream
/// interleave their draws, so their outputs depend on everything else that
/// drew from it: they are not safe for unsynchronized concurrent use when
/// reproducible output matters.
use crate::config::ExpanderConfig;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

static GLOBAL: OnceLock<SharedRng> = OnceLock::new();

/// A clonable handle to one random stream
#[derive(Clone, Debug)]
pub struct SharedRng {
    inner: Arc<Mutex<StdRng>>,
}

impl SharedRng {
    pub fn new(rng: StdRng) -> Self {
        SharedRng {
            inner: Arc::new(Mutex::new(rng)),
        }
    }

    /// The process-wide stream, seeded from the OS on first use
    pub fn global() -> Self {
        GLOBAL
            .get_or_init(|| SharedRng::new(StdRng::from_entropy()))
            .clone()
    }

    fn lock(&self) -> MutexGuard<'_, StdRng> {
        // A panic mid-draw leaves the generator state valid
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RngCore for SharedRng {
    fn next_u32(&mut self) -> u32 {
        self.lock().next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.lock().next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.lock().fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.lock().try_fill_bytes(dest)
    }
}

/// The random source strategy of a generator, fixed at construction
#[derive(Debug)]
pub enum RandomStream {
    Private(StdRng),
    Shared(SharedRng),
}

impl RandomStream {
    pub fn seeded(seed: u64) -> Self {
        RandomStream::Private(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        RandomStream::Private(StdRng::from_entropy())
    }

    pub fn global() -> Self {
        RandomStream::Shared(SharedRng::global())
    }

    /// Pick the stream described by `config`
    pub fn from_config(config: &ExpanderConfig) -> Self {
        if config.unlink_seed_from_prompt {
            if config.seed.is_some() {
                tracing::debug!("Prompt is unlinked from the seed, ignoring configured seed");
            }
            return RandomStream::global();
        }

        match config.seed {
            Some(seed) => RandomStream::seeded(seed),
            None => RandomStream::from_entropy(),
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, RandomStream::Shared(_))
    }
}

impl RngCore for RandomStream {
    fn next_u32(&mut self) -> u32 {
        match self {
            RandomStream::Private(rng) => rng.next_u32(),
            RandomStream::Shared(rng) => rng.next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self {
            RandomStream::Private(rng) => rng.next_u64(),
            RandomStream::Shared(rng) => rng.next_u64(),
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        match self {
            RandomStream::Private(rng) => rng.fill_bytes(dest),
            RandomStream::Shared(rng) => rng.fill_bytes(dest),
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        match self {
            RandomStream::Private(rng) => rng.try_fill_bytes(dest),
            RandomStream::Shared(rng) => rng.try_fill_bytes(dest),
        }
    }
}
