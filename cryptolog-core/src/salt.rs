//! Rotating salt shared between the refresh task and line transforms

use crate::{CryptologError, Result};
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::TryRngCore;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

pub const SALT_SIZE: usize = 16; // 128 bits

/// Secret key material for the pseudonym HMAC
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

// Salts must never end up in logs.
impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Salt(..)")
    }
}

/// Source of random bytes for salt generation
pub trait EntropySource: Send + Sync {
    fn fill(&self, buf: &mut [u8]) -> Result<()>;
}

/// Operating system CSPRNG
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<()> {
        let mut rng = OsRng;
        rng.try_fill_bytes(buf)
            .map_err(|e| CryptologError::EntropySource(e.to_string()))
    }
}

/// Holds the current salt and replaces it on a fixed period.
///
/// The initial salt is generated at construction; a started rotation first
/// fires one full period later.
pub struct SaltClock {
    current: Mutex<Salt>,
    entropy: Box<dyn EntropySource>,
    rotations: AtomicU64,
}

impl SaltClock {
    /// Create a clock seeded from the operating system CSPRNG
    pub fn new() -> Result<Self> {
        Self::with_entropy(Box::new(OsEntropy))
    }

    /// Create a clock drawing its salts from `entropy`
    pub fn with_entropy(entropy: Box<dyn EntropySource>) -> Result<Self> {
        let initial = generate(entropy.as_ref())?;
        Ok(Self {
            current: Mutex::new(initial),
            entropy,
            rotations: AtomicU64::new(0),
        })
    }

    /// Create a clock holding a fixed salt; later rotations use the OS CSPRNG
    pub fn with_salt(salt: Salt) -> Self {
        Self {
            current: Mutex::new(salt),
            entropy: Box::new(OsEntropy),
            rotations: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current salt
    pub fn current(&self) -> Salt {
        *self.current.lock()
    }

    /// Generate a fresh salt and make it current
    pub fn rotate(&self) -> Result<()> {
        let next = self.regenerate()?;
        *self.current.lock() = next;
        let count = self.rotations.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(rotation = count, "Salt rotated");
        Ok(())
    }

    /// Number of completed rotations since construction
    pub fn rotations(&self) -> u64 {
        self.rotations.load(Ordering::SeqCst)
    }

    fn regenerate(&self) -> Result<Salt> {
        generate(self.entropy.as_ref())
    }

    /// Spawn the background refresh loop on the current tokio runtime
    pub fn start(self: &Arc<Self>, period: Duration) -> Result<SaltRotation> {
        if period.is_zero() {
            return Err(CryptologError::InvalidSaltLifetime(
                "salt lifetime must be greater than zero".into(),
            ));
        }

        info!("Salt rotation started: lifetime {:?}", period);
        let handle = tokio::spawn(run_rotation(Arc::clone(self), period));
        Ok(SaltRotation { handle })
    }
}

fn generate(entropy: &dyn EntropySource) -> Result<Salt> {
    let mut bytes = [0u8; SALT_SIZE];
    entropy.fill(&mut bytes)?;
    Ok(Salt(bytes))
}

async fn run_rotation(clock: Arc<SaltClock>, period: Duration) -> Result<()> {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if let Err(e) = clock.rotate() {
            error!("Salt rotation failed, refusing to keep a stale salt: {}", e);
            return Err(e);
        }
    }
}

/// Handle to a running refresh loop
pub struct SaltRotation {
    handle: JoinHandle<Result<()>>,
}

impl SaltRotation {
    /// Abort the refresh loop
    pub fn stop(&self) {
        self.handle.abort();
    }

    /// Wait for the loop to end. Only returns early on failure or after `stop`.
    pub async fn join(self) -> Result<()> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Like `join`, without consuming the handle (usable inside `select!`)
    pub async fn wait(&mut self) -> Result<()> {
        match (&mut self.handle).await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
