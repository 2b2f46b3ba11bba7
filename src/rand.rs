//! Lock-free shard picker.
//!
//! A single mutex-protected RNG would reintroduce the contention that
//! shard randomization exists to avoid, so state is striped across a
//! small set of independently-advanced SplitMix64 generators, chosen
//! round-robin via an atomic counter.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

struct Stripe {
    state: AtomicU64,
}

static STRIPES: OnceLock<Vec<Stripe>> = OnceLock::new();
static MASK: OnceLock<u32> = OnceLock::new();
static RR: AtomicU32 = AtomicU32::new(0);

fn stripes() -> (&'static Vec<Stripe>, u32) {
    let stripes = STRIPES.get_or_init(|| {
        let n = (num_cpus::get() * 4).max(1).next_power_of_two();
        let seed = splitmix_seed(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos() as i64,
        );
        let mut cur = seed;
        let mut v = Vec::with_capacity(n);
        for _ in 0..n {
            cur = splitmix_next(&mut cur);
            v.push(Stripe {
                state: AtomicU64::new(if cur == 0 { 0x9e3779b97f4a7c15 } else { cur }),
            });
        }
        v
    });
    let mask = *MASK.get_or_init(|| (stripes.len() as u32) - 1);
    (stripes, mask)
}

/// Primes the stripes at process startup so the first real call never
/// pays the initialization cost on the caller's critical path.
#[ctor::ctor]
fn prime_stripes() {
    stripes();
}

/// Returns a uniformly random index in `0..n` (`n` must be > 0).
pub fn index(n: usize) -> usize {
    debug_assert!(n > 0, "rand::index requires a positive bound");
    let (stripes, mask) = stripes();
    let i = (RR.fetch_add(1, Ordering::Relaxed) & mask) as usize;
    let x = splitmix_next_atomic(&stripes[i].state);
    (x % n as u64) as usize
}

fn splitmix_next_atomic(s: &AtomicU64) -> u64 {
    loop {
        let old = s.load(Ordering::Relaxed);
        let x = old.wrapping_add(0x9e3779b97f4a7c15);
        if s.compare_exchange(old, x, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            return mix(x);
        }
    }
}

fn splitmix_next(s: &mut u64) -> u64 {
    *s = s.wrapping_add(0x9e3779b97f4a7c15);
    mix(*s)
}

fn mix(z: u64) -> u64 {
    let mut z = z;
    z ^= z >> 30;
    z = z.wrapping_mul(0xbf58476d1ce4e5b9);
    z ^= z >> 27;
    z = z.wrapping_mul(0x94d049bb133111eb);
    z ^= z >> 31;
    z
}

fn splitmix_seed(seed: i64) -> u64 {
    let mut z = (seed as u64).wrapping_add(0x9e3779b97f4a7c15u64);
    z = mix(z);
    if z == 0 {
        z = 0x9e3779b97f4a7c15;
    }
    z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_stays_in_bounds() {
        for _ in 0..10_000 {
            assert!(index(7) < 7);
        }
    }

    #[test]
    fn index_of_one_is_always_zero() {
        for _ in 0..16 {
            assert_eq!(index(1), 0);
        }
    }
}
