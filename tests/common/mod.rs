#![allow(dead_code)]

use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

/// Installs a test logger once per test binary. `RUST_LOG` overrides the
/// default, e.g. `RUST_LOG=prime_hashmap=trace`.
pub fn init_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();
        builder
            .filter_level(LevelFilter::Warn)
            .filter_module("prime_hashmap", LevelFilter::Debug)
            .is_test(true)
            .parse_default_env();
        let _ = builder.try_init();
    });
}

/// Rounds to two decimals, as the walkthrough readings are recorded.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Deterministic key stream.
pub fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}
