//! Global config handle.
//!
//! Uses `arc-swap` for lock-free reads from request handler threads.

use crate::config::SyllabusConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<SyllabusConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(SyllabusConfig::default()));

#[inline]
pub fn cfg() -> Arc<SyllabusConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: SyllabusConfig) -> Arc<SyllabusConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}
