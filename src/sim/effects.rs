//! Timed power-up effects
//!
//! Effects are tracked as absolute expiry timestamps against the per-tick
//! sampled clock. There is exactly one entry per kind: re-activating an effect
//! moves its expiry, durations never stack.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Effects that last for a fixed duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Ball speed multiplied by [`SLOW_FACTOR`]
    Slow,
    /// Paddle width modifier raised by [`WIDEN_STEP`]
    Widen,
    /// Balls attach to the paddle on contact
    Sticky,
    /// Paddle fires laser pairs while fire is held
    Laser,
}

impl EffectKind {
    pub fn duration_ms(self) -> u64 {
        match self {
            EffectKind::Slow => SLOW_DURATION_MS,
            EffectKind::Widen => WIDEN_DURATION_MS,
            EffectKind::Sticky => STICKY_DURATION_MS,
            EffectKind::Laser => LASER_DURATION_MS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EffectKind::Slow => "Slow",
            EffectKind::Widen => "Widen",
            EffectKind::Sticky => "Sticky",
            EffectKind::Laser => "Laser",
        }
    }
}

/// Active effects keyed by kind, valued by expiry time (ms)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    expiries: BTreeMap<EffectKind, u64>,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) an effect; returns the new expiry
    pub fn activate(&mut self, kind: EffectKind, now_ms: u64) -> u64 {
        let expiry = now_ms.saturating_add(kind.duration_ms());
        self.expiries.insert(kind, expiry);
        expiry
    }

    /// Whether an effect is present and not yet due
    pub fn is_active(&self, kind: EffectKind, now_ms: u64) -> bool {
        self.expiries.get(&kind).is_some_and(|&expiry| now_ms < expiry)
    }

    pub fn expiry(&self, kind: EffectKind) -> Option<u64> {
        self.expiries.get(&kind).copied()
    }

    /// Remove and return every effect whose expiry is at or before `now_ms`
    pub fn take_expired(&mut self, now_ms: u64) -> Vec<EffectKind> {
        let expired: Vec<EffectKind> = self
            .expiries
            .iter()
            .filter(|&(_, &expiry)| expiry <= now_ms)
            .map(|(&kind, _)| kind)
            .collect();
        for kind in &expired {
            self.expiries.remove(kind);
        }
        expired
    }

    /// Kinds currently tracked, in stable order
    pub fn kinds(&self) -> impl Iterator<Item = EffectKind> + '_ {
        self.expiries.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.expiries.is_empty()
    }

    pub fn clear(&mut self) {
        self.expiries.clear();
    }
}
