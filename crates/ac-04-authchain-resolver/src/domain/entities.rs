//! Resolution results.

use ac_03_authchain_cache::AuthchainCacheEntry;
use serde::Serialize;
use std::fmt;

/// How much of a resolution the cache saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionOutcome {
    /// Cached inactive; no queries.
    Perfect,
    /// Cached active and still unspent; one probe.
    Good,
    /// Cached active but advanced; probe plus resumed walk. Also reported,
    /// unconfirmed, when the spend check of the cached authhead fails.
    Partial,
    /// Not cached; full walk from the authbase.
    Miss,
}

impl ResolutionOutcome {
    pub const ALL: [ResolutionOutcome; 4] = [
        ResolutionOutcome::Perfect,
        ResolutionOutcome::Good,
        ResolutionOutcome::Partial,
        ResolutionOutcome::Miss,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionOutcome::Perfect => "perfect",
            ResolutionOutcome::Good => "good",
            ResolutionOutcome::Partial => "partial",
            ResolutionOutcome::Miss => "miss",
        }
    }

    /// Anything but a miss.
    pub fn is_hit(&self) -> bool {
        !matches!(self, ResolutionOutcome::Miss)
    }
}

impl fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of resolving one authchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// New chain state for the cache.
    pub entry: AuthchainCacheEntry,
    /// Spend queries issued.
    pub queries_used: u32,
    pub outcome: ResolutionOutcome,
    /// `false` when a spend check came back unknown; the entry is then a
    /// fail-closed guess and must not replace what the cache already holds.
    pub confirmed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        let labels: Vec<_> = ResolutionOutcome::ALL.iter().map(|o| o.to_string()).collect();
        assert_eq!(labels, ["perfect", "good", "partial", "miss"]);
        assert!(ResolutionOutcome::Partial.is_hit());
        assert!(!ResolutionOutcome::Miss.is_hit());
    }
}
