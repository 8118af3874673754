//! Strategy catalogue including transport-backed strategies

use application::{StrategyKind, StrategyRegistry};

use crate::adapters::HttpEgressStrategy;

/// Every strategy this build can run
pub fn default_strategy_registry() -> StrategyRegistry {
    let mut registry = StrategyRegistry::new();
    registry.register(StrategyKind::HttpEgress, HttpEgressStrategy::construct);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_every_kind() {
        let registry = default_strategy_registry();
        for kind in StrategyKind::ALL {
            assert!(registry.is_registered(kind), "{kind} missing");
        }
    }
}
