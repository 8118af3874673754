//! Strategy names and constructors

use std::{collections::HashMap, fmt, str::FromStr, sync::Arc};

use tracing::info;

use super::{BroadcastStrategy, PointToPointStrategy, TerminusStrategy};
use crate::{
    config::ServiceConfig,
    error::ApplicationError,
    ports::{ClientPort, ServerPort, StrategyPort},
};

/// The closed set of strategies a node can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Answers locally, no downstream
    Terminus,
    /// Forwards to exactly one downstream
    PointToPointChannel,
    /// Fans out to every downstream
    BroadcastChannel,
    /// Calls an external HTTP endpoint
    HttpEgress,
}

impl StrategyKind {
    /// Every kind, in CLI order
    pub const ALL: [Self; 4] = [
        Self::Terminus,
        Self::PointToPointChannel,
        Self::BroadcastChannel,
        Self::HttpEgress,
    ];

    /// Canonical name used on the command line and in config
    pub const fn name(self) -> &'static str {
        match self {
            Self::Terminus => "terminus",
            Self::PointToPointChannel => "point-to-point-channel",
            Self::BroadcastChannel => "broadcast-channel",
            Self::HttpEgress => "http-egress",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ApplicationError::Construction(format!("no strategy named [{s}]")))
    }
}

/// Builds a strategy from the node config and its topology
pub type StrategyConstructor = fn(
    &ServiceConfig,
    &[Arc<dyn ServerPort>],
    &[Arc<dyn ClientPort>],
) -> Result<Arc<dyn StrategyPort>, ApplicationError>;

/// Maps strategy kinds to their constructors
///
/// [`StrategyRegistry::new`] knows the strategies that need no transport.
/// Transport-backed strategies are added by the layer that owns the
/// transport.
#[derive(Clone)]
pub struct StrategyRegistry {
    constructors: HashMap<StrategyKind, StrategyConstructor>,
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&'static str> = self.constructors.keys().map(|k| k.name()).collect();
        kinds.sort_unstable();
        f.debug_struct("StrategyRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyRegistry {
    /// Registry with terminus, point-to-point and broadcast
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry
            .register(StrategyKind::Terminus, TerminusStrategy::construct)
            .register(
                StrategyKind::PointToPointChannel,
                PointToPointStrategy::construct,
            )
            .register(StrategyKind::BroadcastChannel, BroadcastStrategy::construct);
        registry
    }

    /// Registry with nothing registered
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Add or replace the constructor for a kind
    pub fn register(&mut self, kind: StrategyKind, constructor: StrategyConstructor) -> &mut Self {
        self.constructors.insert(kind, constructor);
        self
    }

    /// Whether a constructor exists for the kind
    pub fn is_registered(&self, kind: StrategyKind) -> bool {
        self.constructors.contains_key(&kind)
    }

    /// Resolve a strategy by name and construct it
    pub fn build(
        &self,
        name: &str,
        config: &ServiceConfig,
        servers: &[Arc<dyn ServerPort>],
        clients: &[Arc<dyn ClientPort>],
    ) -> Result<Arc<dyn StrategyPort>, ApplicationError> {
        let kind: StrategyKind = name.parse()?;
        let constructor = self.constructors.get(&kind).ok_or_else(|| {
            ApplicationError::Construction(format!("strategy [{kind}] is not available"))
        })?;

        let strategy = constructor(config, servers, clients)?;
        info!(
            strategy = %kind,
            servers = servers.len(),
            clients = clients.len(),
            "Strategy constructed"
        );
        Ok(strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::test_support::{idle_clients, servers};

    #[test]
    fn names_round_trip() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.name().parse::<StrategyKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "Terminus".parse::<StrategyKind>().unwrap_err();
        assert_eq!(
            err,
            ApplicationError::Construction("no strategy named [Terminus]".to_string())
        );
    }

    #[test]
    fn default_registry_has_local_strategies() {
        let registry = StrategyRegistry::new();
        assert!(registry.is_registered(StrategyKind::Terminus));
        assert!(registry.is_registered(StrategyKind::PointToPointChannel));
        assert!(registry.is_registered(StrategyKind::BroadcastChannel));
        assert!(!registry.is_registered(StrategyKind::HttpEgress));
    }

    #[test]
    fn unregistered_kind_is_a_construction_error() {
        let err = StrategyRegistry::new()
            .build("http-egress", &ServiceConfig::new("x"), &servers(1), &[])
            .err().unwrap();
        assert!(matches!(err, ApplicationError::Construction(_)));
        assert!(err.to_string().contains("http-egress"));
    }

    #[test]
    fn builds_terminus_by_name() {
        let registry = StrategyRegistry::new();
        assert!(
            registry
                .build("terminus", &ServiceConfig::new("x"), &servers(1), &[])
                .is_ok()
        );
    }

    #[test]
    fn build_surfaces_topology_errors() {
        let err = StrategyRegistry::new()
            .build(
                "broadcast-channel",
                &ServiceConfig::new("x"),
                &servers(1),
                &idle_clients(1),
            )
            .err().unwrap();
        assert!(err.to_string().contains("broadcast-channel"));
    }

    #[test]
    fn register_replaces_constructor() {
        let mut registry = StrategyRegistry::empty();
        registry.register(StrategyKind::HttpEgress, |_, _, _| {
            Err(ApplicationError::Construction("egress disabled".to_string()))
        });
        assert!(registry.is_registered(StrategyKind::HttpEgress));

        let err = registry
            .build("http-egress", &ServiceConfig::new("x"), &servers(1), &[])
            .err().unwrap();
        assert_eq!(err.to_string(), "Construction failed: egress disabled");
    }

    #[test]
    fn debug_lists_kinds() {
        let debug = format!("{:?}", StrategyRegistry::new());
        assert!(debug.contains("terminus"));
        assert!(debug.contains("broadcast-channel"));
    }
}
