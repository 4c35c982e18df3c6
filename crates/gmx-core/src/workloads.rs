//! Static registry of guest workloads known to the harness.
//!
//! The registry carries the metadata needed to key checkpoints and to sanity
//! check experiment configs. The guest-side run scripts that drive these
//! workloads are provisioned on the disk image and are not modelled here.

/// How a workload signals its lifecycle to the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadKind {
    /// Containerised service invoked over HTTP by the in-guest client.
    /// Raises the full boot/start/pin exit sequence before checkpointing.
    Container {
        /// Container name pinned to the measurement core.
        container: &'static str,
    },
    /// Standalone benchmark binary; signals readiness for checkpoint once
    /// its setup phase is done, then runs to completion.
    Benchmark,
}

/// Registry entry for one guest workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadSpec {
    /// Workload key used in configs and checkpoint paths.
    pub name: &'static str,
    /// Lifecycle flavour of the workload.
    pub kind: WorkloadKind,
    /// Default number of measured invocations.
    pub invocations: u32,
    /// Default number of warmup invocations.
    pub warming: u32,
}

const CONTAINER_INVOCATIONS: u32 = 200;
const CONTAINER_WARMING: u32 = 5000;

/// All workloads the harness knows how to drive.
pub static REGISTRY: &[WorkloadSpec] = &[
    WorkloadSpec {
        name: "nodeapp",
        kind: WorkloadKind::Container {
            container: "nodeapp",
        },
        invocations: CONTAINER_INVOCATIONS,
        warming: CONTAINER_WARMING,
    },
    WorkloadSpec {
        name: "nodeapp-nginx",
        kind: WorkloadKind::Container { container: "nginx" },
        invocations: CONTAINER_INVOCATIONS,
        warming: CONTAINER_WARMING,
    },
    WorkloadSpec {
        name: "mediawiki",
        kind: WorkloadKind::Container { container: "wiki" },
        invocations: CONTAINER_INVOCATIONS,
        warming: CONTAINER_WARMING,
    },
    WorkloadSpec {
        name: "mediawiki-nginx",
        kind: WorkloadKind::Container { container: "nginx" },
        invocations: CONTAINER_INVOCATIONS,
        warming: CONTAINER_WARMING,
    },
    WorkloadSpec {
        name: "proto",
        kind: WorkloadKind::Benchmark,
        invocations: 1,
        warming: 0,
    },
    WorkloadSpec {
        name: "swissmap",
        kind: WorkloadKind::Benchmark,
        invocations: 1,
        warming: 0,
    },
    WorkloadSpec {
        name: "libc",
        kind: WorkloadKind::Benchmark,
        invocations: 1,
        warming: 0,
    },
    WorkloadSpec {
        name: "tcmalloc",
        kind: WorkloadKind::Benchmark,
        invocations: 1,
        warming: 0,
    },
    WorkloadSpec {
        name: "compression",
        kind: WorkloadKind::Benchmark,
        invocations: 1,
        warming: 0,
    },
    WorkloadSpec {
        name: "hashing",
        kind: WorkloadKind::Benchmark,
        invocations: 1,
        warming: 0,
    },
    WorkloadSpec {
        name: "stl",
        kind: WorkloadKind::Benchmark,
        invocations: 1,
        warming: 0,
    },
];

/// Looks up a workload by its registry key.
pub fn lookup_workload(name: &str) -> Option<&'static WorkloadSpec> {
    REGISTRY.iter().find(|spec| spec.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_keys_are_unique() {
        for (idx, spec) in REGISTRY.iter().enumerate() {
            assert!(
                REGISTRY[idx + 1..].iter().all(|other| other.name != spec.name),
                "duplicate workload key {}",
                spec.name
            );
        }
    }

    #[test]
    fn lookup_finds_container_workload() {
        let spec = lookup_workload("mediawiki").unwrap();
        assert_eq!(
            spec.kind,
            WorkloadKind::Container { container: "wiki" }
        );
    }

    #[test]
    fn lookup_misses_unknown_key() {
        assert!(lookup_workload("redis").is_none());
    }
}
