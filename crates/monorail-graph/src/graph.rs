use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use monorail_core::PackageInfo;

use crate::error::{GraphError, Result};

/// Directed graph over the packages of a monorepo.
///
/// An edge A -> B means A depends on B. The graph is a value built from a
/// snapshot of the package set at planning start; it is never mutated
/// afterwards, so traversal order is a pure function of that snapshot.
#[derive(Debug)]
pub struct PackageGraph {
    graph: DiGraph<String, ()>,
    name_to_node: HashMap<String, NodeIndex>,
}

impl PackageGraph {
    /// Builds the graph from the discovered packages and their declared
    /// local dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownDependency`] when a package names a
    /// dependency that is not part of the package set.
    pub fn build(packages: &[PackageInfo]) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut name_to_node = HashMap::new();

        for package in packages {
            let index = graph.add_node(package.name.clone());
            name_to_node.insert(package.name.clone(), index);
            debug!(package = %package.name, "added package node");
        }

        for package in packages {
            let from = name_to_node[&package.name];
            for dependency in &package.dependencies {
                let Some(&to) = name_to_node.get(dependency) else {
                    return Err(GraphError::UnknownDependency {
                        package: package.name.clone(),
                        dependency: dependency.clone(),
                    });
                };
                graph.add_edge(from, to, ());
            }
        }

        Ok(Self {
            graph,
            name_to_node,
        })
    }

    /// Names of the local dependencies of `name`.
    #[must_use]
    pub fn dependencies_of(&self, name: &str) -> Vec<&str> {
        self.name_to_node
            .get(name)
            .map(|&index| {
                self.graph
                    .neighbors_directed(index, Direction::Outgoing)
                    .map(|dep| self.graph[dep].as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Names of the packages that depend on `name`.
    #[must_use]
    pub fn dependents_of(&self, name: &str) -> Vec<&str> {
        self.name_to_node
            .get(name)
            .map(|&index| {
                self.graph
                    .neighbors_directed(index, Direction::Incoming)
                    .map(|dep| self.graph[dep].as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.name_to_node.contains_key(name)
    }

    /// Package names in topological order, dependencies before dependents.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CycleDetected`] naming the packages on the
    /// cycle. Cycles are a configuration error, never resolved by picking
    /// an arbitrary order.
    pub fn topo_order(&self) -> Result<Vec<String>> {
        match toposort(&self.graph, None) {
            Ok(order) => {
                // toposort puts dependents before the packages they depend
                // on (edges point at dependencies), so flip it.
                let mut names: Vec<String> =
                    order.into_iter().map(|index| self.graph[index].clone()).collect();
                names.reverse();
                Ok(names)
            }
            Err(_) => {
                let members = self.cycle_members();
                Err(GraphError::CycleDetected { members })
            }
        }
    }

    fn cycle_members(&self) -> Vec<String> {
        tarjan_scc(&self.graph)
            .into_iter()
            .find(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&n| self.graph.find_edge(n, n).is_some())
            })
            .map(|component| {
                component
                    .into_iter()
                    .map(|index| self.graph[index].clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use semver::Version;

    use super::*;

    fn package(name: &str, dependencies: &[&str]) -> PackageInfo {
        PackageInfo {
            name: name.to_string(),
            version: Version::new(1, 0, 0),
            private: false,
            dependencies: dependencies.iter().map(ToString::to_string).collect(),
            path: PathBuf::from("packages").join(name),
        }
    }

    #[test]
    fn topo_order_puts_dependencies_first() {
        let packages = vec![
            package("app", &["lib", "util"]),
            package("lib", &["util"]),
            package("util", &[]),
        ];

        let graph = PackageGraph::build(&packages).expect("acyclic");
        let order = graph.topo_order().expect("acyclic");

        let pos = |name: &str| order.iter().position(|n| n == name).expect("present");
        assert!(pos("util") < pos("lib"));
        assert!(pos("lib") < pos("app"));
    }

    #[test]
    fn cycle_is_a_reported_error() {
        let packages = vec![package("a", &["b"]), package("b", &["a"])];

        let graph = PackageGraph::build(&packages).expect("edges resolve");
        let err = graph.topo_order().expect_err("cycle");

        match err {
            GraphError::CycleDetected { members } => {
                assert!(members.contains(&"a".to_string()));
                assert!(members.contains(&"b".to_string()));
            }
            other => panic!("expected cycle error, got {other:?}"),
        }
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let packages = vec![package("a", &["a"])];

        let graph = PackageGraph::build(&packages).expect("edges resolve");
        let err = graph.topo_order().expect_err("cycle");

        assert!(matches!(err, GraphError::CycleDetected { members } if members == ["a"]));
    }

    #[test]
    fn unknown_dependency_is_rejected_at_build() {
        let packages = vec![package("a", &["missing"])];

        let err = PackageGraph::build(&packages).expect_err("unknown dep");
        let msg = err.to_string();

        assert!(msg.contains('a'));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn dependents_are_the_reverse_edges() {
        let packages = vec![
            package("app", &["lib"]),
            package("lib", &[]),
        ];

        let graph = PackageGraph::build(&packages).expect("acyclic");

        assert_eq!(graph.dependents_of("lib"), ["app"]);
        assert_eq!(graph.dependencies_of("app"), ["lib"]);
        assert!(graph.dependents_of("app").is_empty());
    }

    #[test]
    fn empty_package_set_builds_an_empty_graph() {
        let graph = PackageGraph::build(&[]).expect("empty is fine");
        assert!(graph.topo_order().expect("empty order").is_empty());
    }
}
