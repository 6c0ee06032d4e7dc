use super::TaskNetwork;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::VecDeque;

/// Directed dependency graph over network task indices. Node weights are
/// indices into the owning [`TaskNetwork`], edges run predecessor to
/// successor.
pub struct NetworkDag {
    pub graph: DiGraph<usize, ()>,
    nodes: Vec<NodeIndex>,
}

impl NetworkDag {
    pub fn build(network: &TaskNetwork) -> Self {
        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..network.len()).map(|idx| graph.add_node(idx)).collect();

        for idx in 0..network.len() {
            for &pred_idx in network.predecessors_of(idx) {
                graph.add_edge(nodes[pred_idx], nodes[idx], ());
            }
        }

        Self { graph, nodes }
    }

    /// Kahn's algorithm over the dag. Returns the topological order of
    /// task indices plus the residue that never became ready: cycle
    /// members and every task downstream of one. The residue cannot be
    /// dated and is reported separately from dangling logic.
    pub fn kahn_order(&self) -> (Vec<usize>, Vec<usize>) {
        let count = self.nodes.len();
        let mut in_degree = vec![0usize; count];
        for (idx, in_deg) in in_degree.iter_mut().enumerate() {
            *in_deg = self
                .graph
                .neighbors_directed(self.nodes[idx], Direction::Incoming)
                .count();
        }

        let mut ready: VecDeque<usize> = (0..count).filter(|&idx| in_degree[idx] == 0).collect();
        let mut order = Vec::with_capacity(count);
        while let Some(idx) = ready.pop_front() {
            order.push(idx);
            for succ_node in self
                .graph
                .neighbors_directed(self.nodes[idx], Direction::Outgoing)
            {
                let succ_idx = self.graph[succ_node];
                in_degree[succ_idx] -= 1;
                if in_degree[succ_idx] == 0 {
                    ready.push_back(succ_idx);
                }
            }
        }

        let mut scheduled = vec![false; count];
        for &idx in &order {
            scheduled[idx] = true;
        }
        let unscheduled: Vec<usize> = (0..count).filter(|&idx| !scheduled[idx]).collect();

        (order, unscheduled)
    }
}
