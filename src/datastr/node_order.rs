//! Elimination orders for node contraction.

use crate::datastr::graph::*;
use crate::util::permutation::is_permutation;

pub type Rank = NodeId;

/// A type for node orders which allows efficiently retrieving both the rank in the order of a node
/// and the node for a given rank. Mostly useful, because this type makes it always clear
/// in which direction the mapping goes.
#[derive(Debug, Clone)]
pub struct NodeOrder {
    // NodeIds ordered by their ranks - ascending in importance
    node_order: Vec<NodeId>,
    // The rank of each node - 0 is eliminated first, n-1 last
    ranks: Vec<Rank>,
}

impl NodeOrder {
    /// Create a `NodeOrder` where the id is equal to the rank.
    pub fn identity(n: usize) -> NodeOrder {
        NodeOrder {
            node_order: (0..n as NodeId).collect(),
            ranks: (0..n as NodeId).collect(),
        }
    }

    /// Create a `NodeOrder` from an order vector, that is a vector containing the node ids ordered by their rank.
    /// Panics if the vector is not a permutation of `0..n`.
    pub fn from_node_order(node_order: Vec<NodeId>) -> NodeOrder {
        assert!(is_permutation(&node_order), "node order must be a permutation");
        let n = node_order.len();
        let mut ranks = vec![n as Rank; n];

        for (rank, &node) in node_order.iter().enumerate() {
            ranks[node as usize] = rank as Rank;
        }

        NodeOrder { node_order, ranks }
    }

    /// Create a `NodeOrder` from a rank vector, that is a vector where `ranks[id]` contains the rank of node `id`.
    /// Panics if the vector is not a permutation of `0..n`.
    pub fn from_ranks(ranks: Vec<Rank>) -> NodeOrder {
        assert!(is_permutation(&ranks), "ranks must be a permutation");
        let n = ranks.len();
        let mut node_order = vec![n as NodeId; n];

        for (node, &rank) in ranks.iter().enumerate() {
            node_order[rank as usize] = node as NodeId;
        }

        NodeOrder { node_order, ranks }
    }

    /// Get node order (rank -> node) as a slice
    pub fn order(&self) -> &[NodeId] {
        &self.node_order
    }

    /// Get node ranks (node -> rank) as a slice
    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }

    /// Get rank for a given node
    pub fn rank(&self, node: NodeId) -> Rank {
        self.ranks[node as usize]
    }

    /// Get node for a given rank
    pub fn node(&self, rank: Rank) -> NodeId {
        self.node_order[rank as usize]
    }

    /// Number of nodes in the order
    pub fn len(&self) -> usize {
        self.node_order.len()
    }

    /// Are there no nodes in the order?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_and_ranks_are_mutual_inverses() {
        let order = NodeOrder::from_node_order(vec![3, 1, 0, 2]);
        for rank in 0..4 {
            assert_eq!(order.rank(order.node(rank)), rank);
        }
        for node in 0..4 {
            assert_eq!(order.node(order.rank(node)), node);
        }
        assert_eq!(NodeOrder::from_ranks(order.ranks().to_vec()).order(), order.order());
    }

    #[test]
    #[should_panic]
    fn test_rejects_non_permutations() {
        NodeOrder::from_node_order(vec![0, 0, 2]);
    }
}
