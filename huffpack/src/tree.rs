//! Huffman merge tree construction.
//!
//! The tree is built with two FIFO queues instead of a priority heap:
//!
//! - `source` holds one leaf per frequency record, already sorted ascending
//! - `target` receives merged internal nodes, which arrive in non-decreasing
//!   probability order because each merge combines the two lightest nodes
//!
//! With both queues monotonic, the two lightest nodes are always at the
//! queue heads, so construction is linear in the number of symbols. Ties
//! between the heads prefer `source`.
//!
//! Nodes are stored in an arena and addressed by [`NodeId`]. The tree is
//! never mutated after [`HuffmanTree::build`] returns.

use crate::frequency::{FrequencyRecord, Symbol};
use huffpack_core::error::{HuffpackError, Result};
use std::collections::VecDeque;
use tracing::debug;

/// Index of a node in a [`HuffmanTree`].
pub type NodeId = usize;

/// A node of the merge tree.
///
/// A node has either two children or none; leaves carry a symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Symbol and probability.
    pub record: FrequencyRecord,
    /// `(left, right)` children of an internal node.
    pub children: Option<(NodeId, NodeId)>,
}

impl TreeNode {
    /// Whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Symbol of a leaf node.
    pub fn symbol(&self) -> Option<Symbol> {
        self.record.symbol
    }

    /// Probability of this node.
    pub fn probability(&self) -> f64 {
        self.record.probability
    }
}

/// An immutable binary prefix-code tree.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    /// Node arena; leaves come first, in frequency-record order.
    nodes: Vec<TreeNode>,
    /// Root node.
    root: NodeId,
}

impl HuffmanTree {
    /// Build a tree from frequency records sorted by ascending probability.
    ///
    /// At least two records are required.
    pub fn build(records: &[FrequencyRecord]) -> Result<Self> {
        if records.len() < 2 {
            return Err(HuffpackError::too_few_symbols(records.len()));
        }

        // Every merge adds one node: n leaves -> 2n - 1 nodes
        let mut nodes: Vec<TreeNode> = Vec::with_capacity(records.len() * 2 - 1);
        let mut source: VecDeque<NodeId> = VecDeque::with_capacity(records.len());
        let mut target: VecDeque<NodeId> = VecDeque::with_capacity(records.len());

        for record in records {
            source.push_back(nodes.len());
            nodes.push(TreeNode {
                record: *record,
                children: None,
            });
        }

        // Seed: merge the two lightest leaves
        let (Some(first), Some(second)) = (source.pop_front(), source.pop_front()) else {
            return Err(HuffpackError::too_few_symbols(records.len()));
        };
        let mut root = Self::merge(&mut nodes, first, second);
        target.push_back(root);

        while let Some(left) = Self::take_lightest(&nodes, &mut source, &mut target) {
            // A lone remaining node is the last merge
            let Some(right) = Self::take_lightest(&nodes, &mut source, &mut target) else {
                root = left;
                break;
            };

            root = Self::merge(&mut nodes, left, right);
            target.push_back(root);
        }

        let tree = Self { nodes, root };
        debug!(
            leaves = tree.leaf_count(),
            nodes = tree.nodes.len(),
            depth = tree.depth(),
            "built merge tree"
        );
        Ok(tree)
    }

    /// Dequeue the lighter of the two queue heads, preferring `source` on ties.
    fn take_lightest(
        nodes: &[TreeNode],
        source: &mut VecDeque<NodeId>,
        target: &mut VecDeque<NodeId>,
    ) -> Option<NodeId> {
        match (source.front(), target.front()) {
            (Some(&s), Some(&t)) => {
                if nodes[s].probability() <= nodes[t].probability() {
                    source.pop_front()
                } else {
                    target.pop_front()
                }
            }
            (Some(_), None) => source.pop_front(),
            (None, Some(_)) => target.pop_front(),
            (None, None) => None,
        }
    }

    /// Push an internal node joining `left` and `right`.
    fn merge(nodes: &mut Vec<TreeNode>, left: NodeId, right: NodeId) -> NodeId {
        let probability = nodes[left].probability() + nodes[right].probability();
        let id = nodes.len();
        nodes.push(TreeNode {
            record: FrequencyRecord::internal(probability),
            children: Some((left, right)),
        });
        id
    }

    /// Root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Root node.
    pub fn root_node(&self) -> &TreeNode {
        &self.nodes[self.root]
    }

    /// Node by id.
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a built tree has at least three nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Leaf symbols in depth-first, left-to-right order.
    pub fn leaves(&self) -> Vec<Symbol> {
        let mut symbols = Vec::with_capacity(self.leaf_count());
        let mut stack = vec![self.root];

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            match node.children {
                Some((left, right)) => {
                    // Right first so that left is visited first
                    stack.push(right);
                    stack.push(left);
                }
                None => symbols.extend(node.symbol()),
            }
        }
        symbols
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0usize)];

        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id].children {
                Some((left, right)) => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
                None => max_depth = max_depth.max(depth),
            }
        }
        max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;

    fn tree_for(source: &[u8]) -> HuffmanTree {
        let table = FrequencyTable::analyze(source).unwrap();
        HuffmanTree::build(table.records()).unwrap()
    }

    #[test]
    fn test_two_leaves() {
        let tree = tree_for(b"aaab");
        let root = tree.root_node();
        let (left, right) = root.children.unwrap();

        assert_eq!(tree.node(left).symbol(), Some(b'b'));
        assert_eq!(tree.node(right).symbol(), Some(b'a'));
        assert_eq!(root.probability(), 1.0);
        assert_eq!(root.symbol(), None);
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_internal_probability_is_sum() {
        let tree = tree_for(b"abracadabra alakazam");
        for id in 0..tree.len() {
            let node = tree.node(id);
            if let Some((left, right)) = node.children {
                let sum = tree.node(left).probability() + tree.node(right).probability();
                assert!((node.probability() - sum).abs() < 1e-12);
                assert!(node.symbol().is_none());
            } else {
                assert!(node.symbol().is_some());
            }
        }
        assert!((tree.root_node().probability() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tie_prefers_source() {
        // a, b, c, d all 0.25: seed merges (a, b) = 0.5; then the source head
        // c (0.25) beats target (0.5), then d (0.25) beats target again.
        let tree = tree_for(b"abcd");
        let (left, right) = tree.root_node().children.unwrap();
        let (ll, lr) = tree.node(left).children.unwrap();
        let (rl, rr) = tree.node(right).children.unwrap();

        assert_eq!(tree.node(ll).symbol(), Some(b'a'));
        assert_eq!(tree.node(lr).symbol(), Some(b'b'));
        assert_eq!(tree.node(rl).symbol(), Some(b'c'));
        assert_eq!(tree.node(rr).symbol(), Some(b'd'));
    }

    #[test]
    fn test_skewed_frequencies_make_a_chain() {
        // 1, 2, 4, 8, 16 occurrences: every merge joins the newest internal node
        let mut source = Vec::new();
        for (i, symbol) in b"abcde".iter().enumerate() {
            source.extend(std::iter::repeat_n(*symbol, 1 << i));
        }
        let tree = tree_for(&source);
        assert_eq!(tree.leaf_count(), 5);
        assert_eq!(tree.depth(), 4);
        assert_eq!(tree.len(), 9);
    }

    #[test]
    fn test_root_is_last_merge() {
        let samples: [&[u8]; 4] = [b"ab", b"aaab", b"abcd", b"mississippi river"];
        for source in samples {
            let tree = tree_for(source);
            assert_eq!(tree.root(), tree.len() - 1);
            assert_eq!(tree.len(), tree.leaf_count() * 2 - 1);
            assert!(!tree.root_node().is_leaf());
            assert!(!tree.root_node().record.is_leaf());
        }
    }

    #[test]
    fn test_single_symbol_has_two_leaves() {
        let tree = tree_for(b"zzzz");
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.leaves(), vec![b'{', b'z']);
    }

    #[test]
    fn test_leaves_cover_alphabet() {
        let source: Vec<u8> = (0..128).collect();
        let tree = tree_for(&source);
        let mut leaves = tree.leaves();
        leaves.sort_unstable();
        assert_eq!(leaves, source);
        assert_eq!(tree.depth(), 7);
    }

    #[test]
    fn test_too_few_records() {
        let records = [FrequencyRecord::leaf(b'a', 1.0)];
        assert!(matches!(
            HuffmanTree::build(&records),
            Err(HuffpackError::TooFewSymbols { found: 1 })
        ));
    }
}
