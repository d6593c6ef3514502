use super::TaxonomyError;
use super::node::{ROOT_ID, TaxId, TaxonomyNode};
use std::collections::HashMap;

const UNVISITED: u32 = u32::MAX;
const ON_PATH: u32 = u32::MAX - 1;

/// An immutable NCBI taxonomy forest rooted at taxon 1.
///
/// Nodes are kept in ascending id order with parent links resolved to slot
/// indices, so every upward walk is a chain of array hops and is bounded by
/// [`max_depth`](Self::max_depth). A tree only exists once it has been linked
/// and validated; see [`build`](Self::build) and
/// [`deserialize`](Self::deserialize) for the two ways to obtain one.
#[derive(Debug, Clone)]
pub struct TaxonomyTree {
    nodes: Vec<TaxonomyNode>,
    parents: Vec<u32>,
    depths: Vec<u32>,
    slots: HashMap<TaxId, u32>,
    root: u32,
    max_depth: u32,
}

impl TaxonomyTree {
    /// Links a flat node list into a tree, rejecting anything that is not a
    /// single acyclic forest under [`ROOT_ID`].
    pub(crate) fn from_nodes(mut nodes: Vec<TaxonomyNode>) -> Result<Self, TaxonomyError> {
        nodes.sort_unstable_by_key(|node| node.id);

        if let Some(pair) = nodes.windows(2).find(|p| p[0].id == p[1].id) {
            return Err(TaxonomyError::DuplicateTaxon(pair[0].id));
        }
        if nodes.first().is_some_and(|node| node.id == 0) {
            return Err(TaxonomyError::ZeroTaxId);
        }
        if u32::try_from(nodes.len()).map_or(true, |n| n >= ON_PATH) {
            return Err(TaxonomyError::TooManyNodes(nodes.len()));
        }

        let slots: HashMap<TaxId, u32> = nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| (node.id, slot as u32))
            .collect();

        let root = *slots.get(&ROOT_ID).ok_or(TaxonomyError::MissingRoot)?;
        let root_parent = nodes[root as usize].parent;
        if root_parent != ROOT_ID {
            return Err(TaxonomyError::RootHasParent(root_parent));
        }

        let parents = nodes
            .iter()
            .map(|node| {
                slots
                    .get(&node.parent)
                    .copied()
                    .ok_or(TaxonomyError::DanglingParent {
                        id: node.id,
                        parent: node.parent,
                    })
            })
            .collect::<Result<Vec<u32>, _>>()?;

        let depths = compute_depths(&nodes, &parents, root)?;
        let max_depth = depths.iter().copied().max().unwrap_or(0);

        Ok(Self {
            nodes,
            parents,
            depths,
            slots,
            root,
            max_depth,
        })
    }

    pub fn node_exists(&self, id: TaxId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn get_node(&self, id: TaxId) -> Option<&TaxonomyNode> {
        self.slot(id).map(|slot| &self.nodes[slot as usize])
    }

    /// The ancestry of `id`, root first and ending with `id` itself.
    ///
    /// Returns `None` for an id that is not in the tree; unknown ids are never
    /// traversed.
    pub fn lineage(&self, id: TaxId) -> Option<Vec<&TaxonomyNode>> {
        let slot = self.slot(id)?;
        let mut lineage = Vec::with_capacity(self.depths[slot as usize] as usize + 1);
        lineage.extend(self.walk_up(slot).map(|s| &self.nodes[s as usize]));
        lineage.reverse();
        Some(lineage)
    }

    /// Whether `candidate` lies on the path from `id` to the root, both ends
    /// included. Unknown ids are never ancestors of anything.
    pub fn is_ancestor(&self, id: TaxId, candidate: TaxId) -> bool {
        let (Some(slot), Some(candidate_slot)) = (self.slot(id), self.slot(candidate)) else {
            return false;
        };
        let depth = self.depths[slot as usize];
        let candidate_depth = self.depths[candidate_slot as usize];
        if candidate_depth > depth {
            return false;
        }
        self.lift(slot, depth - candidate_depth) == candidate_slot
    }

    /// Walks from `id` toward the root and collects up to `limit` nodes whose
    /// scientific name contains `text`, ignoring case.
    ///
    /// The root itself is never reported. Nodes are returned in walk order
    /// (most specific first) and each id appears at most once.
    pub fn ancestor_matches(&self, id: TaxId, text: &str, limit: usize) -> Vec<&TaxonomyNode> {
        let Some(slot) = self.slot(id) else {
            return Vec::new();
        };
        if limit == 0 {
            return Vec::new();
        }

        let needle = text.to_lowercase();
        let mut matches: Vec<&TaxonomyNode> = Vec::new();
        for s in self.walk_up(slot).take_while(|&s| s != self.root) {
            let node = &self.nodes[s as usize];
            if node.name_contains_lowercase(&needle) && !matches.iter().any(|m| m.id == node.id) {
                matches.push(node);
                if matches.len() == limit {
                    break;
                }
            }
        }
        matches
    }

    /// The most specific taxon that is an ancestor of both `a` and `b`.
    pub fn lowest_common_ancestor(&self, a: TaxId, b: TaxId) -> Option<&TaxonomyNode> {
        let mut a = self.slot(a)?;
        let mut b = self.slot(b)?;
        let (depth_a, depth_b) = (self.depths[a as usize], self.depths[b as usize]);
        if depth_a > depth_b {
            a = self.lift(a, depth_a - depth_b);
        } else {
            b = self.lift(b, depth_b - depth_a);
        }
        while a != b {
            a = self.parents[a as usize];
            b = self.parents[b as usize];
        }
        Some(&self.nodes[a as usize])
    }

    /// Number of edges between `id` and the root.
    pub fn depth(&self, id: TaxId) -> Option<u32> {
        self.slot(id).map(|slot| self.depths[slot as usize])
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn root(&self) -> &TaxonomyNode {
        &self.nodes[self.root as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in ascending id order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TaxonomyNode> + '_ {
        self.nodes.iter()
    }

    fn slot(&self, id: TaxId) -> Option<u32> {
        self.slots.get(&id).copied()
    }

    fn lift(&self, mut slot: u32, steps: u32) -> u32 {
        for _ in 0..steps {
            slot = self.parents[slot as usize];
        }
        slot
    }

    /// Slots from `slot` up to and including the root.
    fn walk_up(&self, slot: u32) -> impl Iterator<Item = u32> + '_ {
        let mut next = Some(slot);
        std::iter::from_fn(move || {
            let current = next?;
            next = (current != self.root).then(|| self.parents[current as usize]);
            Some(current)
        })
    }
}

/// Depth of every slot, computed with an explicit stack so that deep chains
/// cannot overflow the call stack. A parent chain that revisits a slot still
/// being resolved is a cycle.
fn compute_depths(
    nodes: &[TaxonomyNode],
    parents: &[u32],
    root: u32,
) -> Result<Vec<u32>, TaxonomyError> {
    let mut depths = vec![UNVISITED; nodes.len()];
    depths[root as usize] = 0;
    let mut path: Vec<u32> = Vec::new();

    for start in 0..nodes.len() as u32 {
        if depths[start as usize] != UNVISITED {
            continue;
        }

        let mut current = start;
        while depths[current as usize] == UNVISITED {
            depths[current as usize] = ON_PATH;
            path.push(current);
            current = parents[current as usize];
        }
        if depths[current as usize] == ON_PATH {
            return Err(TaxonomyError::Cycle(nodes[current as usize].id));
        }

        let mut depth = depths[current as usize];
        while let Some(slot) = path.pop() {
            depth += 1;
            depths[slot as usize] = depth;
        }
    }
    Ok(depths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: TaxId, name: &str, parent: TaxId) -> TaxonomyNode {
        TaxonomyNode {
            id,
            parent,
            name: name.to_string(),
            rank: "no rank".to_string(),
        }
    }

    /// root ─ cellular organisms ─ Bacteria ─ Proteobacteria ─ Escherichia ─ E. coli
    ///                            └ Eukaryota ─ Homo sapiens
    fn sample_tree() -> TaxonomyTree {
        TaxonomyTree::from_nodes(vec![
            node(562, "Escherichia coli", 561),
            node(1, "root", 1),
            node(131567, "cellular organisms", 1),
            node(2, "Bacteria", 131567),
            node(1224, "Proteobacteria", 2),
            node(561, "Escherichia", 1224),
            node(2759, "Eukaryota", 131567),
            node(9606, "Homo sapiens", 2759),
        ])
        .unwrap()
    }

    fn ids(nodes: &[&TaxonomyNode]) -> Vec<TaxId> {
        nodes.iter().map(|n| n.id).collect()
    }

    mod link_tests {
        use super::*;

        #[test]
        fn minimal_three_node_tree_links() {
            let tree = TaxonomyTree::from_nodes(vec![
                node(1, "root", 1),
                node(2, "Bacteria", 1),
                node(3, "Escherichia coli", 2),
            ])
            .unwrap();
            assert_eq!(tree.len(), 3);
            assert_eq!(tree.max_depth(), 2);
            assert_eq!(tree.root().id, ROOT_ID);
        }

        #[test]
        fn rejects_missing_root() {
            let err = TaxonomyTree::from_nodes(vec![node(2, "Bacteria", 2)]).unwrap_err();
            assert!(matches!(err, TaxonomyError::MissingRoot));
        }

        #[test]
        fn rejects_root_with_foreign_parent() {
            let err =
                TaxonomyTree::from_nodes(vec![node(1, "root", 2), node(2, "Bacteria", 1)])
                    .unwrap_err();
            assert!(matches!(err, TaxonomyError::RootHasParent(2)));
        }

        #[test]
        fn rejects_dangling_parent() {
            let err = TaxonomyTree::from_nodes(vec![node(1, "root", 1), node(3, "orphan", 99)])
                .unwrap_err();
            assert!(matches!(
                err,
                TaxonomyError::DanglingParent { id: 3, parent: 99 }
            ));
        }

        #[test]
        fn rejects_duplicate_ids() {
            let err = TaxonomyTree::from_nodes(vec![
                node(1, "root", 1),
                node(2, "Bacteria", 1),
                node(2, "Bacteria again", 1),
            ])
            .unwrap_err();
            assert!(matches!(err, TaxonomyError::DuplicateTaxon(2)));
        }

        #[test]
        fn rejects_cycles_detached_from_root() {
            let err = TaxonomyTree::from_nodes(vec![
                node(1, "root", 1),
                node(5, "a", 6),
                node(6, "b", 7),
                node(7, "c", 5),
            ])
            .unwrap_err();
            assert!(matches!(err, TaxonomyError::Cycle(_)));
        }

        #[test]
        fn rejects_self_parented_non_root() {
            let err = TaxonomyTree::from_nodes(vec![node(1, "root", 1), node(4, "loop", 4)])
                .unwrap_err();
            assert!(matches!(err, TaxonomyError::Cycle(4)));
        }

        #[test]
        fn deep_chain_does_not_recurse() {
            let mut nodes = vec![node(1, "root", 1)];
            for id in 2..200_000 {
                nodes.push(node(id, "step", id - 1));
            }
            let tree = TaxonomyTree::from_nodes(nodes).unwrap();
            assert_eq!(tree.max_depth(), 199_998);
            assert_eq!(tree.lineage(199_999).unwrap().len(), 199_999);
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn lineage_runs_from_root_to_node() {
            let tree = TaxonomyTree::from_nodes(vec![
                node(1, "root", 1),
                node(2, "Bacteria", 1),
                node(3, "Escherichia coli", 2),
            ])
            .unwrap();
            assert_eq!(ids(&tree.lineage(3).unwrap()), vec![1, 2, 3]);
            assert_eq!(ids(&tree.lineage(1).unwrap()), vec![1]);
            assert!(tree.lineage(99).is_none());
        }

        #[test]
        fn every_lineage_ends_at_root_within_max_depth() {
            let tree = sample_tree();
            for n in tree.iter() {
                let lineage = tree.lineage(n.id).unwrap();
                assert_eq!(lineage.first().unwrap().id, ROOT_ID);
                assert_eq!(lineage.last().unwrap().id, n.id);
                assert!(lineage.len() as u32 <= tree.max_depth() + 1);
            }
        }

        #[test]
        fn is_ancestor_matches_lineage_membership() {
            let tree = sample_tree();
            let all: Vec<TaxId> = tree.iter().map(|n| n.id).chain([99_999]).collect();
            for &id in &all {
                for &candidate in &all {
                    let expected = tree
                        .lineage(id)
                        .is_some_and(|l| l.iter().any(|n| n.id == candidate));
                    assert_eq!(
                        tree.is_ancestor(id, candidate),
                        expected,
                        "is_ancestor({}, {})",
                        id,
                        candidate
                    );
                }
            }
        }

        #[test]
        fn is_ancestor_includes_self_and_root() {
            let tree = sample_tree();
            assert!(tree.is_ancestor(562, 562));
            assert!(tree.is_ancestor(562, 1));
            assert!(tree.is_ancestor(562, 2));
            assert!(!tree.is_ancestor(562, 9606));
            assert!(!tree.is_ancestor(562, 99));
            assert!(!tree.is_ancestor(99, 1));
        }

        #[test]
        fn get_node_misses_unknown_ids() {
            let tree = sample_tree();
            assert!(tree.get_node(99_999).is_none());
            assert!(!tree.node_exists(99_999));
            assert_eq!(tree.get_node(561).unwrap().name, "Escherichia");
        }

        #[test]
        fn ancestor_matches_is_case_insensitive_and_skips_root() {
            let tree = TaxonomyTree::from_nodes(vec![
                node(1, "root", 1),
                node(2, "Bacteria", 1),
                node(3, "Escherichia coli", 2),
            ])
            .unwrap();
            assert_eq!(ids(&tree.ancestor_matches(3, "bact", 10)), vec![2]);
            assert!(tree.ancestor_matches(3, "ROOT", 10).is_empty());
        }

        #[test]
        fn ancestor_matches_respects_limit_and_walk_order() {
            let tree = sample_tree();
            let all = tree.ancestor_matches(562, "", 10);
            assert_eq!(ids(&all), vec![562, 561, 1224, 2, 131567]);

            let limited = tree.ancestor_matches(562, "e", 2);
            assert_eq!(ids(&limited), vec![562, 561]);
            assert!(limited.iter().all(|n| n.name.to_lowercase().contains('e')));

            assert!(tree.ancestor_matches(562, "e", 0).is_empty());
            assert!(tree.ancestor_matches(99_999, "e", 5).is_empty());
        }

        #[test]
        fn lowest_common_ancestor_meets_at_shared_clade() {
            let tree = sample_tree();
            assert_eq!(tree.lowest_common_ancestor(562, 9606).unwrap().id, 131567);
            assert_eq!(tree.lowest_common_ancestor(562, 561).unwrap().id, 561);
            assert_eq!(tree.lowest_common_ancestor(1, 9606).unwrap().id, 1);
            assert!(tree.lowest_common_ancestor(562, 99_999).is_none());
        }

        #[test]
        fn depth_counts_edges_to_root() {
            let tree = sample_tree();
            assert_eq!(tree.depth(1), Some(0));
            assert_eq!(tree.depth(562), Some(5));
            assert_eq!(tree.max_depth(), 5);
            assert_eq!(tree.depth(42), None);
        }
    }
}
