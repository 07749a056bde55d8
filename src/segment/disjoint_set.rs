//! Disjoint-set forest over provisional component labels.

/// Union-find structure for label equivalences.
///
/// Labels are dense `u32` values starting at 1; label 0 is reserved for
/// background and is never a member. A label is a root when it is its own
/// parent. `union` always makes the smaller root the representative, so the
/// root of a class is its smallest label.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<u32>,
}

impl Default for DisjointSet {
    fn default() -> Self {
        Self::new()
    }
}

impl DisjointSet {
    pub fn new() -> Self {
        Self { parent: vec![0] }
    }

    /// Number of labels issued so far.
    pub fn len(&self) -> usize {
        self.parent.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Issue a fresh label in its own singleton class.
    pub fn make_set(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    /// Root of `label`, compressing the visited path onto it.
    ///
    /// # Panics
    ///
    /// Panics if `label` was never issued by [`DisjointSet::make_set`].
    pub fn find(&mut self, label: u32) -> u32 {
        let mut root = label;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        let mut node = label;
        while node != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }

        root
    }

    /// Merge the classes of `a` and `b`, returning the surviving root.
    pub fn union(&mut self, a: u32, b: u32) -> u32 {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return root_a;
        }
        let (small, large) = if root_a < root_b {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        self.parent[large as usize] = small;
        small
    }

    /// True when `a` and `b` are in the same class.
    pub fn same_set(&mut self, a: u32, b: u32) -> bool {
        self.find(a) == self.find(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_set_is_monotonic() {
        let mut sets = DisjointSet::new();
        assert!(sets.is_empty());
        assert_eq!(sets.make_set(), 1);
        assert_eq!(sets.make_set(), 2);
        assert_eq!(sets.make_set(), 3);
        assert_eq!(sets.len(), 3);
    }

    #[test]
    fn test_singletons_are_roots() {
        let mut sets = DisjointSet::new();
        let a = sets.make_set();
        let b = sets.make_set();
        assert_eq!(sets.find(a), a);
        assert_eq!(sets.find(b), b);
        assert!(!sets.same_set(a, b));
    }

    #[test]
    fn test_union_keeps_smaller_root() {
        let mut sets = DisjointSet::new();
        for _ in 0..4 {
            sets.make_set();
        }
        assert_eq!(sets.union(4, 2), 2);
        assert_eq!(sets.union(3, 4), 2);
        assert_eq!(sets.find(3), 2);
        assert_eq!(sets.union(1, 3), 1);
        for label in 1..=4 {
            assert_eq!(sets.find(label), 1);
        }
    }

    #[test]
    fn test_union_same_class_is_noop() {
        let mut sets = DisjointSet::new();
        let a = sets.make_set();
        let b = sets.make_set();
        sets.union(a, b);
        assert_eq!(sets.union(b, a), a);
        assert_eq!(sets.len(), 2);
    }

    #[test]
    fn test_find_compresses_long_chain() {
        let mut sets = DisjointSet::new();
        for _ in 0..1000 {
            sets.make_set();
        }
        // Build a chain 1000 -> 999 -> ... -> 1 by linking neighbours
        for label in (2..=1000).rev() {
            sets.union(label, label - 1);
        }
        assert_eq!(sets.find(1000), 1);
        // After compression every node points straight at the root
        assert!(sets.parent[2..].iter().all(|&p| p == 1));
    }
}
