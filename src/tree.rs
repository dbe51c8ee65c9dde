use std::collections::{HashMap, HashSet};

use crate::record::ReactionRecord;

/// Parent id → child ids, in record order. Only records with a parent
/// contribute edges; nothing here guarantees connectivity or acyclicity.
#[derive(Debug, Default)]
pub struct CascadeTree {
    children: HashMap<String, Vec<String>>,
}

impl CascadeTree {
    pub fn build(records: &[ReactionRecord]) -> Self {
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for r in records {
            if let Some(parent) = &r.parent_id {
                children
                    .entry(parent.clone())
                    .or_default()
                    .push(r.id.clone());
            }
        }
        Self { children }
    }

    pub fn children(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Longest path, in edges, from `root` down to a leaf.
    ///
    /// Iterative post-order walk. A node is expanded at most once per call;
    /// reaching a node again (cycle or shared child still in progress) is a
    /// cut that adds the edge but no further depth.
    pub fn depth(&self, root: &str) -> usize {
        enum Step<'a> {
            Enter(&'a str),
            Exit(&'a str),
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut depth_of: HashMap<&str, usize> = HashMap::new();
        let mut stack = vec![Step::Enter(root)];

        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(node) => {
                    if !visited.insert(node) {
                        continue;
                    }
                    stack.push(Step::Exit(node));
                    for child in self.children(node) {
                        stack.push(Step::Enter(child.as_str()));
                    }
                }
                Step::Exit(node) => {
                    let d = self
                        .children(node)
                        .iter()
                        .map(|c| 1 + depth_of.get(c.as_str()).copied().unwrap_or(0))
                        .max()
                        .unwrap_or(0);
                    depth_of.insert(node, d);
                }
            }
        }

        depth_of.get(root).copied().unwrap_or(0)
    }

    /// Largest child list anywhere in the mapping, reachable from the root
    /// or not; 0 when there are no edges.
    pub fn width(&self) -> usize {
        self.children.values().map(Vec::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn rec(id: &str, parent: Option<&str>) -> ReactionRecord {
        ReactionRecord {
            id: id.to_string(),
            parent_id: parent.map(str::to_string),
            timestamp: DateTime::from_timestamp(0, 0).unwrap().fixed_offset(),
            text: String::new(),
        }
    }

    #[test]
    fn test_empty_tree() {
        let t = CascadeTree::build(&[]);
        assert_eq!(t.depth("R"), 0);
        assert_eq!(t.width(), 0);
    }

    #[test]
    fn test_null_parents_add_no_edges() {
        let t = CascadeTree::build(&[rec("a", None), rec("b", None)]);
        assert!(t.children("R").is_empty());
        assert_eq!(t.depth("R"), 0);
        assert_eq!(t.width(), 0);
    }

    #[test]
    fn test_chain_depth_and_width() {
        // R → n1 → n2 → … → n5
        let mut records = vec![rec("n1", Some("R"))];
        for i in 2..=5 {
            records.push(rec(&format!("n{i}"), Some(&format!("n{}", i - 1))));
        }
        let t = CascadeTree::build(&records);
        assert_eq!(t.depth("R"), 5);
        assert_eq!(t.depth("n1"), 4);
        assert_eq!(t.width(), 1);
    }

    #[test]
    fn test_star() {
        let records: Vec<_> = (0..7).map(|i| rec(&format!("c{i}"), Some("P"))).collect();
        let t = CascadeTree::build(&records);
        assert_eq!(t.depth("P"), 1);
        assert_eq!(t.width(), 7);
        assert_eq!(t.children("P").len(), 7);
    }

    #[test]
    fn test_children_keep_record_order() {
        let t = CascadeTree::build(&[rec("b", Some("R")), rec("a", Some("R"))]);
        assert_eq!(t.children("R"), ["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_unknown_root_has_depth_zero() {
        let t = CascadeTree::build(&[rec("a", Some("R"))]);
        assert_eq!(t.depth("not-there"), 0);
    }

    #[test]
    fn test_depth_takes_longest_branch() {
        let t = CascadeTree::build(&[
            rec("a", Some("R")),
            rec("b", Some("R")),
            rec("b1", Some("b")),
            rec("b2", Some("b1")),
            rec("a1", Some("a")),
        ]);
        assert_eq!(t.depth("R"), 3);
    }

    #[test]
    fn test_cycle_terminates() {
        let t = CascadeTree::build(&[rec("A", Some("B")), rec("B", Some("A"))]);
        // exact value is unspecified on cyclic input; termination is what matters
        let d = t.depth("A");
        assert!(d <= 2);
        assert_eq!(t.width(), 1);
    }

    #[test]
    fn test_self_loop_terminates() {
        let t = CascadeTree::build(&[rec("A", Some("A")), rec("x", Some("A"))]);
        assert!(t.depth("A") <= 2);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let mut records = vec![rec("0", Some("R"))];
        for i in 1..100_000 {
            records.push(rec(&i.to_string(), Some(&(i - 1).to_string())));
        }
        let t = CascadeTree::build(&records);
        assert_eq!(t.depth("R"), 100_000);
    }

    #[test]
    fn test_width_counts_orphan_subtrees() {
        // "ghost" never appears as a record id, yet its 3 children
        // are the widest sibling group in the thread.
        let t = CascadeTree::build(&[
            rec("a", Some("R")),
            rec("x", Some("ghost")),
            rec("y", Some("ghost")),
            rec("z", Some("ghost")),
        ]);
        assert_eq!(t.width(), 3);
        assert_eq!(t.depth("R"), 1);
    }
}
