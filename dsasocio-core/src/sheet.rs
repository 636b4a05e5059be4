//! Checklist progress and shared-sheet trees

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::{Difficulty, DsaProblem, ItemType, SharedItem, SharedProblem};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub solved: usize,
    pub total: usize,
}

impl Tally {
    /// Solved share as a whole percentage, rounded half up; 0 when empty.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.solved * 100 + self.total / 2) / self.total) as u32
    }
}

/// Solved counts for a checklist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub overall: Tally,
    pub by_difficulty: BTreeMap<Difficulty, Tally>,
}

impl Progress {
    pub fn of(problems: &[DsaProblem]) -> Self {
        let mut progress = Self::default();
        for p in problems {
            let bucket = progress.by_difficulty.entry(p.difficulty).or_default();
            bucket.total += 1;
            progress.overall.total += 1;
            if p.solved {
                bucket.solved += 1;
                progress.overall.solved += 1;
            }
        }
        progress
    }

    pub fn percent(&self) -> u32 {
        self.overall.percent()
    }
}

/// Flip the solved flag of one problem. Returns whether it was found.
pub fn toggle_solved(problems: &mut [DsaProblem], id: &str) -> bool {
    match problems.iter_mut().find(|p| p.id == id) {
        Some(p) => {
            p.solved = !p.solved;
            true
        }
        None => false,
    }
}

/// One folder or problem in a shared sheet, with its children
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetNode {
    #[serde(flatten)]
    pub item: SharedItem,
    pub problem: Option<SharedProblem>,
    pub children: Vec<SheetNode>,
}

impl SheetNode {
    fn count_problems(&self) -> usize {
        let own = usize::from(self.item.item_type == ItemType::Problem);
        own + self.children.iter().map(SheetNode::count_problems).sum::<usize>()
    }

    fn find(&self, id: &str) -> Option<&SheetNode> {
        if self.item.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

/// Forest of root items for one shared sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SheetTree {
    pub roots: Vec<SheetNode>,
}

impl SheetTree {
    pub fn problem_count(&self) -> usize {
        self.roots.iter().map(SheetNode::count_problems).sum()
    }

    pub fn find(&self, id: &str) -> Option<&SheetNode> {
        self.roots.iter().find_map(|r| r.find(id))
    }
}

/// Assemble the flat `shared_dsa_items` rows into a tree.
///
/// Roots keep their input order; children are sorted by name,
/// case-insensitively. Items whose parent is missing are dropped, and so
/// is anything only reachable through them.
pub fn build_tree(items: Vec<SharedItem>, problems: Vec<SharedProblem>) -> SheetTree {
    let mut problems: HashMap<String, SharedProblem> = problems
        .into_iter()
        .map(|p| (p.item_id.clone(), p))
        .collect();

    let mut roots = Vec::new();
    let mut children: HashMap<String, Vec<SharedItem>> = HashMap::new();
    for item in items {
        match item.parent_id.clone() {
            None => roots.push(item),
            Some(parent) => children.entry(parent).or_default().push(item),
        }
    }

    let roots: Vec<SheetNode> = roots
        .into_iter()
        .map(|item| attach(item, &mut children, &mut problems))
        .collect();

    if !children.is_empty() {
        let orphans: usize = children.values().map(Vec::len).sum();
        tracing::debug!(orphans, "dropped shared items with missing parents");
    }

    SheetTree { roots }
}

fn attach(
    item: SharedItem,
    children: &mut HashMap<String, Vec<SharedItem>>,
    problems: &mut HashMap<String, SharedProblem>,
) -> SheetNode {
    let mut kids = children.remove(&item.id).unwrap_or_default();
    kids.sort_by_key(|k| k.name.to_lowercase());

    let problem = problems.remove(&item.id);
    let children = kids
        .into_iter()
        .map(|k| attach(k, children, problems))
        .collect();

    SheetNode {
        item,
        problem,
        children,
    }
}
