//! Category hierarchy
//!
//! Turns the flat `categories` table into a forest. Categories are loaded
//! into an arena (a `Vec` of slots plus an id → slot index) and linked in a
//! single linear pass: a node goes under its parent when the parent id is
//! in the arena, otherwise it becomes a root. Building never traverses, so
//! it terminates even on corrupt data.
//!
//! Every walk over the arena (descendants, materialization, outline) uses an
//! explicit stack or queue and a visited set, bounded by the number of
//! categories rather than by the depth of the tree.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::warn;

use crate::models::{Category, CategoryNode, OutlineEntry, OutlineItem, Product};

struct Slot {
    category: Category,
    children: Vec<usize>,
}

/// Categories indexed by id with their child links resolved
pub struct CategoryArena {
    slots: Vec<Slot>,
    index: HashMap<i64, usize>,
    roots: Vec<usize>,
}

impl CategoryArena {
    /// Link categories into a forest; children keep input order
    pub fn build(categories: Vec<Category>) -> Self {
        let mut slots = Vec::with_capacity(categories.len());
        let mut index = HashMap::with_capacity(categories.len());

        for category in categories {
            if index.contains_key(&category.id) {
                warn!(id = category.id, "Duplicate category id ignored");
                continue;
            }
            index.insert(category.id, slots.len());
            slots.push(Slot {
                category,
                children: Vec::new(),
            });
        }

        let mut roots = Vec::new();
        for slot in 0..slots.len() {
            let parent = slots[slot]
                .category
                .parent_id
                .and_then(|pid| index.get(&pid).copied());
            match parent {
                Some(parent) => slots[parent].children.push(slot),
                None => roots.push(slot),
            }
        }

        Self {
            slots,
            index,
            roots,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Check if a category id is present
    pub fn contains(&self, id: i64) -> bool {
        self.index.contains_key(&id)
    }

    /// Look up a category by id
    pub fn get(&self, id: i64) -> Option<&Category> {
        self.index.get(&id).map(|&slot| &self.slots[slot].category)
    }

    /// Categories with no parent or a dangling one
    pub fn roots(&self) -> impl Iterator<Item = &Category> {
        self.roots.iter().map(|&slot| &self.slots[slot].category)
    }

    /// Direct children of a category (empty for unknown ids)
    pub fn children(&self, id: i64) -> Vec<&Category> {
        match self.index.get(&id) {
            Some(&slot) => self.slots[slot]
                .children
                .iter()
                .map(|&child| &self.slots[child].category)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Every category reachable through child links, excluding `id` itself
    ///
    /// Depth-first with an explicit stack.
    pub fn descendants(&self, id: i64) -> Vec<i64> {
        let Some(&start) = self.index.get(&id) else {
            return Vec::new();
        };

        let mut visited = vec![false; self.slots.len()];
        visited[start] = true;
        let mut stack: Vec<usize> = self.slots[start].children.iter().rev().copied().collect();
        let mut found = Vec::new();

        while let Some(slot) = stack.pop() {
            if visited[slot] {
                continue;
            }
            visited[slot] = true;
            found.push(self.slots[slot].category.id);
            stack.extend(self.slots[slot].children.iter().rev().copied());
        }

        found
    }

    /// Check if `candidate` lies somewhere below `ancestor`
    pub fn is_descendant(&self, ancestor: i64, candidate: i64) -> bool {
        let (Some(&start), Some(&target)) = (self.index.get(&ancestor), self.index.get(&candidate))
        else {
            return false;
        };

        let mut visited = vec![false; self.slots.len()];
        visited[start] = true;
        let mut stack: Vec<usize> = self.slots[start].children.clone();

        while let Some(slot) = stack.pop() {
            if slot == target {
                return true;
            }
            if visited[slot] {
                continue;
            }
            visited[slot] = true;
            stack.extend(self.slots[slot].children.iter().copied());
        }

        false
    }

    /// Path from the topmost ancestor down to `id` (inclusive)
    ///
    /// Stops early if the parent chain loops back on itself.
    pub fn path_to(&self, id: i64) -> Vec<&Category> {
        let mut path = Vec::new();
        let mut visited = vec![false; self.slots.len()];
        let mut current = self.index.get(&id).copied();

        while let Some(slot) = current {
            if visited[slot] {
                break;
            }
            visited[slot] = true;
            let category = &self.slots[slot].category;
            path.push(category);
            current = category
                .parent_id
                .and_then(|pid| self.index.get(&pid).copied());
        }

        path.reverse();
        path
    }

    /// Materialize the forest of owned nodes
    ///
    /// Built bottom-up over breadth-first order, so no recursion is needed.
    /// Categories that only reach each other through a parent cycle hang off
    /// no root; they are left out and logged.
    pub fn into_forest(self) -> Vec<CategoryNode> {
        let mut order = Vec::with_capacity(self.slots.len());
        let mut queue: VecDeque<usize> = self.roots.iter().copied().collect();
        while let Some(slot) = queue.pop_front() {
            order.push(slot);
            queue.extend(self.slots[slot].children.iter().copied());
        }

        if order.len() < self.slots.len() {
            let mut reached = vec![false; self.slots.len()];
            for &slot in &order {
                reached[slot] = true;
            }
            let detached: Vec<i64> = (0..self.slots.len())
                .filter(|&slot| !reached[slot])
                .map(|slot| self.slots[slot].category.id)
                .collect();
            warn!(?detached, "Categories in a parent cycle left out of the tree");
        }

        let mut built: Vec<Option<CategoryNode>> = Vec::new();
        built.resize_with(self.slots.len(), || None);

        for &slot in order.iter().rev() {
            let mut node = CategoryNode::leaf(&self.slots[slot].category);
            node.children = self.slots[slot]
                .children
                .iter()
                .filter_map(|&child| built[child].take())
                .collect();
            built[slot] = Some(node);
        }

        self.roots
            .iter()
            .filter_map(|&slot| built[slot].take())
            .collect()
    }
}

/// Build the category forest from flat rows
pub fn build_tree(categories: Vec<Category>) -> Vec<CategoryNode> {
    CategoryArena::build(categories).into_forest()
}

/// Flatten the forest into display lines with products interleaved
///
/// Pre-order: each category is followed by its own products (one level
/// deeper), then by its subcategories. Products whose category is unset or
/// not in the forest are listed last under an `Uncategorized` heading.
pub fn catalog_outline(forest: &[CategoryNode], products: &[Product]) -> Vec<OutlineEntry> {
    let mut by_category: HashMap<i64, Vec<&Product>> = HashMap::new();
    for product in products {
        if let Some(category_id) = product.category_id {
            by_category.entry(category_id).or_default().push(product);
        }
    }

    let mut lines = Vec::new();
    let mut placed: HashSet<i64> = HashSet::new();
    let mut stack: Vec<(&CategoryNode, usize)> = forest.iter().rev().map(|n| (n, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        lines.push(OutlineEntry {
            depth,
            item: OutlineItem::Category {
                id: node.id,
                name: node.name.clone(),
            },
        });

        if let Some(items) = by_category.get(&node.id) {
            placed.insert(node.id);
            lines.extend(items.iter().map(|p| product_line(p, depth + 1)));
        }

        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }

    let loose: Vec<&Product> = products
        .iter()
        .filter(|p| match p.category_id {
            Some(category_id) => !placed.contains(&category_id),
            None => true,
        })
        .collect();

    if !loose.is_empty() {
        lines.push(OutlineEntry {
            depth: 0,
            item: OutlineItem::Uncategorized,
        });
        lines.extend(loose.into_iter().map(|p| product_line(p, 1)));
    }

    lines
}

fn product_line(product: &Product, depth: usize) -> OutlineEntry {
    OutlineEntry {
        depth,
        item: OutlineItem::Product {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: i64, name: &str, parent_id: Option<i64>) -> Category {
        Category::new(id, name, parent_id)
    }

    fn product(id: i64, name: &str, category_id: Option<i64>) -> Product {
        Product {
            id,
            name: name.to_string(),
            price: 1.0,
            category_id,
        }
    }

    #[test]
    fn test_chain_builds_single_branch() {
        let forest = build_tree(vec![
            cat(1, "A", None),
            cat(2, "B", Some(1)),
            cat(3, "C", Some(2)),
        ]);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, 1);
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].id, 2);
        assert_eq!(forest[0].children[0].children.len(), 1);
        assert_eq!(forest[0].children[0].children[0].id, 3);
        assert!(forest[0].children[0].children[0].children.is_empty());
    }

    #[test]
    fn test_dangling_parent_becomes_root() {
        let forest = build_tree(vec![cat(1, "A", None), cat(2, "B", Some(99))]);

        let root_ids: Vec<i64> = forest.iter().map(|n| n.id).collect();
        assert_eq!(root_ids, vec![1, 2]);
        assert_eq!(forest[1].parent_id, Some(99));
    }

    #[test]
    fn test_child_listed_before_parent() {
        let forest = build_tree(vec![cat(5, "Child", Some(9)), cat(9, "Parent", None)]);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, 9);
        assert_eq!(forest[0].children[0].id, 5);
    }

    #[test]
    fn test_children_keep_input_order() {
        let forest = build_tree(vec![
            cat(1, "Root", None),
            cat(4, "Z", Some(1)),
            cat(2, "X", Some(1)),
            cat(3, "Y", Some(1)),
        ]);

        let ids: Vec<i64> = forest[0].children.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![4, 2, 3]);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree(Vec::new()).is_empty());
        assert!(CategoryArena::build(Vec::new()).is_empty());
    }

    #[test]
    fn test_cycle_terminates_and_is_left_out() {
        let forest = build_tree(vec![
            cat(1, "Root", None),
            cat(2, "A", Some(3)),
            cat(3, "B", Some(2)),
        ]);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, 1);
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let depth = 10_000;
        let mut categories = vec![cat(1, "c1", None)];
        for id in 2..=depth {
            categories.push(cat(id, &format!("c{id}"), Some(id - 1)));
        }

        let arena = CategoryArena::build(categories);
        assert_eq!(arena.descendants(1).len(), (depth - 1) as usize);
        assert!(arena.is_descendant(1, depth));

        let forest = arena.into_forest();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].size(), depth as usize);

        // Dropping a deeply nested tree must not overflow either
        let mut stack = forest;
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }

    #[test]
    fn test_descendants() {
        let arena = CategoryArena::build(vec![
            cat(1, "A", None),
            cat(2, "B", Some(1)),
            cat(3, "C", Some(2)),
            cat(4, "D", Some(1)),
            cat(5, "E", None),
        ]);

        let mut below_a = arena.descendants(1);
        below_a.sort();
        assert_eq!(below_a, vec![2, 3, 4]);
        assert_eq!(arena.descendants(2), vec![3]);
        assert!(arena.descendants(5).is_empty());
        assert!(arena.descendants(42).is_empty());
    }

    #[test]
    fn test_is_descendant() {
        let arena = CategoryArena::build(vec![
            cat(1, "A", None),
            cat(2, "B", Some(1)),
            cat(3, "C", Some(2)),
            cat(4, "D", None),
        ]);

        assert!(arena.is_descendant(1, 2));
        assert!(arena.is_descendant(1, 3));
        assert!(!arena.is_descendant(3, 1));
        assert!(!arena.is_descendant(1, 1));
        assert!(!arena.is_descendant(1, 4));
        assert!(!arena.is_descendant(1, 99));
    }

    #[test]
    fn test_is_descendant_on_corrupt_cycle() {
        let arena = CategoryArena::build(vec![cat(1, "A", Some(2)), cat(2, "B", Some(1))]);

        assert!(arena.is_descendant(1, 2));
        assert!(arena.is_descendant(2, 1));
        // A node inside a loop reaches itself
        assert!(arena.is_descendant(1, 1));
        assert_eq!(arena.descendants(1), vec![2]);
    }

    #[test]
    fn test_path_to() {
        let arena = CategoryArena::build(vec![
            cat(1, "Tools", None),
            cat(2, "Power", Some(1)),
            cat(3, "Drills", Some(2)),
        ]);

        let names: Vec<&str> = arena.path_to(3).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Tools", "Power", "Drills"]);
        assert!(arena.path_to(99).is_empty());
    }

    #[test]
    fn test_children_and_roots() {
        let arena = CategoryArena::build(vec![
            cat(1, "A", None),
            cat(2, "B", Some(1)),
            cat(3, "C", Some(7)),
        ]);

        let roots: Vec<i64> = arena.roots().map(|c| c.id).collect();
        assert_eq!(roots, vec![1, 3]);
        assert_eq!(arena.children(1).len(), 1);
        assert!(arena.children(2).is_empty());
        assert_eq!(arena.get(2).unwrap().name, "B");
        assert!(arena.contains(3));
        assert!(!arena.contains(7));
    }

    #[test]
    fn test_outline_interleaves_products_before_subcategories() {
        let forest = build_tree(vec![
            cat(1, "Tools", None),
            cat(2, "Drills", Some(1)),
            cat(3, "Garden", None),
        ]);
        let products = vec![
            product(10, "Hammer", Some(1)),
            product(11, "Cordless drill", Some(2)),
            product(12, "Screwdriver", Some(1)),
        ];

        let outline = catalog_outline(&forest, &products);
        let rendered: Vec<(usize, String)> = outline
            .iter()
            .map(|e| {
                let label = match &e.item {
                    OutlineItem::Category { name, .. } => format!("C:{name}"),
                    OutlineItem::Product { name, .. } => format!("P:{name}"),
                    OutlineItem::Uncategorized => "U".to_string(),
                };
                (e.depth, label)
            })
            .collect();

        assert_eq!(
            rendered,
            vec![
                (0, "C:Tools".to_string()),
                (1, "P:Hammer".to_string()),
                (1, "P:Screwdriver".to_string()),
                (1, "C:Drills".to_string()),
                (2, "P:Cordless drill".to_string()),
                (0, "C:Garden".to_string()),
            ]
        );
    }

    #[test]
    fn test_outline_collects_uncategorized() {
        let forest = build_tree(vec![cat(1, "Tools", None)]);
        let products = vec![
            product(10, "Loose", None),
            product(11, "Orphan", Some(42)),
            product(12, "Hammer", Some(1)),
        ];

        let outline = catalog_outline(&forest, &products);

        let heading = outline
            .iter()
            .position(|e| e.item == OutlineItem::Uncategorized)
            .unwrap();
        assert_eq!(outline[heading].depth, 0);
        assert_eq!(outline.len(), heading + 3);
        assert!(matches!(
            &outline[heading + 1].item,
            OutlineItem::Product { name, .. } if name == "Loose"
        ));
        assert!(matches!(
            &outline[heading + 2].item,
            OutlineItem::Product { name, .. } if name == "Orphan"
        ));
    }

    #[test]
    fn test_outline_without_products() {
        let forest = build_tree(vec![cat(1, "A", None), cat(2, "B", Some(1))]);
        let outline = catalog_outline(&forest, &[]);
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[1].depth, 1);
    }
}
