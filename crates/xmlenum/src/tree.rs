//! Aggregated tag tree
//!
//! A [`TagTree`] maps element names to what is known about their contents.
//! Trees only ever grow: a tag that has been seen with a child element stays
//! a [`TagNode::Branch`] no matter how many childless occurrences follow.

use std::collections::btree_map::{self, BTreeMap};

/// Children recorded beneath one tag position, keyed by element name
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagTree {
    tags: BTreeMap<String, TagNode>,
}

/// What is known about one tag at one position in the tree
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TagNode {
    /// Never observed with a child element
    #[default]
    Leaf,
    /// Observed with at least one child element in some occurrence
    Branch(TagTree),
}

impl TagTree {
    pub const fn new() -> Self {
        Self {
            tags: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&TagNode> {
        self.tags.get(name)
    }

    pub fn insert(&mut self, name: String, node: TagNode) {
        self.tags.insert(name, node);
    }

    pub fn remove(&mut self, name: &str) -> Option<TagNode> {
        self.tags.remove(name)
    }

    /// All entries in ascending name order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.tags.iter(),
        }
    }

    /// Leaf entries in ascending name order
    pub fn leaves(&self) -> impl Iterator<Item = (&str, &TagNode)> {
        self.iter().filter(|(_, node)| node.is_leaf())
    }

    /// Branch entries in ascending name order
    pub fn branches(&self) -> impl Iterator<Item = (&str, &TagNode)> {
        self.iter().filter(|(_, node)| node.is_branch())
    }

    /// Follow a path of names from this tree; an empty path is never a node.
    pub fn lookup<'p>(&self, path: impl IntoIterator<Item = &'p str>) -> Option<&TagNode> {
        let mut path = path.into_iter();
        let mut node = self.get(path.next()?)?;
        for name in path {
            node = node.children()?.get(name)?;
        }
        Some(node)
    }
}

impl TagNode {
    /// True when no child element has been recorded
    pub fn is_leaf(&self) -> bool {
        match self {
            Self::Leaf => true,
            Self::Branch(children) => children.is_empty(),
        }
    }

    pub fn is_branch(&self) -> bool {
        !self.is_leaf()
    }

    pub fn children(&self) -> Option<&TagTree> {
        match self {
            Self::Leaf => None,
            Self::Branch(children) => Some(children),
        }
    }

    /// Turn a leaf into an empty branch; branches are left untouched.
    pub fn promote(&mut self) {
        if let Self::Leaf = self {
            *self = Self::Branch(TagTree::new());
        }
    }

    /// Detach the child `name`, promoting this node first. `None` means the
    /// child has not been recorded here before.
    pub fn take_child(&mut self, name: &str) -> Option<TagNode> {
        self.promote();
        match self {
            Self::Branch(children) => children.remove(name),
            Self::Leaf => None,
        }
    }

    /// Record `child` under `name`, promoting this node first.
    pub fn insert_child(&mut self, name: String, child: TagNode) {
        self.promote();
        if let Self::Branch(children) = self {
            children.insert(name, child);
        }
    }

    pub fn into_children(self) -> TagTree {
        match self {
            Self::Leaf => TagTree::new(),
            Self::Branch(children) => children,
        }
    }
}

impl Drop for TagTree {
    // nested branches are unlinked onto a heap stack so dropping never recurses
    fn drop(&mut self) {
        let mut pending = vec![std::mem::take(&mut self.tags)];
        while let Some(tags) = pending.pop() {
            for node in tags.into_values() {
                if let TagNode::Branch(mut children) = node {
                    pending.push(std::mem::take(&mut children.tags));
                }
            }
        }
    }
}

/// Iterator over the entries of a [`TagTree`]
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, TagNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a TagNode);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(name, node)| (name.as_str(), node))
    }
}

impl<'a> IntoIterator for &'a TagTree {
    type Item = (&'a str, &'a TagNode);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
