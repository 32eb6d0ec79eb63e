//! Tag-shape aggregation
//!
//! An [`Aggregator`] owns one [`TagTree`] and merges every document fed to
//! it into that tree. The tree holds the children of the root element; each
//! occurrence of the root, in any document, adds its nesting paths to the
//! same tree.

use tracing::{debug, trace};

use crate::error::Result;
use crate::tree::{TagNode, TagTree};
use crate::xml::{Config, Event, Reader};

/// Shared aggregation context for one run
#[derive(Clone, Debug)]
pub struct Aggregator {
    root: String,
    tree: TagTree,
}

impl Aggregator {
    /// Create an empty aggregation for the element named `root`
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            tree: TagTree::new(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Children of the root element merged so far
    pub fn tree(&self) -> &TagTree {
        &self.tree
    }

    pub fn into_tree(self) -> TagTree {
        self.tree
    }

    /// Parse `input` as XML and merge it.
    pub fn feed_bytes(&mut self, input: &[u8]) -> Result<()> {
        self.feed(Reader::new(input))
    }

    /// Parse `input` with a custom reader configuration and merge it.
    pub fn feed_bytes_with_config(&mut self, input: &[u8], config: Config) -> Result<()> {
        self.feed(Reader::with_config(input, config))
    }

    /// Merge one document's event stream.
    ///
    /// Events outside any root occurrence are ignored. The first error ends
    /// the document; whatever was merged before it stays in the tree.
    pub fn feed<I>(&mut self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<Event>>,
    {
        let mut events = events.into_iter();
        let mut occurrences = 0usize;
        let mut result = Ok(());

        while let Some(event) = events.next() {
            match event {
                Ok(Event::Start(name)) if name == self.root => {
                    occurrences += 1;
                    debug!(root = %self.root, occurrence = occurrences, "matched root element");
                    if let Err(err) = descend(&mut events, &self.root, &mut self.tree) {
                        result = Err(err);
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    result = Err(err);
                    break;
                }
            }
        }

        debug!(
            root = %self.root,
            occurrences,
            tags = self.tree.len(),
            "finished document"
        );
        result
    }
}

/// An open element whose node is detached from its parent until it closes
#[derive(Debug)]
struct Frame {
    name: String,
    node: TagNode,
}

/// Merge one root occurrence into `tree`, returning once the root's end tag
/// has been consumed. Open elements live on a heap stack, so nesting depth is
/// bounded by memory rather than by the call stack.
fn descend<I>(events: &mut I, root: &str, tree: &mut TagTree) -> Result<()>
where
    I: Iterator<Item = Result<Event>>,
{
    let mut stack = vec![Frame {
        name: root.to_owned(),
        node: TagNode::Branch(std::mem::take(tree)),
    }];

    let result = merge_open_elements(events, &mut stack);

    // on error or early end of input, fold whatever is still open back in
    while stack.len() > 1 {
        close_frame(&mut stack);
    }
    if let Some(frame) = stack.pop() {
        *tree = frame.node.into_children();
    }
    result
}

fn merge_open_elements<I>(events: &mut I, stack: &mut Vec<Frame>) -> Result<()>
where
    I: Iterator<Item = Result<Event>>,
{
    for event in events {
        match event? {
            Event::Start(child) => {
                let Some(parent) = stack.last_mut() else {
                    return Ok(());
                };
                let node = parent.node.take_child(&child).unwrap_or_else(|| {
                    trace!(parent = %parent.name, tag = %child, "new tag");
                    TagNode::Leaf
                });
                stack.push(Frame { name: child, node });
            }
            Event::End(closed) => {
                if stack.last().is_some_and(|frame| frame.name == closed) {
                    if stack.len() == 1 {
                        return Ok(());
                    }
                    close_frame(stack);
                }
            }
            Event::Text => {}
        }
    }
    Ok(())
}

/// Pop the innermost frame and reattach its node to the parent.
fn close_frame(stack: &mut Vec<Frame>) {
    if let Some(frame) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.node.insert_child(frame.name, frame.node);
        }
    }
}

/// Aggregate several in-memory documents under `root`.
pub fn enumerate_str<S: AsRef<str>>(root: &str, documents: &[S]) -> Result<TagTree> {
    let mut aggregator = Aggregator::new(root);
    for document in documents {
        aggregator.feed_bytes(document.as_ref().as_bytes())?;
    }
    Ok(aggregator.into_tree())
}
