//! Node addressing and tree walks.
//!
//! A node path lists child indices from the root, written `/2/1` for the
//! second child of the root's third child. Indices count an element's
//! children first and its scoped-slot templates after them. The root
//! itself is the empty path, written `""` or `"/"`.

use crate::ast::{Element, ExpressionText, TemplateNode, Text};
use crate::error::TemplateError;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use vue_common::Position;

/// A path of child indices from the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns true if this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The child indices.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Returns the path of the `index`-th child of this node.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Splits into the parent path and the last index.
    pub fn split_last(&self) -> Option<(NodePath, usize)> {
        let (last, parent) = self.0.split_last()?;
        Some((NodePath(parent.to_vec()), *last))
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in &self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = TemplateError;

    fn from_str(route: &str) -> Result<Self, Self::Err> {
        let trimmed = route.strip_prefix('/').unwrap_or(route);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        trimmed
            .split('/')
            .map(|segment| {
                segment.parse::<usize>().map_err(|_| TemplateError::InvalidRoute {
                    route: route.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Where a merged fragment is inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertTarget {
    /// Insert into the element at `parent`, at `index` among its children,
    /// or at the end when `index` is `None`.
    Path {
        /// Path of the receiving element.
        parent: NodePath,
        /// Insertion index, or `None` to append.
        index: Option<usize>,
    },
    /// Append to the deepest element containing this cursor position.
    Position(Position),
}

impl Default for InsertTarget {
    fn default() -> Self {
        Self::root()
    }
}

impl InsertTarget {
    /// Appends to the root element.
    pub fn root() -> Self {
        Self::Path {
            parent: NodePath::root(),
            index: None,
        }
    }
}

impl FromStr for InsertTarget {
    type Err = TemplateError;

    /// Parses an insertion route. The last segment is the index inside the
    /// element addressed by the segments before it; an empty last segment
    /// appends. `""` and `"/"` append to the root.
    fn from_str(route: &str) -> Result<Self, Self::Err> {
        let trimmed = route.strip_prefix('/').unwrap_or(route);
        let (parent, last) = match trimmed.rfind('/') {
            Some(i) => (&trimmed[..i], &trimmed[i + 1..]),
            None => ("", trimmed),
        };
        let index = if last.is_empty() {
            None
        } else {
            Some(last.parse::<usize>().map_err(|_| TemplateError::InvalidRoute {
                route: route.to_string(),
            })?)
        };
        Ok(Self::Path {
            parent: parent.parse()?,
            index,
        })
    }
}

/// Visits `root` and every addressable descendant breadth-first.
pub fn traverse<'a>(root: &'a TemplateNode, mut visit: impl FnMut(&'a TemplateNode, &NodePath)) {
    let mut queue = VecDeque::from([(root, NodePath::root())]);
    while let Some((node, path)) = queue.pop_front() {
        if let TemplateNode::Element(el) = node {
            for (index, child) in el.addressable().enumerate() {
                queue.push_back((child, path.child(index)));
            }
        }
        visit(node, &path);
    }
}

/// Resolves a path from `root`.
pub fn find_by_path<'a>(root: &'a TemplateNode, path: &NodePath) -> Option<&'a TemplateNode> {
    let mut node = root;
    for &index in path.indices() {
        node = node.as_element()?.child(index)?;
    }
    Some(node)
}

/// Resolves a path from `root` mutably.
pub fn find_by_path_mut<'a>(
    root: &'a mut TemplateNode,
    path: &NodePath,
) -> Option<&'a mut TemplateNode> {
    let mut node = root;
    for &index in path.indices() {
        node = node.as_element_mut()?.child_mut(index)?;
    }
    Some(node)
}

/// Removes the node at `path`. The root cannot be removed this way.
pub fn remove(root: &mut TemplateNode, path: &NodePath) -> Option<TemplateNode> {
    let (parent, index) = path.split_last()?;
    let parent = find_by_path_mut(root, &parent)?.as_element_mut()?;
    if index < parent.children.len() {
        return Some(parent.children.remove(index));
    }
    parent
        .slots
        .shift_remove_index(index - parent.children.len())
        .map(|(_, node)| node)
}

/// A mutable view of any node, including `v-if` branch elements.
pub enum NodeMut<'a> {
    /// An element.
    Element(&'a mut Element),
    /// Plain text.
    Text(&'a mut Text),
    /// Interpolated text.
    Expression(&'a mut ExpressionText),
}

/// Visits every node under `node` depth-first, including `v-if` branches.
pub fn walk_mut(node: &mut TemplateNode, visit: &mut impl FnMut(NodeMut<'_>)) {
    match node {
        TemplateNode::Element(el) => walk_element_mut(el, visit),
        TemplateNode::Text(text) => visit(NodeMut::Text(text)),
        TemplateNode::Expression(expr) => visit(NodeMut::Expression(expr)),
    }
}

/// Visits `el` and everything under it depth-first, including `v-if` branches.
pub fn walk_element_mut(el: &mut Element, visit: &mut impl FnMut(NodeMut<'_>)) {
    visit(NodeMut::Element(&mut *el));
    for child in el.children.iter_mut().chain(el.slots.values_mut()) {
        walk_mut(child, visit);
    }
    for branch in &mut el.branches {
        walk_element_mut(branch, visit);
    }
}
