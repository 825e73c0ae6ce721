//! Hierarchical dotted tags
//!
//! A [`Tag`] such as `Asset.Data.Weapon` is an immutable identifier whose
//! segments form a tree. Tags are compared exactly for map keys and by
//! self-or-descendant for [`Tag::matches`].

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

const SEPARATOR: char = '.';

/// Immutable hierarchical identifier
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(Arc<str>);

impl Tag {
    /// Parse a dotted tag. Segments must be non-empty and free of whitespace.
    pub fn new(text: &str) -> Result<Self> {
        let valid = !text.is_empty()
            && text
                .split(SEPARATOR)
                .all(|segment| !segment.is_empty() && !segment.chars().any(char::is_whitespace));
        if !valid {
            return Err(CoreError::InvalidTag(text.into()));
        }
        Ok(Self(text.into()))
    }

    /// Full dotted text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Self-or-descendant match: `A.B.C` matches `A.B` and `A.B.C`, not `A.Bx`
    pub fn matches(&self, parent: &Tag) -> bool {
        match self.0.strip_prefix(&*parent.0) {
            Some("") => true,
            Some(rest) => rest.starts_with(SEPARATOR),
            None => false,
        }
    }

    /// Direct parent, `None` for a root tag
    pub fn parent(&self) -> Option<Tag> {
        self.0
            .rfind(SEPARATOR)
            .map(|index| Tag(self.0[..index].into()))
    }

    /// This tag and every ancestor, nearest first
    pub fn parents(&self) -> Vec<Tag> {
        let mut out = Vec::new();
        let mut current = Some(self.clone());
        while let Some(tag) = current {
            current = tag.parent();
            out.push(tag);
        }
        out
    }

    /// Last segment (`Weapon` for `Asset.Data.Weapon`)
    pub fn leaf(&self) -> &str {
        match self.0.rfind(SEPARATOR) {
            Some(index) => &self.0[index + 1..],
            None => &self.0,
        }
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.0.split(SEPARATOR).count()
    }

    /// Iterate the segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Tag {
    type Error = CoreError;

    fn try_from(text: String) -> Result<Self> {
        Tag::new(&text)
    }
}

impl TryFrom<&str> for Tag {
    type Error = CoreError;

    fn try_from(text: &str) -> Result<Self> {
        Tag::new(text)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.0.to_string()
    }
}

/// Tags in `container` that match `parent`, in container order
pub fn tag_nodes<'a>(container: impl IntoIterator<Item = &'a Tag>, parent: &Tag) -> Vec<Tag> {
    container
        .into_iter()
        .filter(|tag| tag.matches(parent))
        .cloned()
        .collect()
}

/// Known tag hierarchy. Registering a tag registers its ancestors too.
#[derive(Debug, Default, Clone)]
pub struct TagTree {
    nodes: BTreeSet<Tag>,
}

impl TagTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag and its implicit parents
    pub fn insert(&mut self, tag: &Tag) {
        for node in tag.parents() {
            if !self.nodes.insert(node) {
                break;
            }
        }
    }

    /// Check if a tag is known
    pub fn contains(&self, tag: &Tag) -> bool {
        self.nodes.contains(tag)
    }

    /// Direct children of `tag`
    pub fn children(&self, tag: &Tag) -> impl Iterator<Item = &Tag> + '_ {
        let tag = tag.clone();
        self.nodes
            .iter()
            .filter(move |node| node.parent().as_ref() == Some(&tag))
    }

    /// Descendants of `tag`. `depth` 0 means direct children only; each
    /// extra level of depth reaches one generation further.
    pub fn child_tags(&self, tag: &Tag, depth: usize, only_leaves: bool) -> Vec<Tag> {
        let mut out = Vec::new();
        if self.contains(tag) {
            self.collect_children(tag, 0, depth, only_leaves, &mut out);
        }
        out
    }

    fn collect_children(
        &self,
        node: &Tag,
        current_depth: usize,
        max_depth: usize,
        only_leaves: bool,
        out: &mut Vec<Tag>,
    ) {
        for child in self.children(node) {
            if !only_leaves || self.children(child).next().is_none() {
                out.push(child.clone());
            }
            if current_depth < max_depth {
                self.collect_children(child, current_depth + 1, max_depth, only_leaves, out);
            }
        }
    }

    /// Number of known tags
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<'a> FromIterator<&'a Tag> for TagTree {
    fn from_iter<I: IntoIterator<Item = &'a Tag>>(iter: I) -> Self {
        let mut tree = TagTree::new();
        for tag in iter {
            tree.insert(tag);
        }
        tree
    }
}
