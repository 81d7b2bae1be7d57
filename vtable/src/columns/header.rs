use alloc::string::String;
use alloc::vec::Vec;

use crate::key::KeyMap;
use crate::{Error, Result};

/// Sticky placement of a top-level column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Freeze {
    #[default]
    None,
    Left,
    Right,
}

/// A column that renders cells.
///
/// `freeze` and `visible` are only read on top-level nodes; nested leaves inherit their
/// group's placement.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leaf {
    pub key: String,
    pub caption: String,
    /// Declared width; the table's default column width when `None`.
    pub width: Option<u32>,
    pub min_width: Option<u32>,
    pub no_stretch: bool,
    pub freeze: Freeze,
    pub visible: bool,
    /// Values offered by the selection filter of this column.
    pub filter_options: Vec<String>,
}

impl Leaf {
    pub fn new(key: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            caption: caption.into(),
            width: None,
            min_width: None,
            no_stretch: false,
            freeze: Freeze::None,
            visible: true,
            filter_options: Vec::new(),
        }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_min_width(mut self, min_width: u32) -> Self {
        self.min_width = Some(min_width);
        self
    }

    pub fn no_stretch(mut self) -> Self {
        self.no_stretch = true;
        self
    }

    pub fn frozen(mut self, freeze: Freeze) -> Self {
        self.freeze = freeze;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_filter_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter_options = options.into_iter().map(Into::into).collect();
        self
    }
}

/// A header spanning its children; its width is always the sum of its leaves.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    pub key: String,
    pub caption: String,
    pub children: Vec<HeaderNode>,
    pub freeze: Freeze,
    pub visible: bool,
}

impl Group {
    pub fn new(
        key: impl Into<String>,
        caption: impl Into<String>,
        children: impl IntoIterator<Item = HeaderNode>,
    ) -> Self {
        Self {
            key: key.into(),
            caption: caption.into(),
            children: children.into_iter().collect(),
            freeze: Freeze::None,
            visible: true,
        }
    }

    pub fn frozen(mut self, freeze: Freeze) -> Self {
        self.freeze = freeze;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum HeaderNode {
    Leaf(Leaf),
    Group(Group),
}

impl HeaderNode {
    pub fn key(&self) -> &str {
        match self {
            Self::Leaf(l) => &l.key,
            Self::Group(g) => &g.key,
        }
    }

    pub fn caption(&self) -> &str {
        match self {
            Self::Leaf(l) => &l.caption,
            Self::Group(g) => &g.caption,
        }
    }

    pub fn freeze(&self) -> Freeze {
        match self {
            Self::Leaf(l) => l.freeze,
            Self::Group(g) => g.freeze,
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            Self::Leaf(l) => l.visible,
            Self::Group(g) => g.visible,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        match self {
            Self::Leaf(l) => l.visible = visible,
            Self::Group(g) => g.visible = visible,
        }
    }

    /// Grouping levels below this node; a leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Group(g) => 1 + g.children.iter().map(Self::depth).max().unwrap_or(0),
        }
    }

    /// Leaves in left-to-right order.
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    pub fn find_leaf(&self, key: &str) -> Option<&Leaf> {
        match self {
            Self::Leaf(l) => (l.key == key).then_some(l),
            Self::Group(g) => g.children.iter().find_map(|c| c.find_leaf(key)),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Group(g) => g.children.iter().map(Self::leaf_count).sum(),
        }
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Leaf>) {
        match self {
            Self::Leaf(l) => out.push(l),
            Self::Group(g) => g.children.iter().for_each(|c| c.collect_leaves(out)),
        }
    }
}

impl From<Leaf> for HeaderNode {
    fn from(leaf: Leaf) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<Group> for HeaderNode {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

/// Rejects duplicate keys (leaves and groups share one namespace) and childless groups.
pub fn validate_headers(headers: &[HeaderNode]) -> Result<()> {
    fn walk<'a>(node: &'a HeaderNode, seen: &mut KeyMap<&'a str, ()>) -> Result<()> {
        if seen.insert(node.key(), ()).is_some() {
            return Err(Error::DuplicateColumnKey(String::from(node.key())));
        }
        if let HeaderNode::Group(g) = node {
            if g.children.is_empty() {
                return Err(Error::EmptyGroup(g.key.clone()));
            }
            for child in &g.children {
                walk(child, seen)?;
            }
        }
        Ok(())
    }

    let mut seen = KeyMap::default();
    headers.iter().try_for_each(|h| walk(h, &mut seen))
}
