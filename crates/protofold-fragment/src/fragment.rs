//! The `Fragment` type and its primitives

use crate::monoid::{Monoid, fold_map};
use std::fmt;
use std::ops::Add;
use std::sync::Arc;

/// Indent unit used by [`Fragment::indent`].
pub const DEFAULT_INDENT: &str = "\t";

/// The shape of a fragment.
///
/// Sequences are kept flat: a `Seq` never holds another `Seq`, so rendering
/// and dropping stay shallow however many fragments are appended.
#[derive(Clone)]
enum Node {
    Empty,
    Text(String),
    Seq(Vec<Fragment>),
    Indent { unit: String, body: Fragment },
}

/// An immutable, composable unit of generated text.
///
/// A fragment holds a description of its text and produces the text only
/// when [`render`](Fragment::render) is called. Rendering the same fragment
/// twice yields identical bytes, and combining fragments never changes an
/// operand another holder can see, so a fragment can be shared, cached, or
/// rendered from several threads.
#[derive(Clone)]
pub struct Fragment {
    node: Arc<Node>,
}

impl Fragment {
    fn from_node(node: Node) -> Self {
        Self {
            node: Arc::new(node),
        }
    }

    /// The fragment that renders nothing.
    pub fn empty() -> Self {
        Self::from_node(Node::Empty)
    }

    /// Text rendered exactly as given, with no trailing newline.
    pub fn lit(text: impl Into<String>) -> Self {
        let text: String = text.into();
        if text.is_empty() {
            return Self::empty();
        }
        Self::from_node(Node::Text(text))
    }

    /// One line of text followed by `\n`.
    pub fn line(text: impl Into<String>) -> Self {
        let mut text: String = text.into();
        text.push('\n');
        Self::from_node(Node::Text(text))
    }

    /// An empty line.
    pub fn blank() -> Self {
        Self::line("")
    }

    /// A `// ` line comment.
    pub fn comment(text: impl AsRef<str>) -> Self {
        Self::line(format!("// {}", text.as_ref()))
    }

    /// `open`, then `body` indented one level, then `close`, each on its own line.
    pub fn block(open: impl Into<String>, body: Fragment, close: impl Into<String>) -> Self {
        Self::line(open).append(body.indent()).append(Self::line(close))
    }

    /// Concatenate `self` and `other`.
    ///
    /// Appending to a sequence nobody else holds extends it in place, so a
    /// left fold over `n` fragments costs `O(n)` and nests nothing.
    pub fn append(mut self, other: Fragment) -> Self {
        if matches!(*other.node, Node::Empty) {
            return self;
        }
        match *self.node {
            Node::Empty => other,
            Node::Seq(_) => {
                if let Node::Seq(children) = Arc::make_mut(&mut self.node) {
                    push_flat(children, other);
                }
                self
            }
            _ => {
                let mut children = Vec::with_capacity(2);
                children.push(self);
                push_flat(&mut children, other);
                Self::from_node(Node::Seq(children))
            }
        }
    }

    /// Indent every non-empty line by [`DEFAULT_INDENT`].
    pub fn indent(self) -> Self {
        self.indent_with(DEFAULT_INDENT)
    }

    /// Indent every non-empty line by `unit`; blank lines stay bare so generated
    /// files carry no trailing whitespace.
    pub fn indent_with(self, unit: impl Into<String>) -> Self {
        if matches!(*self.node, Node::Empty) {
            return self;
        }
        Self::from_node(Node::Indent {
            unit: unit.into(),
            body: self,
        })
    }

    /// Produce the text. This is the only way a fragment becomes a `String`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        match &*self.node {
            Node::Empty => {}
            Node::Text(text) => out.push_str(text),
            Node::Seq(children) => children.iter().for_each(|child| child.write_to(out)),
            Node::Indent { unit, body } => {
                let inner = body.render();
                for (i, line) in inner.split('\n').enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    if !line.is_empty() {
                        out.push_str(unit);
                    }
                    out.push_str(line);
                }
            }
        }
    }
}

fn push_flat(children: &mut Vec<Fragment>, fragment: Fragment) {
    match &*fragment.node {
        Node::Empty => {}
        Node::Seq(inner) => children.extend(inner.iter().cloned()),
        _ => children.push(fragment),
    }
}

impl Monoid for Fragment {
    fn empty() -> Self {
        Fragment::empty()
    }

    fn append(self, other: Self) -> Self {
        Fragment::append(self, other)
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Fragment::empty()
    }
}

impl Add for Fragment {
    type Output = Fragment;

    fn add(self, rhs: Fragment) -> Fragment {
        self.append(rhs)
    }
}

impl FromIterator<Fragment> for Fragment {
    fn from_iter<I: IntoIterator<Item = Fragment>>(iter: I) -> Self {
        crate::monoid::concat(iter)
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Fragment").field(&self.render()).finish()
    }
}

/// `fragment` when `condition` holds, otherwise [`Fragment::empty`].
pub fn when(condition: bool, fragment: Fragment) -> Fragment {
    if condition { fragment } else { Fragment::empty() }
}

/// Build a fragment from `value` when it is present, otherwise empty.
pub fn when_some<T>(value: Option<T>, f: impl FnOnce(T) -> Fragment) -> Fragment {
    value.map(f).unwrap_or_default()
}

/// Concatenate `items` with `separator` between neighbours.
pub fn join<I>(items: I, separator: Fragment) -> Fragment
where
    I: IntoIterator<Item = Fragment>,
{
    fold_map(items.into_iter().enumerate(), |(i, item)| {
        when(i > 0, separator.clone()).append(item)
    })
}
