//! Monoid trait and the folds built on it

/// A type with an associative [`append`](Monoid::append) and a two-sided
/// identity [`empty`](Monoid::empty).
///
/// Laws:
///
/// ```text
/// empty().append(a)            == a
/// a.append(empty())            == a
/// a.append(b).append(c)        == a.append(b.append(c))
/// ```
pub trait Monoid: Sized {
    fn empty() -> Self;

    fn append(self, other: Self) -> Self;
}

impl Monoid for String {
    fn empty() -> Self {
        String::new()
    }

    fn append(mut self, other: Self) -> Self {
        self.push_str(&other);
        self
    }
}

impl<T> Monoid for Vec<T> {
    fn empty() -> Self {
        Vec::new()
    }

    fn append(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}

/// Reduce `items` into one value, preserving their order.
///
/// # Examples
///
/// ```
/// use protofold_fragment::fold;
///
/// let csv = fold(["a", "b", "c"], String::new(), |mut acc, s| {
///     if !acc.is_empty() {
///         acc.push(',');
///     }
///     acc.push_str(s);
///     acc
/// });
///
/// assert_eq!(csv, "a,b,c");
/// ```
pub fn fold<I, B, F>(items: I, start: B, combine: F) -> B
where
    I: IntoIterator,
    F: FnMut(B, I::Item) -> B,
{
    items.into_iter().fold(start, combine)
}

/// Append every item in order, starting from [`Monoid::empty`].
pub fn concat<M, I>(items: I) -> M
where
    M: Monoid,
    I: IntoIterator<Item = M>,
{
    fold(items, M::empty(), M::append)
}

/// Map every item into a monoid and [`concat`] the results.
///
/// # Examples
///
/// ```
/// use protofold_fragment::{Fragment, fold_map};
///
/// let imports = fold_map(["fmt", "sync"], |p| Fragment::line(format!("import {p:?}")));
///
/// assert_eq!(imports.render(), "import \"fmt\"\nimport \"sync\"\n");
/// ```
pub fn fold_map<A, M, I, F>(items: I, f: F) -> M
where
    M: Monoid,
    I: IntoIterator<Item = A>,
    F: FnMut(A) -> M,
{
    concat(items.into_iter().map(f))
}
