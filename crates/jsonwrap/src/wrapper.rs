//! Failure-safe navigation over a tree value.
//!
//! A [`Wrapper`] is a cheap `Copy` handle over a borrowed [`Value`]. Every
//! navigation call returns a new wrapper (or a borrowed value), and a miss at
//! any level degrades to `null` instead of an error:
//!
//! ```
//! use serde_json::json;
//! use jsonwrap::{path, Wrapper};
//!
//! let doc = json!([{"_id": "a1", "tags": ["x", "y"]}]);
//! let root = Wrapper::new(&doc);
//!
//! let node = root.get([0]);
//! assert_eq!(node.at_one("_id"), &json!("a1"));
//! assert_eq!(node.at_one(path!["tags", 0]), &json!("x"));
//! assert_eq!(node.at_many(["_id", "missing"]), vec![&json!("a1"), &json!(null)]);
//! assert!(root.get(path![0, "nope", 3]).is_null());
//! ```
//!
//! # Lookup rules
//!
//! A single step succeeds only for a name on a mapping (key present) or an
//! index on a sequence (in range, negative indices counting from the end).
//! Every other combination is a miss.

use crate::kind;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::iter::{Enumerate, FusedIterator};

/// Target of every navigation miss.
static NULL: Value = Value::Null;

/// One step of a path: a mapping key or a sequence index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Key<'a> {
    Name(&'a str),
    /// Negative values count from the end of the sequence.
    Index(i64),
}

impl Key<'_> {
    /// Apply this key to `value`, returning the child it addresses.
    pub fn lookup<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        match (self, value) {
            (Key::Name(name), Value::Object(map)) => map.get(*name),
            (Key::Index(index), Value::Array(items)) => {
                resolve_index(*index, items.len()).map(|i| &items[i])
            }
            _ => None,
        }
    }

    /// Value-equality between this key and a sequence element.
    fn matches(&self, element: &Value) -> bool {
        match (self, element) {
            (Key::Name(name), Value::String(s)) => *name == s.as_str(),
            (Key::Index(index), Value::Number(n)) if n.is_f64() => n
                .as_f64()
                .is_some_and(|f| f.fract() == 0.0 && float_to_i64(f) == Some(*index)),
            (Key::Index(index), Value::Number(n)) => n.as_i64() == Some(*index),
            _ => false,
        }
    }
}

/// Exact conversion of an integral float, `None` outside the `i64` range.
fn float_to_i64(f: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or beyond it overflows.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (f >= -LIMIT && f < LIMIT).then_some(f as i64)
}

/// Map a possibly negative index onto `0..len`.
fn resolve_index(index: i64, len: usize) -> Option<usize> {
    if index >= 0 {
        usize::try_from(index).ok().filter(|&i| i < len)
    } else {
        let back = usize::try_from(index.unsigned_abs()).ok()?;
        len.checked_sub(back)
    }
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => f.write_str(name),
            Key::Index(index) => write!(f, "{index}"),
        }
    }
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(name: &'a str) -> Self {
        Key::Name(name)
    }
}

impl<'a> From<&'a String> for Key<'a> {
    fn from(name: &'a String) -> Self {
        Key::Name(name.as_str())
    }
}

impl<'a> From<&Key<'a>> for Key<'a> {
    fn from(key: &Key<'a>) -> Self {
        *key
    }
}

macro_rules! key_from_lossless {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Key<'_> {
            fn from(index: $ty) -> Self {
                Key::Index(i64::from(index))
            }
        }
    )*};
}

// Indices beyond i64::MAX can never be in range, so they saturate.
macro_rules! key_from_saturating {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Key<'_> {
            fn from(index: $ty) -> Self {
                Key::Index(i64::try_from(index).unwrap_or(i64::MAX))
            }
        }
    )*};
}

key_from_lossless!(i8, i16, i32, i64, u8, u16, u32);
key_from_saturating!(u64, usize, isize);

/// Build a heterogeneous key path for [`Wrapper::get`] or a compound
/// [`Selector`].
///
/// ```
/// use jsonwrap::{path, Key};
///
/// assert_eq!(path!["tags", 0], [Key::Name("tags"), Key::Index(0)]);
/// assert_eq!(path![].len(), 0);
/// ```
#[macro_export]
macro_rules! path {
    () => {{
        let empty: [$crate::Key<'static>; 0] = [];
        empty
    }};
    ($($key:expr),+ $(,)?) => {
        [$($crate::Key::from($key)),+]
    };
}

/// What [`Wrapper::at_one`] and [`Wrapper::at_many`] resolve: a single key
/// applied to the root, or a compound path walked from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<'a> {
    Key(Key<'a>),
    Path(Vec<Key<'a>>),
}

impl<'a> From<Key<'a>> for Selector<'a> {
    fn from(key: Key<'a>) -> Self {
        Selector::Key(key)
    }
}

impl<'a> From<&'a str> for Selector<'a> {
    fn from(name: &'a str) -> Self {
        Selector::Key(Key::Name(name))
    }
}

impl<'a> From<&'a String> for Selector<'a> {
    fn from(name: &'a String) -> Self {
        Selector::Key(Key::from(name))
    }
}

impl<'a> From<Vec<Key<'a>>> for Selector<'a> {
    fn from(path: Vec<Key<'a>>) -> Self {
        Selector::Path(path)
    }
}

impl<'a> From<&[Key<'a>]> for Selector<'a> {
    fn from(path: &[Key<'a>]) -> Self {
        Selector::Path(path.to_vec())
    }
}

impl<'a, const N: usize> From<[Key<'a>; N]> for Selector<'a> {
    fn from(path: [Key<'a>; N]) -> Self {
        Selector::Path(path.to_vec())
    }
}

macro_rules! selector_from_index {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Selector<'_> {
            fn from(index: $ty) -> Self {
                Selector::Key(Key::from(index))
            }
        }
    )*};
}

selector_from_index!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

/// An immutable handle over one tree value.
#[derive(Debug, Clone, Copy)]
pub struct Wrapper<'a> {
    ctx: &'a Value,
}

impl<'a> Wrapper<'a> {
    /// Wrap `value`. The value is borrowed, never copied.
    pub fn new(value: &'a Value) -> Self {
        Self { ctx: value }
    }

    /// A wrapper over `null`, the result of every navigation miss.
    pub fn null() -> Self {
        Self { ctx: &NULL }
    }

    /// The wrapped value.
    pub fn value(&self) -> &'a Value {
        self.ctx
    }

    pub fn is_null(&self) -> bool {
        self.ctx.is_null()
    }

    pub fn is_leaf(&self) -> bool {
        kind::is_leaf(self.ctx)
    }

    pub fn is_node(&self) -> bool {
        kind::is_node(self.ctx)
    }

    /// Membership test on the wrapped value.
    ///
    /// Mappings test key presence, sequences test whether an element equals
    /// the key, strings test substring containment. Every other combination,
    /// including any key against a number, boolean or null, is `false`.
    pub fn contains<'k>(&self, key: impl Into<Key<'k>>) -> bool {
        match (self.ctx, key.into()) {
            (Value::Object(map), Key::Name(name)) => map.contains_key(name),
            (Value::Array(items), key) => items.iter().any(|item| key.matches(item)),
            (Value::String(s), Key::Name(needle)) => s.contains(needle),
            _ => false,
        }
    }

    /// Descend one level. Equivalent to `get([key])`.
    pub fn child<'k>(&self, key: impl Into<Key<'k>>) -> Wrapper<'a> {
        match key.into().lookup(self.ctx) {
            Some(value) => Wrapper::new(value),
            None => Wrapper::null(),
        }
    }

    /// Walk `path` one key per level, left to right.
    ///
    /// Stops at the first miss and returns a wrapper over `null`. An empty
    /// path returns a wrapper over the same value.
    pub fn get<'k, I>(&self, path: I) -> Wrapper<'a>
    where
        I: IntoIterator,
        I::Item: Into<Key<'k>>,
    {
        let mut current = self.ctx;
        for (depth, key) in path.into_iter().enumerate() {
            let key = key.into();
            match key.lookup(current) {
                Some(next) => current = next,
                None => {
                    tracing::trace!(%key, depth, "navigation miss");
                    return Wrapper::null();
                }
            }
        }
        Wrapper::new(current)
    }

    /// Resolve a single selector to a raw value, `null` on any miss.
    pub fn at_one<'k>(&self, selector: impl Into<Selector<'k>>) -> &'a Value {
        self.select(&selector.into())
    }

    /// Resolve each selector independently, preserving input order.
    /// Misses appear as `null` at their position.
    pub fn at_many<'k, I>(&self, selectors: I) -> Vec<&'a Value>
    where
        I: IntoIterator,
        I::Item: Into<Selector<'k>>,
    {
        selectors
            .into_iter()
            .map(|selector| self.select(&selector.into()))
            .collect()
    }

    fn select(&self, selector: &Selector<'_>) -> &'a Value {
        match selector {
            Selector::Key(key) => key.lookup(self.ctx).unwrap_or(&NULL),
            Selector::Path(keys) => self.get(keys).ctx,
        }
    }

    /// Start a new iteration pass over the immediate children.
    ///
    /// Mapping keys come out in sorted order, sequence elements by ascending
    /// index. A scalar or null yields itself once, with no key.
    pub fn children(&self) -> Children<'a> {
        let state = match self.ctx {
            Value::Object(map) => State::Mapping(sorted_entries(map).into_iter()),
            Value::Array(items) => State::Sequence(items.iter().enumerate()),
            scalar => State::Scalar(Some(scalar)),
        };
        Children { state }
    }
}

fn sorted_entries(map: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    entries
}

impl Default for Wrapper<'_> {
    fn default() -> Self {
        Wrapper::null()
    }
}

impl<'a> From<&'a Value> for Wrapper<'a> {
    fn from(value: &'a Value) -> Self {
        Wrapper::new(value)
    }
}

impl PartialEq for Wrapper<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.ctx == other.ctx
    }
}

impl PartialEq<Value> for Wrapper<'_> {
    fn eq(&self, other: &Value) -> bool {
        self.ctx == other
    }
}

/// Pretty JSON, two-space indent.
impl fmt::Display for Wrapper<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string_pretty(self.ctx).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Serialize for Wrapper<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.ctx.serialize(serializer)
    }
}

/// One iteration pass over a wrapper's immediate children.
///
/// Created by [`Wrapper::children`]. Holds its own cursor and, for mappings,
/// its own sorted snapshot of the entries.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    state: State<'a>,
}

#[derive(Debug, Clone)]
enum State<'a> {
    Mapping(std::vec::IntoIter<(&'a String, &'a Value)>),
    Sequence(Enumerate<std::slice::Iter<'a, Value>>),
    Scalar(Option<&'a Value>),
}

impl<'a> Iterator for Children<'a> {
    type Item = (Option<Key<'a>>, Wrapper<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.state {
            State::Mapping(entries) => entries
                .next()
                .map(|(key, value)| (Some(Key::Name(key.as_str())), Wrapper::new(value))),
            State::Sequence(items) => items
                .next()
                .map(|(index, value)| (Some(Key::from(index)), Wrapper::new(value))),
            State::Scalar(slot) => slot.take().map(|value| (None, Wrapper::new(value))),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.state {
            State::Mapping(entries) => entries.len(),
            State::Sequence(items) => items.len(),
            State::Scalar(slot) => usize::from(slot.is_some()),
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Children<'_> {}

impl FusedIterator for Children<'_> {}

impl<'a> IntoIterator for Wrapper<'a> {
    type Item = (Option<Key<'a>>, Wrapper<'a>);
    type IntoIter = Children<'a>;

    fn into_iter(self) -> Children<'a> {
        self.children()
    }
}

impl<'a> IntoIterator for &Wrapper<'a> {
    type Item = (Option<Key<'a>>, Wrapper<'a>);
    type IntoIter = Children<'a>;

    fn into_iter(self) -> Children<'a> {
        self.children()
    }
}
