//! Property paths, path traversal and whole-tree walks.

use std::collections::VecDeque;
use std::fmt;

use crate::error::ProviderError;

use super::PropertyValue;

/// One step of a [`PropertyPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object key.
    Key(String),
    /// An array index.
    Index(usize),
    /// Every element of an array.
    Wildcard,
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A path into a property value, such as `a.b[0]` or `items[*].name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PropertyPath(Vec<PathSegment>);

impl PropertyPath {
    /// The empty path, addressing the root.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// A path made of the given segments.
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    /// The segments of the path.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path addresses the root.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a segment.
    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    /// A copy of this path with one more segment.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }

    /// Parse a path.
    ///
    /// Accepted forms include `x`, `x.y`, `[0]`, `x[0]`, `x[*]`, `x[y]`,
    /// `x[y.z]` and `x[0][y][z]`. Bracketed segments that are not a number
    /// or `*` are object keys.
    pub fn parse(s: &str) -> Result<Self, ProviderError> {
        let mut segments = Vec::new();
        let mut rest = s;
        let mut at_start = true;
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('[') {
                let Some(end) = after.find(']') else {
                    return Err(ProviderError::Malformed(format!(
                        "unterminated '[' in property path '{}'",
                        s
                    )));
                };
                let inner = &after[..end];
                if inner.is_empty() {
                    return Err(ProviderError::Malformed(format!(
                        "empty index in property path '{}'",
                        s
                    )));
                }
                segments.push(bracketed_segment(inner));
                rest = &after[end + 1..];
            } else {
                let body = match rest.strip_prefix('.') {
                    Some(body) if !at_start => body,
                    _ if at_start => rest,
                    _ => {
                        return Err(ProviderError::Malformed(format!(
                            "expected '.' or '[' in property path '{}'",
                            s
                        )))
                    },
                };
                let end = body.find(['.', '[']).unwrap_or(body.len());
                if end == 0 {
                    return Err(ProviderError::Malformed(format!(
                        "empty key in property path '{}'",
                        s
                    )));
                }
                segments.push(PathSegment::Key(body[..end].to_string()));
                rest = &body[end..];
            }
            at_start = false;
        }
        Ok(Self(segments))
    }
}

fn bracketed_segment(inner: &str) -> PathSegment {
    if inner == "*" {
        return PathSegment::Wildcard;
    }
    if inner.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(i) = inner.parse() {
            return PathSegment::Index(i);
        }
    }
    PathSegment::Key(inner.to_string())
}

fn is_simple_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '$')
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if is_simple_key(key) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                },
                PathSegment::Key(key) => write!(f, "[{}]", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
                PathSegment::Wildcard => f.write_str("[*]")?,
            }
        }
        Ok(())
    }
}

impl FromIterator<PathSegment> for PropertyPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Push the value a marker transparently exposes, if any.
///
/// Unknown values expose nothing: their element is only a placeholder.
fn unwrap_marker<'a>(v: &'a PropertyValue, queue: &mut VecDeque<&'a PropertyValue>) -> bool {
    match v {
        PropertyValue::Computed(_) => true,
        PropertyValue::Output(o) => {
            if o.known {
                queue.push_back(&o.element);
            }
            true
        },
        PropertyValue::Secret(e) => {
            queue.push_back(e);
            true
        },
        _ => false,
    }
}

/// Follow `path` from `v`, calling `visitor` on every value encountered.
///
/// Markers along the way are visited and then looked through. Values that
/// cannot take the next segment (a key on an array, an index on a scalar, an
/// unknown value) are dropped silently. The values the path resolves to are
/// visited, along with any markers wrapping them.
pub fn traverse<F>(v: &PropertyValue, path: &PropertyPath, mut visitor: F)
where
    F: FnMut(&PropertyValue),
{
    let mut vals: VecDeque<&PropertyValue> = VecDeque::from([v]);
    for segment in path.segments() {
        let mut next = VecDeque::new();
        while let Some(v) = vals.pop_front() {
            visitor(v);
            if unwrap_marker(v, &mut vals) {
                continue;
            }
            match (v, segment) {
                (PropertyValue::Object(map), PathSegment::Key(key)) => {
                    if let Some(child) = map.get(key) {
                        next.push_back(child);
                    }
                },
                (PropertyValue::Array(items), PathSegment::Index(i)) => {
                    if let Some(child) = items.get(*i) {
                        next.push_back(child);
                    }
                },
                (PropertyValue::Array(items), PathSegment::Wildcard) => next.extend(items.iter()),
                _ => {},
            }
        }
        vals = next;
    }
    while let Some(v) = vals.pop_front() {
        visitor(v);
        unwrap_marker(v, &mut vals);
    }
}

/// The state passed to a [`walk`] visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkState {
    /// True on the pre-order visit, false on the post-order visit.
    pub entering: bool,
    /// False if this value or any ancestor is unknown.
    pub known: bool,
    /// True if this value or any ancestor is secret.
    pub secret: bool,
}

/// Visit every value in the tree depth-first, before and after its children.
///
/// Array elements are visited in order, object entries in key order, and
/// markers are descended into. The state accumulates marker flags from the
/// root down to and including the visited value, without folding.
pub fn walk<F>(v: &PropertyValue, mut visitor: F)
where
    F: FnMut(&PropertyValue, WalkState),
{
    walk_inner(
        v,
        &mut visitor,
        WalkState {
            entering: true,
            known: true,
            secret: false,
        },
    );
}

fn walk_inner<F>(v: &PropertyValue, visitor: &mut F, parent: WalkState)
where
    F: FnMut(&PropertyValue, WalkState),
{
    let mut state = parent;
    match v {
        PropertyValue::Secret(_) => state.secret = true,
        PropertyValue::Computed(_) => state.known = false,
        PropertyValue::Output(o) => {
            state.known = state.known && o.known;
            state.secret = state.secret || o.secret;
        },
        _ => {},
    }

    state.entering = true;
    visitor(v, state);
    match v {
        PropertyValue::Object(map) => {
            for child in map.values() {
                walk_inner(child, visitor, state);
            }
        },
        PropertyValue::Array(items) => {
            for child in items {
                walk_inner(child, visitor, state);
            }
        },
        PropertyValue::Secret(e) | PropertyValue::Computed(e) => walk_inner(e, visitor, state),
        PropertyValue::Output(o) => walk_inner(&o.element, visitor, state),
        _ => {},
    }
    state.entering = false;
    visitor(v, state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Output;

    fn s(v: &str) -> PropertyValue {
        PropertyValue::from(v)
    }

    fn path(segments: Vec<PathSegment>) -> PropertyPath {
        PropertyPath::from_segments(segments)
    }

    #[test]
    fn test_parse() {
        let cases = vec![
            ("x", path(vec!["x".into()])),
            ("x.y", path(vec!["x".into(), "y".into()])),
            ("[0]", path(vec![0.into()])),
            ("x[0]", path(vec!["x".into(), 0.into()])),
            ("x[*]", path(vec!["x".into(), PathSegment::Wildcard])),
            ("x[y]", path(vec!["x".into(), "y".into()])),
            ("x[y.z]", path(vec!["x".into(), "y.z".into()])),
            (
                "x[0][y][z]",
                path(vec!["x".into(), 0.into(), "y".into(), "z".into()]),
            ),
        ];
        for (input, expected) in cases {
            assert_eq!(PropertyPath::parse(input).unwrap(), expected, "{}", input);
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(PropertyPath::parse("x[0").is_err());
        assert!(PropertyPath::parse("x[]").is_err());
        assert!(PropertyPath::parse("x..y").is_err());
        assert!(PropertyPath::parse("x[0]y").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for input in ["x", "x.y", "[0]", "x[0]", "x[*]", "x[y.z]", "x[0].y.z"] {
            let parsed = PropertyPath::parse(input).unwrap();
            assert_eq!(parsed.to_string(), input);
        }
    }

    fn collect(v: &PropertyValue, p: &str) -> Vec<PropertyValue> {
        let mut seen = Vec::new();
        traverse(v, &PropertyPath::parse(p).unwrap(), |v| seen.push(v.clone()));
        seen
    }

    #[test]
    fn test_traverse_object_and_index() {
        let v = PropertyValue::object([(
            "a",
            PropertyValue::array(vec![s("zero"), s("one")]),
        )]);
        let seen = collect(&v, "a[1]");
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2], s("one"));
    }

    #[test]
    fn test_traverse_wildcard_fans_out() {
        let v = PropertyValue::object([(
            "a",
            PropertyValue::array(vec![
                PropertyValue::object([("b", s("x"))]),
                PropertyValue::object([("b", s("y"))]),
            ]),
        )]);
        let seen = collect(&v, "a[*].b");
        assert!(seen.contains(&s("x")));
        assert!(seen.contains(&s("y")));
    }

    #[test]
    fn test_traverse_looks_through_markers() {
        let secret = PropertyValue::secret(PropertyValue::object([("b", s("x"))]));
        let v = PropertyValue::object([("a", secret.clone())]);
        let seen = collect(&v, "a.b");
        assert!(seen.contains(&secret));
        assert_eq!(seen.last(), Some(&s("x")));
    }

    #[test]
    fn test_traverse_stops_at_unknowns() {
        let computed = PropertyValue::computed(PropertyValue::object([("b", s("x"))]));
        let v = PropertyValue::object([("a", computed.clone())]);
        let seen = collect(&v, "a.b");
        assert_eq!(seen.last(), Some(&computed));
        assert!(!seen.contains(&s("x")));

        let unknown = PropertyValue::Output(Output::unknown(s("x")));
        let v = PropertyValue::object([("a", unknown.clone())]);
        assert_eq!(collect(&v, "a").last(), Some(&unknown));
    }

    #[test]
    fn test_traverse_drops_unsupported_segments() {
        let v = PropertyValue::object([("a", s("scalar"))]);
        assert_eq!(collect(&v, "a[0]").len(), 2);
        assert_eq!(collect(&v, "missing").len(), 1);
        let v = PropertyValue::object([("a", PropertyValue::object([("k", s("x"))]))]);
        assert_eq!(collect(&v, "a[*]").len(), 2);
    }

    #[test]
    fn test_walk_visits_every_node_twice() {
        let v = PropertyValue::object([
            ("a", s("x")),
            ("b", PropertyValue::array(vec![s("y"), s("z")])),
        ]);
        let mut entries = 0;
        let mut exits = 0;
        walk(&v, |_, state| {
            if state.entering {
                entries += 1;
            } else {
                exits += 1;
            }
        });
        assert_eq!(entries, 5);
        assert_eq!(exits, 5);
    }

    #[test]
    fn test_walk_accumulates_state() {
        let v = PropertyValue::object([
            ("plain", s("p")),
            ("secret", PropertyValue::secret(s("s"))),
            (
                "unknown",
                PropertyValue::Output(Output::unknown(PropertyValue::array(vec![s("u")]))),
            ),
        ]);
        let mut states = Vec::new();
        walk(&v, |v, state| {
            if state.entering {
                if let PropertyValue::String(s) = v {
                    states.push((s.clone(), state.known, state.secret));
                }
            }
        });
        assert_eq!(
            states,
            vec![
                ("p".to_string(), true, false),
                ("s".to_string(), true, true),
                ("u".to_string(), false, false),
            ]
        );
    }
}
