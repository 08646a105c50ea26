//! Marker folding and deep equality.

use super::{Output, PropertyMap, PropertyValue, Urn};

/// Options for [`deep_equals_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EqualityOptions {
    /// Also require equal dependency sets at every folded marker.
    ///
    /// Dependencies record provenance rather than content, so they are
    /// ignored by default.
    pub compare_dependencies: bool,
}

impl EqualityOptions {
    /// Create the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether dependencies take part in the comparison.
    pub fn with_compare_dependencies(mut self, compare: bool) -> Self {
        self.compare_dependencies = compare;
        self
    }
}

/// The marker state accumulated while descending through nested markers.
struct Folded<'a> {
    inner: &'a PropertyValue,
    known: bool,
    secret: bool,
    dependencies: Vec<Urn>,
}

impl Folded<'_> {
    fn is_marked(&self) -> bool {
        !self.known || self.secret
    }
}

fn fold(mut v: &PropertyValue, collect_dependencies: bool) -> Folded<'_> {
    let mut known = true;
    let mut secret = false;
    let mut dependencies = Vec::new();
    loop {
        match v {
            PropertyValue::Secret(e) => {
                secret = true;
                v = &**e;
            },
            PropertyValue::Computed(e) => {
                known = false;
                v = &**e;
            },
            PropertyValue::Output(o) => {
                known = known && o.known;
                secret = secret || o.secret;
                if collect_dependencies {
                    dependencies.extend(o.dependencies.iter().cloned());
                }
                v = &*o.element;
            },
            _ => break,
        }
    }
    dependencies.sort();
    dependencies.dedup();
    Folded {
        inner: v,
        known,
        secret,
        dependencies,
    }
}

/// Collapse any stack of secret, computed and output markers at the top of
/// `v` into a single canonical form.
///
/// Known-ness is the conjunction and secret-ness the disjunction of every
/// marker passed through. The result is the bare inner value when it is
/// known and not secret, otherwise an [`Output`] holding the inner value.
/// Dependencies are dropped; see [`fold_with_dependencies`].
pub fn fold_output_value(v: &PropertyValue) -> PropertyValue {
    let folded = fold(v, false);
    if !folded.is_marked() {
        return folded.inner.clone();
    }
    PropertyValue::Output(
        Output::new(folded.inner.clone())
            .with_known(folded.known)
            .with_secret(folded.secret),
    )
}

/// Like [`fold_output_value`], but also unions the dependencies of every
/// output marker passed through, sorted and deduplicated.
///
/// A value with dependencies stays an [`Output`] even when it is known and
/// not secret.
pub fn fold_with_dependencies(v: &PropertyValue) -> PropertyValue {
    let folded = fold(v, true);
    if !folded.is_marked() && folded.dependencies.is_empty() {
        return folded.inner.clone();
    }
    PropertyValue::Output(
        Output::new(folded.inner.clone())
            .with_known(folded.known)
            .with_secret(folded.secret)
            .with_dependencies(folded.dependencies),
    )
}

/// Compare two values for equality after folding their markers.
///
/// `Secret(Computed(x))` equals `Computed(Secret(x))`. Dependencies are not
/// compared. NaN equals NaN.
pub fn deep_equals(a: &PropertyValue, b: &PropertyValue) -> bool {
    deep_equals_with(a, b, EqualityOptions::default())
}

/// Compare two values for equality after folding their markers, with options.
pub fn deep_equals_with(a: &PropertyValue, b: &PropertyValue, opts: EqualityOptions) -> bool {
    let a = fold(a, opts.compare_dependencies);
    let b = fold(b, opts.compare_dependencies);

    if a.is_marked() != b.is_marked() || a.known != b.known || a.secret != b.secret {
        return false;
    }
    if opts.compare_dependencies && a.dependencies != b.dependencies {
        return false;
    }

    match (a.inner, b.inner) {
        (PropertyValue::Array(a), PropertyValue::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| deep_equals_with(a, b, opts))
        },
        (PropertyValue::Object(a), PropertyValue::Object(b)) => objects_equal(a, b, opts),
        (PropertyValue::Null, PropertyValue::Null) => true,
        (PropertyValue::Bool(a), PropertyValue::Bool(b)) => a == b,
        (PropertyValue::Number(a), PropertyValue::Number(b)) => {
            a == b || (a.is_nan() && b.is_nan())
        },
        (PropertyValue::String(a), PropertyValue::String(b)) => a == b,
        (PropertyValue::ResourceReference(a), PropertyValue::ResourceReference(b)) => a == b,
        (PropertyValue::Asset(a), PropertyValue::Asset(b)) => a == b,
        (PropertyValue::Archive(a), PropertyValue::Archive(b)) => a == b,
        _ => false,
    }
}

fn objects_equal(a: &PropertyMap, b: &PropertyMap, opts: EqualityOptions) -> bool {
    a.len() == b.len()
        && a.iter().all(|(k, av)| {
            b.get(k)
                .map(|bv| deep_equals_with(av, bv, opts))
                .unwrap_or(false)
        })
}
