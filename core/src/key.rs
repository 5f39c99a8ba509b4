//! Ordered keys for attribute indices.
//!
//! An [`IndexKey`] is the comparable form of an attribute value. Keys of
//! different kinds order by tag first (`Bool < number < Text`), then within
//! the tag. Integers and floats share one numeric ordering: integers are kept
//! exactly as `i128` and compared against floats by value, so no two distinct
//! integers ever collapse onto the same key.

use std::cmp::Ordering;
use std::fmt;

/// A cross-type comparable attribute key.
#[derive(Debug, Clone)]
pub enum IndexKey {
    /// Boolean key, `false < true`.
    Bool(bool),
    /// Exact integer key.
    Int(i128),
    /// Floating-point key, totally ordered (`NaN` sorts past the infinities).
    Float(f64),
    /// String key, lexicographic.
    Text(String),
}

impl IndexKey {
    fn tag(&self) -> u8 {
        match self {
            IndexKey::Bool(_) => 0,
            IndexKey::Int(_) | IndexKey::Float(_) => 1,
            IndexKey::Text(_) => 2,
        }
    }

    /// Returns the type name of this key.
    pub fn type_name(&self) -> &'static str {
        match self {
            IndexKey::Bool(_) => "Bool",
            IndexKey::Int(_) => "Int",
            IndexKey::Float(_) => "Float",
            IndexKey::Text(_) => "Text",
        }
    }
}

/// Compare floats by `total_cmp`, except that `-0.0` and `0.0` are equal.
fn cmp_floats(a: f64, b: f64) -> Ordering {
    if a == b {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

/// Exact comparison of an integer with a float.
fn cmp_int_float(i: i128, f: f64) -> Ordering {
    // 2^127 as f64; every finite float below it in magnitude truncates to an i128
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

    if f.is_nan() {
        return if f.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    let whole = f.trunc();
    if whole >= LIMIT {
        return Ordering::Less;
    }
    if whole < -LIMIT {
        return Ordering::Greater;
    }
    match i.cmp(&(whole as i128)) {
        Ordering::Equal => {
            let frac = f - whole;
            if frac > 0.0 {
                Ordering::Less
            } else if frac < 0.0 {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }
        ordering => ordering,
    }
}

impl PartialEq for IndexKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for IndexKey {}

impl PartialOrd for IndexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (IndexKey::Bool(a), IndexKey::Bool(b)) => a.cmp(b),
            (IndexKey::Int(a), IndexKey::Int(b)) => a.cmp(b),
            (IndexKey::Float(a), IndexKey::Float(b)) => cmp_floats(*a, *b),
            (IndexKey::Int(a), IndexKey::Float(b)) => cmp_int_float(*a, *b),
            (IndexKey::Float(a), IndexKey::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (IndexKey::Text(a), IndexKey::Text(b)) => a.cmp(b),
            _ => self.tag().cmp(&other.tag()),
        }
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKey::Bool(b) => write!(f, "{}", b),
            IndexKey::Int(n) => write!(f, "{}", n),
            IndexKey::Float(n) => write!(f, "{}", n),
            IndexKey::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Attribute types that can be placed in an ordered attribute index.
pub trait Indexable: crate::AttributeType {
    /// The comparable key for this value.
    fn index_key(&self) -> IndexKey;
}

/// Numeric attribute types, the only ones accepted by range queries.
pub trait Numeric: Indexable {}

impl Indexable for bool {
    fn index_key(&self) -> IndexKey {
        IndexKey::Bool(*self)
    }
}

impl Indexable for String {
    fn index_key(&self) -> IndexKey {
        IndexKey::Text(self.clone())
    }
}

impl Indexable for &'static str {
    fn index_key(&self) -> IndexKey {
        IndexKey::Text((*self).to_string())
    }
}

macro_rules! int_keys {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Indexable for $ty {
                fn index_key(&self) -> IndexKey {
                    IndexKey::Int(i128::from(*self))
                }
            }

            impl Numeric for $ty {}
        )+
    };
}

macro_rules! float_keys {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Indexable for $ty {
                fn index_key(&self) -> IndexKey {
                    IndexKey::Float(f64::from(*self))
                }
            }

            impl Numeric for $ty {}
        )+
    };
}

int_keys!(i8, i16, i32, i64, u8, u16, u32, u64);
float_keys!(f32, f64);

// `From` is not implemented from the pointer-sized integers
impl Indexable for isize {
    fn index_key(&self) -> IndexKey {
        IndexKey::Int(*self as i128)
    }
}

impl Numeric for isize {}

impl Indexable for usize {
    fn index_key(&self) -> IndexKey {
        IndexKey::Int(*self as i128)
    }
}

impl Numeric for usize {}
