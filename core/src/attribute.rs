//! Type-erased attribute storage.
//!
//! Attributes are the open-ended data carried by tree nodes. Any `'static`
//! type that is `Clone + Debug` can be stored; the concrete type is recorded
//! as an [`AttributeKind`] at insertion and checked again on every typed read.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Types that can be stored as attribute values.
pub trait AttributeType: Any + Clone + fmt::Debug {}

impl<T: Any + Clone + fmt::Debug> AttributeType for T {}

/// Runtime type tag of a stored attribute value.
///
/// Two kinds are equal when they describe the same concrete Rust type; the
/// name is informational only.
#[derive(Debug, Clone, Copy)]
pub struct AttributeKind {
    id: TypeId,
    name: &'static str,
}

impl AttributeKind {
    /// The kind describing `T`.
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Returns true if this kind describes `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// The underlying `TypeId`.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// The Rust type name, e.g. `"i64"` or `"alloc::string::String"`.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for AttributeKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AttributeKind {}

impl Hash for AttributeKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

trait ErasedValue: Any + fmt::Debug {
    fn clone_boxed(&self) -> Box<dyn ErasedValue>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: AttributeType> ErasedValue for T {
    fn clone_boxed(&self) -> Box<dyn ErasedValue> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A boxed attribute value that remembers its concrete type.
pub struct AttributeValue {
    kind: AttributeKind,
    value: Box<dyn ErasedValue>,
}

impl AttributeValue {
    /// Box a value, recording `T` as its kind.
    pub fn new<T: AttributeType>(value: T) -> Self {
        Self {
            kind: AttributeKind::of::<T>(),
            value: Box::new(value),
        }
    }

    /// The recorded type of the stored value.
    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    /// Returns true if the stored value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.kind.is::<T>()
    }

    /// Borrow the value as `T`, or `None` if it holds another type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow the value as `T`, or `None` if it holds another type.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.value.as_any_mut().downcast_mut::<T>()
    }
}

impl Clone for AttributeValue {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            value: self.value.clone_boxed(),
        }
    }
}

impl fmt::Debug for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeValue")
            .field("kind", &self.kind.name)
            .field("value", &self.value)
            .finish()
    }
}
