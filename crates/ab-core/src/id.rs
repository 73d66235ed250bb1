use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use uuid::Uuid;

/// Global string interner for board identifiers.
///
/// Entries live for the whole process: every generated id (new elements,
/// pastes, animations) stays interned after its owner is removed.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Stable identifier of a placed element.
///
/// Assigned once when the element is created and never reused. Correlates
/// the element's persisted params, its in-memory model, its canvas node,
/// its sidebar row, and every animation that targets it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubContentId(Spur);

/// Identifier of an animation, generated when the animation model is created.
///
/// Not persisted and not tied to an array position.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationId(Spur);

impl SubContentId {
    /// Intern a string as a SubContentId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        SubContentId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a fresh random (v4 UUID) identifier.
    pub fn generate() -> Self {
        Self::intern(&Uuid::new_v4().to_string())
    }
}

impl AnimationId {
    pub fn intern(s: &str) -> Self {
        AnimationId(INTERNER.get_or_intern(s))
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    pub fn generate() -> Self {
        Self::intern(&Uuid::new_v4().to_string())
    }
}

impl fmt::Debug for SubContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for SubContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{}", self.as_str())
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SubContentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SubContentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(SubContentId::intern(&s))
    }
}

impl Serialize for AnimationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AnimationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(AnimationId::intern(&s))
    }
}
