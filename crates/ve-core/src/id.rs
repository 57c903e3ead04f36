use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Registry keys seen so far, shared by every document in the process.
static COMPONENT_KEYS: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Which registered component a block renders (`"text"`, `"button"`, ...).
///
/// Blocks are cloned into every history snapshot, so the key is interned
/// and copies as 4 bytes. The core never checks that a key resolves in the
/// host's registry; a missing component is a rendering-time concern.
///
/// ```
/// use ve_core::ComponentKey;
///
/// let button = ComponentKey::from("button");
/// assert_eq!(button, ComponentKey::intern("button"));
/// assert_eq!(button, "button");
/// assert_eq!(serde_json::to_string(&button).unwrap(), "\"button\"");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentKey(Spur);

impl ComponentKey {
    pub fn intern(key: &str) -> Self {
        ComponentKey(COMPONENT_KEYS.get_or_intern(key))
    }

    /// The registry key. Outlives any block holding it.
    pub fn as_str(&self) -> &'static str {
        COMPONENT_KEYS.resolve(&self.0)
    }
}

impl From<&str> for ComponentKey {
    fn from(key: &str) -> Self {
        ComponentKey::intern(key)
    }
}

impl PartialEq<str> for ComponentKey {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ComponentKey {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Debug for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.as_str())
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ComponentKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ComponentKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(ComponentKey::intern(&key))
    }
}
