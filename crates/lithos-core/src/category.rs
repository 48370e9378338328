use crate::constants::{MAX_CATEGORIES, VOID_NAME};
use crate::error::LithosError;
use crate::types::CategoryId;

/// Interning table for category names, built once per loaded configuration.
///
/// Names are stored sorted byte-wise, and each handle is the position of its
/// name, so iterating handles in numeric order walks names in lexicographic
/// order. Sampling relies on this to keep cumulative distributions identical
/// across every consumer of the same configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    names: Vec<String>,
    void: CategoryId,
}

impl CategoryTable {
    /// Build a table from category names. `"void"` is always included;
    /// duplicates collapse to one entry.
    pub fn new<I, S>(names: I) -> Result<Self, LithosError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.push(VOID_NAME.to_string());
        names.sort();
        names.dedup();

        if names.len() > MAX_CATEGORIES {
            return Err(LithosError::ConfigUnavailable(format!(
                "{} categories exceed the limit of {MAX_CATEGORIES}",
                names.len()
            )));
        }

        let void = names
            .binary_search_by(|n| n.as_str().cmp(VOID_NAME))
            .map(|i| CategoryId(i as u16))
            .map_err(|_| LithosError::ConfigUnavailable("void category missing".into()))?;

        Ok(Self { names, void })
    }

    /// Handle of the reserved void category.
    pub fn void(&self) -> CategoryId {
        self.void
    }

    /// Resolve a name to its handle. Exact-string match.
    pub fn id(&self, name: &str) -> Option<CategoryId> {
        self.names
            .binary_search_by(|n| n.as_str().cmp(name))
            .ok()
            .map(|i| CategoryId(i as u16))
    }

    /// Name for a handle, or None if the handle is not from this table.
    pub fn name(&self, id: CategoryId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Name for a handle; foreign handles render as void.
    pub fn name_or_void(&self, id: CategoryId) -> &str {
        self.name(id).unwrap_or(VOID_NAME)
    }

    pub fn is_void(&self, id: CategoryId) -> bool {
        id == self.void
    }

    /// Iterate `(handle, name)` pairs in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (CategoryId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| (CategoryId(i as u16), n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Never true: void is always present.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
