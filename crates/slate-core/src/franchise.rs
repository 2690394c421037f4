//! The franchise display-name → id mapping.

use std::collections::HashMap;

use crate::{Error, Result, entity::RowId};

/// Every franchise known to the database, keyed by profile title.
///
/// Loaded once before the write transaction opens and then only read; there
/// is no way to add entries after construction.
#[derive(Debug, Clone, Default)]
pub struct FranchiseMap {
  by_name: HashMap<String, RowId>,
}

impl FranchiseMap {
  /// Look up a franchise id by display name.
  pub fn resolve(&self, name: &str) -> Result<RowId> {
    self
      .by_name
      .get(name)
      .copied()
      .ok_or_else(|| Error::UnknownFranchise(name.to_owned()))
  }

  pub fn len(&self) -> usize { self.by_name.len() }

  pub fn is_empty(&self) -> bool { self.by_name.is_empty() }
}

/// Later duplicates of a name replace earlier ones.
impl FromIterator<(String, RowId)> for FranchiseMap {
  fn from_iter<I: IntoIterator<Item = (String, RowId)>>(iter: I) -> Self {
    Self { by_name: iter.into_iter().collect() }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolves_known_names() {
    let map: FranchiseMap =
      [("Alpha".to_owned(), 10), ("Beta".to_owned(), 11)].into_iter().collect();
    assert_eq!(map.len(), 2);
    assert_eq!(map.resolve("Alpha").unwrap(), 10);
    assert_eq!(map.resolve("Beta").unwrap(), 11);
  }

  #[test]
  fn unknown_name_is_an_error() {
    let map: FranchiseMap = [("Alpha".to_owned(), 10)].into_iter().collect();
    let err = map.resolve("alpha").unwrap_err();
    assert!(matches!(err, Error::UnknownFranchise(ref n) if n == "alpha"));
  }

  #[test]
  fn last_duplicate_wins() {
    let map: FranchiseMap =
      [("Alpha".to_owned(), 1), ("Alpha".to_owned(), 2)].into_iter().collect();
    assert_eq!(map.len(), 1);
    assert_eq!(map.resolve("Alpha").unwrap(), 2);
  }
}
