//! Cached lists: the serialized project and certificate snapshots.

use serde::Serialize;
use serde::de::DeserializeOwned;

use folio_core::{Certificate, MirrorStore, Project, Result};

/// Mirror key holding the project list.
pub const PROJECTS_KEY: &str = "projects";

/// Mirror key holding the certificate list.
pub const CERTIFICATES_KEY: &str = "certificates";

/// A list type that has a fixed home in the mirror.
pub trait CachedList: Serialize + DeserializeOwned {
    /// Mirror key for lists of this type.
    const KEY: &'static str;
}

impl CachedList for Project {
    const KEY: &'static str = PROJECTS_KEY;
}

impl CachedList for Certificate {
    const KEY: &'static str = CERTIFICATES_KEY;
}

/// Serialize a list for the mirror.
pub fn encode<T: CachedList>(items: &[T]) -> Result<String> {
    Ok(serde_json::to_string(items)?)
}

/// Parse mirrored text; anything unparseable is an empty list.
pub fn decode_or_empty<T: CachedList>(text: Option<&str>) -> Vec<T> {
    let Some(text) = text else {
        return Vec::new();
    };
    match serde_json::from_str(text) {
        Ok(items) => items,
        Err(e) => {
            log::warn!("Cached '{}' list is malformed, treating as empty: {e}", T::KEY);
            Vec::new()
        }
    }
}

/// Read a cached list. Never fails: a missing, unreadable, or malformed
/// entry reads as an empty list.
pub fn read<T: CachedList>(mirror: &dyn MirrorStore) -> Vec<T> {
    match mirror.get(T::KEY) {
        Ok(text) => decode_or_empty(text.as_deref()),
        Err(e) => {
            log::warn!("Mirror read of '{}' failed, treating as empty: {e}", T::KEY);
            Vec::new()
        }
    }
}

/// Replace a cached list with `items`.
pub fn write<T: CachedList>(mirror: &dyn MirrorStore, items: &[T]) -> Result<()> {
    let text = encode(items)?;
    mirror.set(T::KEY, &text)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::MemoryMirror;
    use proptest::prelude::*;

    #[test]
    fn test_absent_reads_empty() {
        let mirror = MemoryMirror::new();
        assert!(read::<Project>(&mirror).is_empty());
    }

    #[test]
    fn test_malformed_reads_empty() {
        let mirror = MemoryMirror::new();
        mirror.set(PROJECTS_KEY, "{not an array").unwrap();
        assert!(read::<Project>(&mirror).is_empty());

        mirror.set(PROJECTS_KEY, "null").unwrap();
        assert!(read::<Project>(&mirror).is_empty());
    }

    #[test]
    fn test_write_then_read_certificates() {
        let mirror = MemoryMirror::new();
        let certs = vec![Certificate::new("a.png"), Certificate::new("b.png")];
        write(&mirror, &certs).unwrap();
        assert_eq!(read::<Certificate>(&mirror), certs);
        assert!(mirror.get(CERTIFICATES_KEY).unwrap().is_some());
    }

    #[test]
    fn test_lists_use_fixed_keys() {
        assert_eq!(<Project as CachedList>::KEY, "projects");
        assert_eq!(<Certificate as CachedList>::KEY, "certificates");
    }

    proptest! {
        #[test]
        fn test_cached_list_roundtrip_preserves_order(
            ids in proptest::collection::vec("[a-z0-9]{1,12}", 0..10),
        ) {
            let projects: Vec<Project> = ids
                .iter()
                .enumerate()
                .map(|(i, id)| Project::new(id.as_str(), format!("Project {i}")))
                .collect();
            let text = encode(&projects).unwrap();
            let decoded: Vec<Project> = decode_or_empty(Some(&text));
            prop_assert_eq!(decoded, projects);
        }
    }
}
