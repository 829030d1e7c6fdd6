use super::*;

// ============================================================================
// Create / lookup / release lifecycle
// ============================================================================

#[test]
fn test_create_then_lookup_shares_one_list() {
    let mut cache = LodCache::new();

    let created = cache.create("robot", 3);
    assert_eq!(cache.ref_count(created), 1);

    let found = cache.lookup("robot").unwrap();
    assert_eq!(found, created);
    assert_eq!(cache.ref_count(created), 2);
}

#[test]
fn test_release_to_zero_destroys_exactly_once() {
    let mut cache = LodCache::new();
    let key = cache.create("robot", 3);
    let key2 = cache.lookup("robot").unwrap();

    assert_eq!(cache.release(key), 1);
    assert_eq!(cache.release(key2), 0);

    // Gone: lookup misses, the key is dead, further releases are inert
    assert!(cache.lookup("robot").is_none());
    assert_eq!(cache.ref_count(key), 0);
    assert_eq!(cache.release(key), 0);
    assert!(cache.is_empty());
}

#[test]
fn test_lookup_miss_is_silent_none() {
    let mut cache = LodCache::new();
    assert!(cache.lookup("ghost").is_none());
}

#[test]
fn test_names_are_case_sensitive() {
    let mut cache = LodCache::new();
    let lower = cache.create("robot", 1);
    assert!(cache.lookup("Robot").is_none());
    assert_eq!(cache.lookup("robot"), Some(lower));
}

// ============================================================================
// Name collisions
// ============================================================================

#[test]
fn test_colliding_create_gets_uid_suffix() {
    let mut cache = LodCache::new();
    let first = cache.create("tree", 1);
    let second = cache.create("tree", 1);

    assert_ne!(first, second);
    assert_eq!(cache.name_of(first), Some("tree"));
    let second_name = cache.name_of(second).unwrap().to_string();
    assert!(second_name.starts_with("tree"));
    assert_ne!(second_name, "tree");

    // The suffixed name is registered and reachable
    assert_eq!(cache.lookup(&second_name), Some(second));
}

// ============================================================================
// Destroy
// ============================================================================

#[test]
fn test_destroy_unconditionally_removes() {
    let mut cache = LodCache::new();
    let key = cache.create("car", 2);
    cache.add_ref(key);

    assert!(cache.destroy(key));
    assert!(cache.lookup("car").is_none());
    assert!(!cache.destroy(key), "second destroy reports absence");
}

// ============================================================================
// List access
// ============================================================================

#[test]
fn test_get_mut_allows_filling_levels() {
    use std::sync::Arc;
    use crate::lod::ViewLod;
    use crate::renderer::MockMeshBuilder;

    let mut cache = LodCache::new();
    let key = cache.create("house", 2);

    let list = cache.get_mut(key).unwrap();
    list.push_back(ViewLod::with_estimated_stats(Arc::new(MockMeshBuilder::new()), 4))
        .unwrap();
    list.push_back(ViewLod::with_estimated_stats(Arc::new(MockMeshBuilder::new()), 16))
        .unwrap();

    assert_eq!(cache.get(key).unwrap().len(), 2);
}
