use super::*;

// ============================================================================
// Capacity and ordering
// ============================================================================

#[test]
fn test_push_preserves_order() {
    let mut list = LodList::with_capacity(3);
    list.push_back("coarse").unwrap();
    list.push_back("medium").unwrap();
    list.push_back("fine").unwrap();

    assert_eq!(list.len(), 3);
    assert_eq!(list.get(0), Some(&"coarse"));
    assert_eq!(list.get(1), Some(&"medium"));
    assert_eq!(list.get(2), Some(&"fine"));
}

#[test]
fn test_push_past_capacity_fails() {
    let mut list = LodList::with_capacity(1);
    list.push_back(1).unwrap();
    assert!(list.push_back(2).is_err());
    assert_eq!(list.len(), 1);
}

#[test]
fn test_pop_back_returns_finest() {
    let mut list = LodList::with_capacity(2);
    list.push_back(10).unwrap();
    list.push_back(20).unwrap();

    assert_eq!(list.pop_back(), Some(20));
    assert_eq!(list.pop_back(), Some(10));
    assert_eq!(list.pop_back(), None);
    assert!(list.is_empty());
}

#[test]
fn test_out_of_range_get_is_none() {
    let list: LodList<i32> = LodList::with_capacity(4);
    assert_eq!(list.get(0), None);
    assert_eq!(list.capacity(), 4);
}
