use std::sync::Arc;

use super::*;
use crate::lod::LodObject;
use crate::renderer::{MeshBuilder, MockMeshBuilder};

fn builder() -> Arc<dyn MeshBuilder> {
    Arc::new(MockMeshBuilder::new())
}

// ============================================================================
// Statistics
// ============================================================================

#[test]
fn test_explicit_stats() {
    let lod = ViewLod::new(builder(), 100, 60, 0.01);
    assert_eq!(lod.num_polys(), 100);
    assert_eq!(lod.num_verts(), 60);
    assert_eq!(lod.avg_poly_area(), 0.01);
    assert_eq!(lod.importance(), 1.0);
}

#[test]
fn test_estimated_stats() {
    let lod = ViewLod::with_estimated_stats(builder(), 10);
    assert_eq!(lod.num_polys(), 10);
    assert_eq!(lod.num_verts(), 20);
    let expected = 2.0 * std::f64::consts::PI * 10.0 / 10.0;
    assert!((lod.avg_poly_area() - expected).abs() < 1e-9);
}

#[test]
fn test_estimated_stats_zero_polys_does_not_divide_by_zero() {
    let lod = ViewLod::with_estimated_stats(builder(), 0);
    assert!(lod.avg_poly_area().is_finite());
}

// ============================================================================
// Flags
// ============================================================================

#[test]
fn test_default_flags() {
    let lod = ViewLod::new(builder(), 1, 3, 1.0);
    assert_eq!(lod.flags(), ViewLodFlags::BIT1 | ViewLodFlags::BIT2);
}

#[test]
fn test_set_and_clear_flags() {
    let mut lod = ViewLod::new(builder(), 1, 3, 1.0);
    lod.set_flags(ViewLodFlags::BIT4);
    assert!(lod.flags().contains(ViewLodFlags::BIT4));

    lod.clear_flags(ViewLodFlags::BIT1 | ViewLodFlags::BIT4);
    assert!(!lod.flags().contains(ViewLodFlags::BIT1));
    assert!(!lod.flags().contains(ViewLodFlags::BIT4));
    assert!(lod.flags().contains(ViewLodFlags::BIT2));
}
