use crate::geom::{PrimitiveError, annulus, cone, cylinder, mesh_volume};

#[test]
fn cylinder_is_closed_genus_zero() {
    let sectors = 32;
    let (mesh, diag) = cylinder(25.0, 200.0, sectors).expect("cylinder");

    mesh.validate().expect("mesh validate");
    assert_eq!(mesh.vertex_count(), 2 * sectors + 2);
    assert_eq!(mesh.triangle_count(), 4 * sectors);
    assert!(diag.is_valid_solid(), "{diag}");
    assert_eq!(diag.euler_characteristic(), 2);
    assert_eq!(diag.welded_vertex_count, 0);
    assert_eq!(diag.flipped_triangle_count, 0);
    assert!(diag.warnings.is_empty(), "{:?}", diag.warnings);

    let bbox = mesh.bbox().expect("bbox");
    assert!((bbox.min.z + 100.0).abs() < 1e-12);
    assert!((bbox.max.z - 100.0).abs() < 1e-12);
    assert!(mesh_volume(&mesh) > 0.0);
}

#[test]
fn cylinder_volume_approaches_analytic() {
    let (mesh, _) = cylinder(10.0, 20.0, 256).expect("cylinder");
    let analytic = std::f64::consts::PI * 100.0 * 20.0;
    let rel = (mesh_volume(&mesh) - analytic).abs() / analytic;
    assert!(rel < 1e-3, "relative error {rel}");
}

#[test]
fn annulus_is_closed_genus_one() {
    let sectors = 64;
    let (mesh, diag) = annulus(42.5, 32.0, 2.0, sectors).expect("annulus");

    mesh.validate().expect("mesh validate");
    assert_eq!(mesh.vertex_count(), 4 * sectors);
    assert_eq!(mesh.triangle_count(), 8 * sectors);
    assert!(diag.is_valid_solid(), "{diag}");
    assert_eq!(diag.euler_characteristic(), 0);
    assert!(diag.warnings.is_empty(), "{:?}", diag.warnings);
    assert!(mesh_volume(&mesh) > 0.0);

    let bbox = mesh.bbox().expect("bbox");
    assert!((bbox.min.z + 1.0).abs() < 1e-12);
    assert!((bbox.max.z - 1.0).abs() < 1e-12);
}

#[test]
fn annulus_inner_wall_normals_face_the_axis() {
    let sectors = 16;
    let (mesh, _) = annulus(10.0, 5.0, 4.0, sectors).expect("annulus");
    let normals = mesh.normals.as_ref().expect("normals");

    // Inner ring vertices follow the two outer rings.
    for i in 2 * sectors..4 * sectors {
        let p = mesh.positions[i];
        let n = normals[i];
        let radial_dot = p[0] * n[0] + p[1] * n[1];
        assert!(radial_dot < 0.0, "inner normal {n:?} at {p:?} points away from the axis");
    }
}

#[test]
fn annulus_rejects_inner_not_inside_outer() {
    assert_eq!(
        annulus(5.0, 5.0, 1.0, 16).expect_err("equal radii"),
        PrimitiveError::InnerNotInsideOuter { inner: 5.0, outer: 5.0 }
    );
    assert!(matches!(
        annulus(5.0, 0.0, 1.0, 16),
        Err(PrimitiveError::InvalidExtent { .. })
    ));
}

#[test]
fn cone_is_closed_with_apex_on_axis() {
    let sectors = 32;
    let (mesh, diag) = cone(32.0, 10.0, sectors).expect("cone");

    assert_eq!(mesh.vertex_count(), sectors + 2);
    assert_eq!(mesh.triangle_count(), 2 * sectors);
    assert!(diag.is_valid_solid());
    assert_eq!(diag.euler_characteristic(), 2);

    let bbox = mesh.bbox().expect("bbox");
    assert!(bbox.min.z.abs() < 1e-12);
    assert!((bbox.max.z - 10.0).abs() < 1e-12);
}

#[test]
fn primitives_need_three_sectors() {
    assert_eq!(cylinder(1.0, 1.0, 2).expect_err("sectors"), PrimitiveError::NotEnoughSectors(2));
    assert_eq!(cone(1.0, 1.0, 0).expect_err("sectors"), PrimitiveError::NotEnoughSectors(0));
}
