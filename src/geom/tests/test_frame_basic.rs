use crate::geom::{Helix, PathFrame, Point3, Vec3, frame_field};

fn assert_orthonormal(frame: &PathFrame) {
    let eps = 1e-6;
    assert!((frame.tangent.length() - 1.0).abs() < eps);
    assert!((frame.normal.length() - 1.0).abs() < eps);
    assert!((frame.binormal.length() - 1.0).abs() < eps);
    assert!(frame.tangent.dot(frame.normal).abs() < eps);
    assert!(frame.tangent.dot(frame.binormal).abs() < eps);
    assert!(frame.normal.dot(frame.binormal).abs() < eps);

    let b = frame.tangent.cross(frame.normal);
    assert!((b - frame.binormal).length() < eps);
}

#[test]
fn helix_frames_are_orthonormal() {
    let path = Helix::new(35.0, 0.0, 180.0, 6.5)
        .expect("helix")
        .sample(200)
        .expect("samples");
    let field = frame_field(&path).expect("frames");

    assert_eq!(field.len(), path.len());
    assert!(field.warnings.is_empty());
    for frame in field.iter() {
        assert_orthonormal(frame);
    }
}

#[test]
fn vertical_line_uses_world_x_seed() {
    let path = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(0.0, 0.0, 2.0),
    ];
    let field = frame_field(&path).expect("frames");

    for frame in field.iter() {
        assert_orthonormal(frame);
        assert_eq!(frame.tangent, Vec3::Z);
        assert_eq!(frame.normal, Vec3::X);
        assert_eq!(frame.binormal, Vec3::Y);
    }
}

#[test]
fn last_tangent_repeats_previous() {
    let path = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
    ];
    let field = frame_field(&path).expect("frames");

    assert_eq!(field.frames[0].tangent, Vec3::X);
    assert_eq!(field.frames[1].tangent, Vec3::Y);
    assert_eq!(field.frames[2].tangent, Vec3::Y);
}

#[test]
fn zero_length_segment_reuses_tangent_with_warning() {
    let path = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
    ];
    let field = frame_field(&path).expect("frames");

    assert_eq!(field.frames[1].tangent, Vec3::X);
    assert_eq!(field.warnings.len(), 1);
    assert!(field.warnings[0].contains("degenerate segment"));
    for frame in field.iter() {
        assert_orthonormal(frame);
    }
}

#[test]
fn frames_are_deterministic() {
    let path = Helix::new(20.0, 5.0, 50.0, 3.0)
        .expect("helix")
        .sample(64)
        .expect("samples");
    let a = frame_field(&path).expect("frames");
    let b = frame_field(&path).expect("frames");
    assert_eq!(a.frames, b.frames);
}

#[test]
fn normal_reseeds_when_path_turns_along_previous_normal() {
    // Horizontal along X gives normal = X × Z = -Y; turning onto -Y makes the
    // transported normal parallel to the new tangent.
    let path = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, -1.0, 0.0),
    ];
    let field = frame_field(&path).expect("frames");

    assert_eq!(field.frames[0].normal, Vec3::new(0.0, -1.0, 0.0));
    assert!(field.warnings.iter().any(|w| w.contains("reseeded")));
    for frame in field.iter() {
        assert_orthonormal(frame);
    }
}
