//! End-to-end: JSON batch config → vertex stage → clip positions and sizes.

use vertex_stage::prelude::*;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Two-bone arm: bone 0 at the origin, bone 1 bent 90° about Z at (0, 1, 0).
fn arm_config_json(view: Mat4) -> String {
    let shoulder = Mat4::IDENTITY;
    let elbow = Transform::from_xyz(0.0, 1.0, 0.0)
        .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2))
        .matrix();
    let inverse_bind = [Mat4::IDENTITY, Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0))];
    let palette = BonePalette::from_skeleton(view, &[shoulder, elbow], &inverse_bind).unwrap();

    let config = BatchConfig {
        skinning: SkinningConfig::skinned(2, palette, Mat4::perspective_rh(1.2, 1.0, 0.1, 50.0)),
        point: PointConfig::points(12.0)
            .with_range(2.0, 24.0)
            .with_attenuation(1.0, 0.0, 0.02),
    };
    config.to_json().unwrap()
}

#[test]
fn json_config_drives_skinned_point_batch() {
    init_logger();
    let view = Transform::from_xyz(0.0, 1.0, 10.0).view_matrix();
    let stage = BatchConfig::from_json(&arm_config_json(view)).unwrap().into_stage();

    let vertices = [
        // Fully on the shoulder.
        VertexInput::at(0.0, 0.5, 0.0).with_bones([1.0, 0.0, 0.0, 0.0], [0, 1, 0, 0]),
        // Fully on the elbow: (0, 2, 0) in bind pose swings to (-1, 1, 0).
        VertexInput::at(0.0, 2.0, 0.0).with_bones([0.0, 1.0, 0.0, 0.0], [0, 1, 0, 0]),
        // Half and half, influences listed in the other order.
        VertexInput::at(0.0, 2.0, 0.0).with_bones([0.5, 0.5, 0.0, 0.0], [1, 0, 0, 0]),
    ];
    stage.validate_vertices(&vertices).unwrap();
    let out = stage.evaluate_batch(&vertices);

    let expect_eye = |world: Vec3| view * world.extend(1.0);
    let close = |a: Vec4, b: Vec4| (a - b).abs().max_element() < 1e-4;

    assert!(close(out[0].eye_position, expect_eye(Vec3::new(0.0, 0.5, 0.0))));
    assert!(close(out[1].eye_position, expect_eye(Vec3::new(-1.0, 1.0, 0.0))));
    assert!(close(out[2].eye_position, expect_eye(Vec3::new(-0.5, 1.5, 0.0))));

    for o in &out {
        assert_eq!(o.clip_position, stage.skinning.projection_matrix * o.eye_position);
        assert!((2.0..=24.0).contains(&o.point_size));
        // Vertices are ~10 units out: sqrt(1 + 0.02 * 100) ≈ 1.73.
        assert!(o.point_size < 12.0 && o.point_size > 6.0, "size {}", o.point_size);
    }
}

#[test]
fn raw_vertex_buffer_matches_decoded_batch() {
    init_logger();
    let stage = BatchConfig::from_json(&arm_config_json(Mat4::IDENTITY)).unwrap().into_stage();
    let vertices: Vec<VertexInput> = (0..64)
        .map(|i| {
            let w = i as f32 / 63.0;
            VertexInput::at(0.0, i as f32 / 32.0, 0.0).with_bones([1.0 - w, w, 0.0, 0.0], [0, 1, 0, 0])
        })
        .collect();
    let raw: Vec<SkinnedVertex> = vertices.iter().map(SkinnedVertex::from).collect();

    let from_bytes = stage.evaluate_bytes(bytemuck::cast_slice(&raw[..])).unwrap();
    assert_eq!(from_bytes, stage.evaluate_batch(&vertices));
}

#[test]
fn rigid_batch_without_points_reports_unit_size() {
    init_logger();
    let json = r#"{ "skinning": { "model_view_matrix": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,-5,1] } }"#;
    let stage = BatchConfig::from_json(json).unwrap().into_stage();
    let out = stage.evaluate_batch(&[VertexInput::at(1.0, 2.0, 3.0)]);
    assert_eq!(out[0].eye_position, Vec4::new(1.0, 2.0, -2.0, 1.0));
    assert_eq!(out[0].point_size, 1.0);
}
