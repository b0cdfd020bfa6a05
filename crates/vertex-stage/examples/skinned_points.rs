//! Skinned points — bend a two-bone strip over a few frames and print the
//! resulting clip positions and point sizes.
//!
//! Run with `RUST_LOG=debug` to see batch logging.

use vertex_stage::prelude::*;

const FRAMES: usize = 4;

fn main() {
    env_logger::init();

    let camera = Transform::from_xyz(0.0, 1.0, 6.0).looking_at(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
    let view = camera.view_matrix();
    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 16.0 / 9.0, 0.1, 100.0);

    // A vertical strip of points; weights shift from the root bone to the tip bone.
    let vertices: Vec<VertexInput> = (0..=8)
        .map(|i| {
            let t = i as f32 / 8.0;
            VertexInput::at(0.0, 2.0 * t, 0.0)
                .with_bones([1.0 - t, t, 0.0, 0.0], [0, 1, 0, 0])
                .with_point_size(4.0 + 8.0 * t)
        })
        .collect();

    let inverse_bind = [Mat4::IDENTITY, Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0))];
    let mut stage = VertexStage::new(
        SkinningConfig::skinned(2, BonePalette::identity(2), projection),
        PointConfig::points(8.0)
            .with_range(1.0, 32.0)
            .with_attenuation(1.0, 0.0, 0.05)
            .with_vertex_point_size(),
    );

    for frame in 0..FRAMES {
        let bend = frame as f32 / (FRAMES - 1) as f32 * std::f32::consts::FRAC_PI_2;
        let joints = [
            Mat4::IDENTITY,
            Transform::from_xyz(0.0, 1.0, 0.0)
                .with_rotation(Quat::from_rotation_z(bend))
                .matrix(),
        ];
        let palette = match BonePalette::from_skeleton(view, &joints, &inverse_bind) {
            Ok(p) => p,
            Err(e) => {
                log::error!("frame {frame}: {e}");
                return;
            }
        };
        stage.swap_palette(palette);

        if let Err(e) = stage.validate_vertices(&vertices) {
            log::error!("frame {frame}: {e}");
            return;
        }

        log::info!("frame {frame}: bend {:.1}°", bend.to_degrees());
        for (i, out) in stage.evaluate_batch(&vertices).iter().enumerate() {
            let ndc = out.clip_position.truncate() / out.clip_position.w;
            log::info!(
                "  v{i}: ndc ({:+.3}, {:+.3}, {:+.3}) size {:.2}",
                ndc.x,
                ndc.y,
                ndc.z,
                out.point_size
            );
        }
    }
}
