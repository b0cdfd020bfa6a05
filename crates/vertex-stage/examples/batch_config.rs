//! Batch config — load a JSON batch description (or write a default one) and
//! evaluate a small vertex buffer against it.
//!
//! Usage: `cargo run --example batch_config -- [path/to/batch.json]`

use std::path::PathBuf;

use vertex_stage::prelude::*;

fn main() {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("vertex-stage-batch.json"));

    if !path.exists() {
        let default = BatchConfig {
            skinning: SkinningConfig::rigid(
                Transform::from_xyz(0.0, 0.0, -5.0).matrix(),
                Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0),
            ),
            point: PointConfig::points(10.0).with_range(1.0, 20.0),
        };
        if let Err(e) = default.save_to_file(&path) {
            log::error!("could not write '{}': {e}", path.display());
            return;
        }
        log::info!("wrote default batch config to '{}'", path.display());
    }

    let stage = match BatchConfig::from_file(&path) {
        Ok(config) => config.into_stage(),
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };

    let raw: Vec<SkinnedVertex> = [
        VertexInput::at(-1.0, -1.0, 0.0),
        VertexInput::at(1.0, -1.0, 0.0),
        VertexInput::at(0.0, 1.0, 0.0),
    ]
    .iter()
    .map(SkinnedVertex::from)
    .collect();

    match stage.evaluate_bytes(bytemuck::cast_slice(&raw[..])) {
        Ok(outputs) => {
            for out in outputs {
                log::info!("clip {} size {}", out.clip_position, out.point_size);
            }
        }
        Err(e) => log::error!("{e}"),
    }
}
