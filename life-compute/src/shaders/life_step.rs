//! Life step shader - one thread per cell, 2D dispatch
//!
//! Reads `current_gen`, writes `next_gen`. The two bindings are always
//! distinct buffers, so no invocation can observe another's write.

pub const WORKGROUP_SIZE_TOKEN: &str = "{{WORKGROUP_SIZE}}";

pub const LIFE_STEP_TEMPLATE: &str = r#"
struct Params {
    width: u32,
    height: u32,
    boundary: u32,
    _pad: u32,
}

const BOUNDARY_TOROIDAL: u32 = 1u;

@group(0) @binding(0) var<storage, read> current_gen: array<u32>;
@group(0) @binding(1) var<storage, read_write> next_gen: array<u32>;
@group(0) @binding(2) var<uniform> params: Params;

fn alive_at(row: i32, col: i32) -> u32 {
    let h = i32(params.height);
    let w = i32(params.width);
    var r = row;
    var c = col;
    if params.boundary == BOUNDARY_TOROIDAL {
        r = (r + h) % h;
        c = (c + w) % w;
    } else if r < 0 || r >= h || c < 0 || c >= w {
        return 0u;
    }
    return select(0u, 1u, current_gen[u32(r) * params.width + u32(c)] != 0u);
}

@compute @workgroup_size({{WORKGROUP_SIZE}}, {{WORKGROUP_SIZE}}, 1)
fn main(@builtin(global_invocation_id) id: vec3<u32>) {
    let col = id.x;
    let row = id.y;
    if col >= params.width || row >= params.height {
        return;
    }

    let r = i32(row);
    let c = i32(col);
    let n = alive_at(r - 1, c - 1) + alive_at(r - 1, c) + alive_at(r - 1, c + 1)
          + alive_at(r, c - 1) + alive_at(r, c + 1)
          + alive_at(r + 1, c - 1) + alive_at(r + 1, c) + alive_at(r + 1, c + 1);

    let idx = row * params.width + col;
    let alive = current_gen[idx] != 0u;
    // B3/S23
    let survives = alive && (n == 2u || n == 3u);
    let born = !alive && n == 3u;
    next_gen[idx] = select(0u, 1u, survives || born);
}
"#;
