//! WGSL shader templates for the GPU backend
//!
//! - `life_step`: one generation of B3/S23 over a 2D thread grid

pub mod life_step;

pub use life_step::{LIFE_STEP_TEMPLATE, WORKGROUP_SIZE_TOKEN};

/// Instantiate a template for a square workgroup of `side × side` threads
pub fn render(template: &str, side: u32) -> String {
    template.replace(WORKGROUP_SIZE_TOKEN, &side.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_workgroup() {
        let src = render(LIFE_STEP_TEMPLATE, 8);
        assert!(src.contains("@workgroup_size(8, 8, 1)"));
        assert!(!src.contains(WORKGROUP_SIZE_TOKEN));
    }
}
