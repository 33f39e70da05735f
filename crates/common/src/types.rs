use serde::{Deserialize, Serialize};

/// Linear RGBA colour used to clear the back buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ClearColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for ClearColor {
    /// Cornflower blue.
    fn default() -> Self {
        Self::new(0.39, 0.59, 0.93, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_cornflower_blue() {
        let c = ClearColor::default();
        assert_eq!(c.to_array(), [0.39, 0.59, 0.93, 1.0]);
    }

    #[test]
    fn clear_color_from_yaml_map() {
        let c: ClearColor = serde_yaml::from_str("{ r: 0.0, g: 0.5, b: 1.0, a: 1.0 }").unwrap();
        assert_eq!(c, ClearColor::new(0.0, 0.5, 1.0, 1.0));
    }
}
