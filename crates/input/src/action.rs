/// A one-shot viewer command.
///
/// Held keys drive the camera continuously through [`crate::InputState`];
/// actions fire once per key release or wheel notch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Advance the texture sampler: point, linear, anisotropic, wrapping.
    CycleSampler,
    /// Start or stop the constant-rate spin of animated objects.
    ToggleRotation,
    /// Enable or disable tangent-space normal mapping on shaded materials.
    ToggleNormalMap,
    /// Show or hide the partial-coverage fire effect.
    ToggleFireFx,
    /// Narrow the field of view by one wheel step.
    ZoomIn,
    /// Widen the field of view by one wheel step.
    ZoomOut,
    /// Log the key and mouse bindings.
    PrintControls,
}

impl Action {
    /// Wheel action for a vertical scroll amount, if any.
    pub fn from_wheel(delta_y: f32) -> Option<Self> {
        if delta_y > 0.0 {
            Some(Self::ZoomIn)
        } else if delta_y < 0.0 {
            Some(Self::ZoomOut)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_up_zooms_in() {
        assert_eq!(Action::from_wheel(1.0), Some(Action::ZoomIn));
    }

    #[test]
    fn wheel_down_zooms_out() {
        assert_eq!(Action::from_wheel(-2.5), Some(Action::ZoomOut));
    }

    #[test]
    fn no_wheel_no_action() {
        assert_eq!(Action::from_wheel(0.0), None);
    }
}
