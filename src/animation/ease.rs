/// Timing curve applied to a tween's progress.
///
/// Morphs between containers use [`Ease::InOutQuad`]; opacity ramps run
/// [`Ease::Linear`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    /// Constant speed.
    Linear,
    /// Quadratic ease in, then ease out.
    #[default]
    InOutQuad,
}

impl Ease {
    /// Map time progress to value progress; input is clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InOutQuad if t < 0.5 => 2.0 * t * t,
            Self::InOutQuad => 1.0 - (2.0 - 2.0 * t).powi(2) / 2.0,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
