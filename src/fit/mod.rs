//! Overflow fitting: shrink a slide's effective font scale until its
//! content fits the fixed card height, or a floor is reached.
//!
//! Measurement is abstracted behind the [`Measure`] trait so the algorithm
//! is testable without a real layout engine; production code plugs in the
//! text layout from [`crate::render::layout`].

/// An effective font scale, always a multiple of 5 between 40 and 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Scale(u8);

impl Scale {
    pub const MAX: Scale = Scale(100);
    pub const MIN: Scale = Scale(40);
    const STEP: u8 = 5;

    /// The scale as a percentage (40..=100).
    pub fn percent(self) -> u8 {
        self.0
    }

    /// The scale as a multiplicative factor (0.40..=1.00).
    pub fn factor(self) -> f32 {
        f32::from(self.0) / 100.0
    }

    /// One step down, or `None` at the floor.
    fn down(self) -> Option<Scale> {
        if self.0 > Self::MIN.0 {
            Some(Scale(self.0 - Self::STEP))
        } else {
            None
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::MAX
    }
}

/// Measures content height at a given scale.
pub trait Measure {
    fn content_height(&self, scale: Scale) -> f32;
}

impl<F: Fn(Scale) -> f32> Measure for F {
    fn content_height(&self, scale: Scale) -> f32 {
        self(scale)
    }
}

/// Outcome of a fitting pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    /// Final scale, a multiple of 5 in 40..=100.
    pub scale: Scale,
    /// Measured content height at the final scale.
    pub content_height: f32,
    /// True when content still exceeds the container at the floor scale.
    /// Content is never hidden or truncated; the UI warns instead.
    pub overflowing: bool,
}

/// Shrink from 100% in 5-point steps until the content fits or the 40%
/// floor is reached.
///
/// Every call starts over from 100%, so re-fitting after an edit never
/// ratchets: content that shrank gets its scale back. Within one pass the
/// descent is monotonic and stops at the first fitting scale.
pub fn fit(measure: &impl Measure, container_height: f32) -> FitResult {
    let mut scale = Scale::MAX;
    let mut height = measure.content_height(scale);

    while height > container_height {
        match scale.down() {
            Some(next) => {
                scale = next;
                height = measure.content_height(scale);
            }
            None => break,
        }
    }

    FitResult {
        scale,
        content_height: height,
        overflowing: height > container_height,
    }
}
