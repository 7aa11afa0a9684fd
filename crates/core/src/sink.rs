//! The `TrailSink` trait every trail renderer implements.
//!
//! A sink owns the two persistent trail surfaces. The simulation never sees
//! them: it hands over a frame's segments and the sink performs the
//! copy-draw-swap cycle internally, so a surface can never be read and
//! written in the same pass from outside.

/// A double-buffered trail surface that accumulates line segments.
///
/// Implemented by the software rasterizer and, behind the `render` feature,
/// by the GL pipeline. The trait is object-safe.
pub trait TrailSink {
    /// Error produced by surface (re)creation.
    type Error: std::error::Error;

    /// Current surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Recreates both surfaces at the new size. Paint already on the front
    /// surface is kept at its original coordinates; anything outside the new
    /// bounds is dropped and newly exposed area starts transparent.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), Self::Error>;

    /// Paints both surfaces fully transparent.
    fn clear(&mut self);

    /// Runs one frame: `back = front * (1 - decay)`, draws `segments` onto
    /// back with source-over blending, then swaps so back becomes front.
    fn paint(&mut self, segments: &[crate::LineSegment], decay: f32);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LineSegment;
    use glam::Vec2;

    #[derive(Debug)]
    struct NeverFails;

    impl std::fmt::Display for NeverFails {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "never")
        }
    }

    impl std::error::Error for NeverFails {}

    /// Counts calls; stands in for a real surface pair.
    struct MockSink {
        size: (u32, u32),
        frames: usize,
        painted: usize,
        clears: usize,
    }

    impl TrailSink for MockSink {
        type Error = NeverFails;

        fn size(&self) -> (u32, u32) {
            self.size
        }

        fn resize(&mut self, width: u32, height: u32) -> Result<(), NeverFails> {
            self.size = (width, height);
            Ok(())
        }

        fn clear(&mut self) {
            self.clears += 1;
        }

        fn paint(&mut self, segments: &[LineSegment], _decay: f32) {
            self.frames += 1;
            self.painted += segments.len();
        }
    }

    fn mock() -> MockSink {
        MockSink {
            size: (8, 8),
            frames: 0,
            painted: 0,
            clears: 0,
        }
    }

    #[test]
    fn trail_sink_is_object_safe() {
        let mut sink: Box<dyn TrailSink<Error = NeverFails>> = Box::new(mock());
        sink.resize(32, 16).unwrap();
        assert_eq!(sink.size(), (32, 16));
    }

    #[test]
    fn paint_receives_all_segments() {
        let mut sink = mock();
        let seg = LineSegment::new(Vec2::ZERO, Vec2::new(3.0, 4.0), 2.0, 0xffffff, 1.0);
        sink.paint(&[seg, seg], 0.0);
        sink.paint(&[], 0.0);
        sink.clear();
        assert_eq!(sink.frames, 2);
        assert_eq!(sink.painted, 2);
        assert_eq!(sink.clears, 1);
    }
}
