use std::{collections::VecDeque, time::Duration};

/// Frame timing collected for a single presented frame.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FrameBreakdown {
    pub(crate) frame: Duration,
    pub(crate) ticks: u32,
    pub(crate) simulation: Duration,
    pub(crate) render: Duration,
}

/// Averages reported once per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FpsMetrics {
    pub(crate) per_second: f32,
    pub(crate) trailing_ten_seconds: f32,
    pub(crate) ticks_per_second: f32,
    pub(crate) avg_simulation: Duration,
    pub(crate) avg_render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
pub(crate) struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    ticks: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    render_accum: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    pub(crate) fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.ticks = self.ticks.saturating_add(breakdown.ticks);
        self.simulation_accum += breakdown.simulation;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let per_second = frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            ticks_per_second: self.ticks as f32 / seconds,
            avg_simulation: self.simulation_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.ticks = 0;
        self.simulation_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(millis: u64, ticks: u32) -> FrameBreakdown {
        FrameBreakdown {
            frame: Duration::from_millis(millis),
            ticks,
            simulation: Duration::from_micros(100),
            render: Duration::from_micros(300),
        }
    }

    #[test]
    fn reports_once_per_second() {
        let mut counter = FpsCounter::default();
        for _ in 0..39 {
            assert!(counter.record_frame(frame(25, 1)).is_none());
        }

        let metrics = counter
            .record_frame(frame(25, 2))
            .expect("one second elapsed");
        assert!((metrics.per_second - 40.0).abs() < 1e-3);
        assert!((metrics.ticks_per_second - 41.0).abs() < 1e-3);
        assert_eq!(metrics.avg_simulation, Duration::from_micros(100));
        assert_eq!(metrics.avg_render, Duration::from_micros(300));

        assert!(counter.record_frame(frame(25, 1)).is_none());
    }

    #[test]
    fn trailing_average_spans_ten_seconds() {
        let mut counter = FpsCounter::default();
        let mut last = None;
        for _ in 0..1200 {
            if let Some(metrics) = counter.record_frame(frame(10, 1)) {
                last = Some(metrics);
            }
        }

        let metrics = last.expect("metrics reported");
        assert!((metrics.trailing_ten_seconds - 100.0).abs() < 1.0);
    }
}
