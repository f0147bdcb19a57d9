use std::time::{Duration, Instant};

/// Frame statistics - per-frame timing accumulated by a drawing pipeline
///
/// Read-only to clients; only the owning pipeline feeds it, by bracketing
/// each `draw_frame` with [`begin_frame`](Self::begin_frame) and
/// [`end_frame`](Self::end_frame). Swapping the pipeline on a host swaps the
/// visible accumulator with it.
#[derive(Debug, Default, Clone)]
pub struct FrameStatistics {
    frame_count: u64,
    frame_begin: Option<Instant>,
    last_frame_time: Duration,
    min_frame_time: Option<Duration>,
    max_frame_time: Duration,
    total_frame_time: Duration,
}

impl FrameStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a frame
    pub fn begin_frame(&mut self) {
        self.frame_begin = Some(Instant::now());
    }

    /// Mark the end of a frame and record its duration
    ///
    /// A call without a matching `begin_frame` records nothing.
    pub fn end_frame(&mut self) {
        let Some(begin) = self.frame_begin.take() else {
            return;
        };
        let elapsed = begin.elapsed();

        self.frame_count += 1;
        self.last_frame_time = elapsed;
        self.max_frame_time = self.max_frame_time.max(elapsed);
        self.min_frame_time = Some(match self.min_frame_time {
            Some(min) => min.min(elapsed),
            None => elapsed,
        });
        self.total_frame_time += elapsed;
    }

    /// Number of completed frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Duration of the most recent frame
    pub fn last_frame_time(&self) -> Duration {
        self.last_frame_time
    }

    /// Shortest recorded frame, zero before any frame completes
    pub fn min_frame_time(&self) -> Duration {
        self.min_frame_time.unwrap_or_default()
    }

    /// Longest recorded frame
    pub fn max_frame_time(&self) -> Duration {
        self.max_frame_time
    }

    /// Mean frame duration over all recorded frames
    pub fn mean_frame_time(&self) -> Duration {
        if self.frame_count == 0 {
            Duration::ZERO
        } else {
            self.total_frame_time / self.frame_count as u32
        }
    }
}
