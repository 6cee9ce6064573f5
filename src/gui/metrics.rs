//! 性能统计模块
//!
//! PerformanceMetrics 记录最近若干帧的耗时，按滑动平均给出帧率和帧时间。

use std::collections::VecDeque;
use std::time::Instant;

/// 滑动窗口大小（帧）
const WINDOW: usize = 120;

/// 性能统计（帧率、帧时间）
pub struct PerformanceMetrics {
    last_frame: Option<Instant>,
    frame_times: VecDeque<f32>,
    total_ms: f32,
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self {
            last_frame: None,
            frame_times: VecDeque::with_capacity(WINDOW),
            total_ms: 0.0,
        }
    }

    /// 记录一帧，返回距上一帧的秒数
    pub fn record_frame(&mut self) -> f32 {
        let now = Instant::now();
        let delta = self
            .last_frame
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);

        if delta > 0.0 {
            self.push_frame_time(delta * 1000.0);
        }
        delta
    }

    fn push_frame_time(&mut self, ms: f32) {
        if self.frame_times.len() == WINDOW {
            if let Some(oldest) = self.frame_times.pop_front() {
                self.total_ms -= oldest;
            }
        }
        self.frame_times.push_back(ms);
        self.total_ms += ms;
    }

    /// 平均帧时间（毫秒）
    pub fn frame_time_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            0.0
        } else {
            self.total_ms / self.frame_times.len() as f32
        }
    }

    /// 平均帧率
    pub fn fps(&self) -> f32 {
        let frame_time = self.frame_time_ms();
        if frame_time > 0.0 {
            1000.0 / frame_time
        } else {
            0.0
        }
    }
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_metrics() {
        let metrics = PerformanceMetrics::new();
        assert_eq!(metrics.fps(), 0.0);
        assert_eq!(metrics.frame_time_ms(), 0.0);
    }

    #[test]
    fn test_average_over_window() {
        let mut metrics = PerformanceMetrics::new();
        metrics.push_frame_time(10.0);
        metrics.push_frame_time(30.0);

        assert!((metrics.frame_time_ms() - 20.0).abs() < 1e-4);
        assert!((metrics.fps() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_window_drops_oldest_frames() {
        let mut metrics = PerformanceMetrics::new();
        metrics.push_frame_time(1000.0);
        for _ in 0..WINDOW {
            metrics.push_frame_time(16.0);
        }

        assert_eq!(metrics.frame_times.len(), WINDOW);
        assert!((metrics.frame_time_ms() - 16.0).abs() < 1e-2);
    }

    #[test]
    fn test_first_frame_has_zero_delta() {
        let mut metrics = PerformanceMetrics::new();
        assert_eq!(metrics.record_frame(), 0.0);
    }
}
