//! 分发指标收集模块
//!
//! 记录事件入库、flush 结果以及解码失败等运行指标。

use metrics::{counter, histogram};

/// 记录事件入库
///
/// 每次 `dispatch` 成功写入存储后调用。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_dispatch;
///
/// store.put(&event.event_id, record).await?;
/// record_dispatch(store.name(), record_len);
/// ```
pub fn record_dispatch(store: &str, bytes: usize) {
    counter!("ophan_events_dispatched_total", "store" => store.to_string()).increment(1);
    histogram!("ophan_record_bytes").record(bytes as f64);
}

/// 记录一次 flush 的结果
///
/// `outcome` 取值: `empty` / `delivered` / `send_failed`
pub fn record_flush(outcome: &str, events: usize) {
    counter!("ophan_flushes_total", "outcome" => outcome.to_string()).increment(1);
    if events > 0 {
        counter!("ophan_flush_events_total", "outcome" => outcome.to_string())
            .increment(events as u64);
        histogram!("ophan_submission_events").record(events as f64);
    }
}

/// 记录无法解码的存储记录
pub fn record_decode_failure(reason: &str) {
    counter!("ophan_decode_failures_total", "reason" => reason.to_string()).increment(1);
}

/// 记录 flush 耗时
pub fn record_flush_latency_ms(latency_ms: f64) {
    histogram!("ophan_flush_latency_ms").record(latency_ms);
}

/// Flush 结果聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct FlushStatsAggregator {
    /// flush 总数
    pub total_flushes: u64,

    /// 无事件可发送的 flush 数
    pub empty_flushes: u64,

    /// 发送失败的 flush 数
    pub failed_flushes: u64,

    /// 成功送达的事件数
    pub delivered_events: u64,

    /// flush 耗时统计
    pub latency_stats: RunningStats,

    /// 每次提交的事件数统计
    pub batch_stats: RunningStats,
}

impl FlushStatsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, outcome: &str, events: usize, latency_ms: f64) {
        self.total_flushes += 1;
        self.latency_stats.push(latency_ms);

        match outcome {
            "empty" => self.empty_flushes += 1,
            "send_failed" => {
                self.failed_flushes += 1;
                self.batch_stats.push(events as f64);
            }
            _ => {
                self.delivered_events += events as u64;
                self.batch_stats.push(events as f64);
            }
        }
    }

    /// 生成摘要报告
    pub fn summary(&self) -> FlushSummary {
        FlushSummary {
            total_flushes: self.total_flushes,
            empty_flushes: self.empty_flushes,
            failed_flushes: self.failed_flushes,
            delivered_events: self.delivered_events,
            failure_rate: if self.total_flushes > 0 {
                self.failed_flushes as f64 / self.total_flushes as f64 * 100.0
            } else {
                0.0
            },
            latency_ms: StatsSummary::from(&self.latency_stats),
            batch_size: StatsSummary::from(&self.batch_stats),
        }
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct FlushSummary {
    pub total_flushes: u64,
    pub empty_flushes: u64,
    pub failed_flushes: u64,
    pub delivered_events: u64,
    pub failure_rate: f64,
    pub latency_ms: StatsSummary,
    pub batch_size: StatsSummary,
}

impl std::fmt::Display for FlushSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Flush Summary ===")?;
        writeln!(f, "Total flushes: {}", self.total_flushes)?;
        writeln!(f, "Empty flushes: {}", self.empty_flushes)?;
        writeln!(
            f,
            "Failed flushes: {} ({:.2}%)",
            self.failed_flushes, self.failure_rate
        )?;
        writeln!(f, "Delivered events: {}", self.delivered_events)?;
        writeln!(f, "Flush latency (ms): {}", self.latency_ms)?;
        writeln!(f, "Batch size: {}", self.batch_size)
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}
