//! # Dispatcher
//!
//! 事件存储转发模块。
//!
//! 负责：
//! - 将 `Event` 编码并持久化到 `RecordStore`
//! - 批量打包为 `NativeAppSubmission` 发送到采集端
//! - 发送成功后删除记录，失败则保留等待下次 flush (至少一次)

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod record;
pub mod store;
pub mod transport;

pub use contracts::{Event, RecordStore, SubmissionTransport};
pub use dispatcher::{create_dispatcher, Dispatcher, DispatcherConfig, FlushOutcome};
pub use error::DispatcherError;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use store::{ConfiguredStore, FileRecordStore, InMemoryRecordStore};
pub use transport::{ConfiguredTransport, HttpTransport, LogTransport};
