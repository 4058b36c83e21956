// Service exports
pub mod csv_io;
pub mod dashboard;
pub mod notifier;
pub mod repository;
pub mod workbook;

pub use csv_io::{CsvError, ImportOutcome};
pub use dashboard::{compute_stats, DashboardStats, LabelCount};
pub use notifier::{Notification, NotificationDispatcher, NotifierError, RetryPolicy, WebhookClient};
pub use repository::{InMemoryRepository, Record, Repository, RepositoryError};
pub use workbook::{export_workbook, WorkbookError};
