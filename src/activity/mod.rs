pub mod bucketer;
pub mod config;

pub use bucketer::{axis_max, bucket_activity, bucket_signal};
pub use config::BucketingConfig;
