// Time Provider Port (for testability)

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Get current time in milliseconds since epoch
    fn now_millis(&self) -> i64;

    /// Wall-clock stamp for the report header ("YYYY-MM-DD HH:MM:SS")
    fn now_stamp(&self) -> String;
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn now_stamp(&self) -> String {
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

pub mod mocks {
    use super::TimeProvider;

    /// Fixed time provider for deterministic tests
    pub struct FixedTimeProvider {
        pub millis: i64,
        pub stamp: String,
    }

    impl FixedTimeProvider {
        pub fn new(millis: i64, stamp: impl Into<String>) -> Self {
            Self {
                millis,
                stamp: stamp.into(),
            }
        }
    }

    impl TimeProvider for FixedTimeProvider {
        fn now_millis(&self) -> i64 {
            self.millis
        }

        fn now_stamp(&self) -> String {
            self.stamp.clone()
        }
    }
}
