// hookpipe/src/middleware/mod.rs

//! Built-in middleware: timeout, retry, panic recovery and logging.
//!
//! Register them with `Pipeline::use_middleware`. Order matters: the first
//! registered layer is the outermost, so a recovery layer goes before the
//! retry and timeout layers it is meant to protect.

pub mod logging;
pub mod recovery;
pub mod retry;
pub mod timeout;

pub use logging::logging;
pub use recovery::{panic_message, recovery, recovery_with_error};
pub use retry::{retry, retry_default, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BACKOFF};
pub use timeout::{timeout, timeout_default, DEFAULT_TIMEOUT};
