//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Progress bars and spinners

pub mod console;
pub mod progress;

pub use console::{print_error, print_info, print_success, print_warning};
pub use progress::{create_download_bar, create_spinner};
