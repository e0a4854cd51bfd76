use std::fmt::Debug;

use crate::subscriber::Subscribe;

/// Base subscriber that logs received data to stdout.
///
/// Enabled via the `logging` feature. Useful for demos and debugging.
pub struct LogSubscriber;

impl<T: Debug> Subscribe<T> for LogSubscriber {
    fn write(&self, data: &T) {
        println!("[received] data={data:?}");
    }
}
