//! Callback adapter for consumers that cannot `.await`.
//!
//! Every client method returns a `'static` future. [`CallbackExt`] turns
//! such a future into a fire-and-forget call that reports its single
//! outcome to a callback:
//!
//! ```no_run
//! # use plugindata_client::{CallbackExt, KeyValueClient};
//! # fn demo(kv: &KeyValueClient) {
//! kv.fetch::<serde_json::Value>("greeting", None)
//!     .with_callback(|result| match result {
//!         Ok(value) => println!("fetched {value:?}"),
//!         Err(e) => eprintln!("fetch failed: {e}"),
//!     });
//! # }
//! ```

use plugindata_types::traits::Result;
use std::future::Future;

/// Delivers the outcome of a client future to a callback.
pub trait CallbackExt<T>: Future<Output = Result<T>> + Send + Sized + 'static
where
    T: Send + 'static,
{
    /// Spawn this call on the current Tokio runtime and invoke `callback`
    /// exactly once with its outcome.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    fn with_callback<F>(self, callback: F)
    where
        F: FnOnce(Result<T>) + Send + 'static,
    {
        tokio::spawn(async move {
            callback(self.await);
        });
    }
}

impl<T, Fut> CallbackExt<T> for Fut
where
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
}
