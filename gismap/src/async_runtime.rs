use std::future::Future;

/// Runs the future in the background.
///
/// Uses the tokio runtime of the current context. If there is none (for example in a plain
/// thread), the future is driven by a single-threaded runtime on a dedicated thread.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn<T>(future: T)
where
    T: Future + Send + 'static,
    T::Output: Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(future);
        }
        Err(_) => {
            log::debug!("No async runtime in context, running task on a dedicated thread");
            std::thread::spawn(move || {
                match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => {
                        runtime.block_on(future);
                    }
                    Err(err) => log::error!("Failed to start async runtime: {err}"),
                }
            });
        }
    }
}

/// Runs the future in the background on the browser event loop.
#[cfg(target_arch = "wasm32")]
pub fn spawn<T>(future: T)
where
    T: Future + 'static,
    T::Output: 'static,
{
    wasm_bindgen_futures::spawn_local(async {
        future.await;
    });
}
