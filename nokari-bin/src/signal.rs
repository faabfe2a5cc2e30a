use tokio::signal;

/// Completes once a shutdown signal is received.
///
/// On unix both SIGINT and SIGTERM are intercepted, on other platforms only
/// ctrl-c.
pub async fn shutdown() {
    #[cfg(target_family = "unix")]
    {
        use signal::unix::SignalKind;

        let mut term = match signal::unix::signal(SignalKind::terminate()) {
            Ok(term) => term,
            Err(err) => {
                log::warn!("[BOT] Failed to register SIGTERM handler: {}", err);
                let _ = signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = signal::ctrl_c() => (),
            _ = term.recv() => (),
        }
    }

    #[cfg(not(target_family = "unix"))]
    {
        let _ = signal::ctrl_c().await;
    }
}
