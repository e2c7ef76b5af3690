/*
[INPUT]:  Polling options
[OUTPUT]: Service readiness
[POS]:    HTTP layer - readiness probe and connection wait loop
[UPDATE]: When readiness semantics change
*/

use reqwest::Method;
use tracing::{debug, info, warn};

use crate::http::{KeymasterClient, Result};
use crate::types::WaitUntilReadyOptions;

impl KeymasterClient {
    /// Check whether the service is up
    ///
    /// GET /ready
    ///
    /// Any failure, including an unreachable service, reads as "not ready".
    pub async fn is_ready(&self) -> bool {
        let ready: Result<bool> = async {
            let builder = self.request(Method::GET, &["ready"])?;
            self.send_for_field(builder, "ready").await
        }
        .await;

        ready.unwrap_or_else(|err| {
            debug!(error = %err, "keymaster readiness probe failed");
            false
        })
    }

    /// Poll [`is_ready`](Self::is_ready) until the service answers `true`.
    ///
    /// Returns `false` once `max_retries` retries have failed; with
    /// `max_retries == 0` it waits indefinitely.
    pub async fn wait_until_ready(&self, options: &WaitUntilReadyOptions) -> bool {
        let mut chatty = options.chatty;
        let mut retries = 0u32;

        if chatty {
            info!(url = %self.url(), "connecting to keymaster");
        }

        loop {
            if self.is_ready().await {
                if chatty {
                    info!("keymaster service is ready");
                }
                return true;
            }

            if chatty {
                debug!("waiting for keymaster to be ready");
            }

            retries += 1;

            if options.max_retries > 0 && retries > options.max_retries {
                warn!(url = %self.url(), retries, "keymaster did not become ready");
                return false;
            }

            if !chatty && options.become_chatty_after > 0 && retries > options.become_chatty_after {
                info!(url = %self.url(), "connecting to keymaster");
                chatty = true;
            }

            tokio::time::sleep(options.interval).await;
        }
    }
}
