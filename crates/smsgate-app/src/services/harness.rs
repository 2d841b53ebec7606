// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON-lines transport for the bridge: one `MethodCall` per input line, one
// `MethodResponse` per output line, in order.
//
// Calls are handled one at a time, matching the bridge's single logical
// thread of control.

use smsgate_bridge::{DispatchEngine, RequestRouter};
use smsgate_core::error::SmsGateError;
use smsgate_core::human_errors::humanize_error;
use smsgate_core::types::{MethodCall, MethodResponse};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Serve calls from `input` until EOF. Returns the number of calls handled.
pub async fn serve_lines<E, R, W>(
    router: &RequestRouter<E>,
    input: R,
    mut output: W,
) -> std::io::Result<usize>
where
    E: DispatchEngine,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<MethodCall>(line) {
            Ok(call) => router.handle(call).await,
            Err(e) => {
                let err = SmsGateError::InvalidArgument(format!("malformed call: {e}"));
                debug!(error = %err, hint = %humanize_error(&err).suggestion, "unparseable call line");
                err.into()
            }
        };
        log_response(&response);

        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        output.write_all(&encoded).await?;
        output.flush().await?;
        handled += 1;
    }

    info!(handled, "input closed");
    Ok(handled)
}

fn log_response(response: &MethodResponse) {
    match response {
        MethodResponse::Success { .. } => info!("call succeeded"),
        MethodResponse::NotImplemented => info!("call not implemented"),
        MethodResponse::Error { code, message, .. } => warn!(%code, %message, "call failed"),
    }
}
