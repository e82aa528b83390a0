//! JSON-lines request source

use futures::{stream, Stream};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{batch::RawRequest, error::SettlementError};

/// Stream requests from `reader`, one JSON object per line.
///
/// Blank lines are skipped. A read error, a line that is not JSON, or an
/// object without `callId` and `params` is yielded as an
/// [`SettlementError::UpstreamSourceFailure`]. Parameter values are left
/// untouched so a bad value only fails its own request when decoded.
pub fn json_lines<R>(reader: R) -> impl Stream<Item = Result<RawRequest, SettlementError>>
where
    R: AsyncBufRead + Unpin,
{
    stream::unfold((reader.lines(), 0usize), |(mut lines, mut line_no)| async move {
        loop {
            line_no += 1;
            let item = match lines.next_line().await {
                Ok(None) => return None,
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => serde_json::from_str::<RawRequest>(&line).map_err(|e| {
                    SettlementError::UpstreamSourceFailure(format!("line {line_no}: {e}"))
                }),
                Err(e) => {
                    Err(SettlementError::UpstreamSourceFailure(format!("line {line_no}: {e}")))
                }
            };
            return Some((item, (lines, line_no)));
        }
    })
}
