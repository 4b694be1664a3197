//! Async tick streams over line-oriented readers.

use std::collections::BTreeSet;

use futures::stream::{self, Stream, StreamExt};
use tickbar_types::{Tick, TickbarError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::{InputFormat, parse_line};

struct LineState<R> {
    lines: Lines<R>,
    line_no: usize,
    done: bool,
}

/// Creates an async stream of ticks read line by line from `reader`.
///
/// Parse failures are yielded as errors and the stream carries on with the
/// next line. An I/O error is yielded once and ends the stream.
pub fn tick_stream<R>(reader: R, format: InputFormat) -> impl Stream<Item = Result<Tick, TickbarError>>
where
    R: AsyncBufRead + Unpin,
{
    let state = LineState {
        lines: reader.lines(),
        line_no: 0,
        done: false,
    };

    stream::unfold(state, move |mut state| async move {
        if state.done {
            return None;
        }
        loop {
            match state.lines.next_line().await {
                Ok(Some(line)) => {
                    state.line_no += 1;
                    match parse_line(&line, state.line_no, format) {
                        Ok(Some(tick)) => return Some((Ok(tick), state)),
                        Ok(None) => {}
                        Err(e) => return Some((Err(TickbarError::Parse(e.to_string())), state)),
                    }
                }
                Ok(None) => return None,
                Err(e) => {
                    state.done = true;
                    return Some((Err(TickbarError::Io(e)), state));
                }
            }
        }
    })
}

/// Keeps only ticks for instruments in `allowed`; errors pass through.
///
/// An empty set lets every tick through.
pub fn retain_instruments<S>(
    ticks: S,
    allowed: BTreeSet<String>,
) -> impl Stream<Item = Result<Tick, TickbarError>>
where
    S: Stream<Item = Result<Tick, TickbarError>>,
{
    ticks.filter(move |result| {
        let keep = match result {
            Ok(tick) => allowed.is_empty() || allowed.contains(&tick.instrument),
            Err(_) => true,
        };
        futures::future::ready(keep)
    })
}
