use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;

use crate::error::{PgShimError, Result};
use crate::types::Row;

#[derive(Debug)]
enum State {
    Ready(std::vec::IntoIter<Row>),
    Exhausted,
}

/// Forward-only, single-pass view over a result set that has already been
/// fetched into memory.
///
/// Once the rows run out or the cursor is closed it stays exhausted; it
/// never goes back to the engine.
#[derive(Debug)]
pub struct Cursor {
    state: State,
}

impl Cursor {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            state: State::Ready(rows.into_iter()),
        }
    }

    /// A cursor that yields nothing.
    pub fn exhausted() -> Self {
        Self {
            state: State::Exhausted,
        }
    }

    /// Returns the next row, or `None` forever after the last one.
    pub fn advance(&mut self) -> Option<Row> {
        let State::Ready(rows) = &mut self.state else {
            return None;
        };
        let row = rows.next();
        if row.is_none() {
            tracing::trace!("cursor exhausted");
            self.state = State::Exhausted;
        }
        row
    }

    /// Drops the remaining rows.
    pub fn close(&mut self) {
        self.state = State::Exhausted;
    }

    /// Drops the remaining rows and hands `err` back to the consumer.
    /// Once the cursor is already exhausted this is a no-op that reports
    /// termination.
    pub fn throw(&mut self, err: PgShimError) -> Result<Option<Row>> {
        match std::mem::replace(&mut self.state, State::Exhausted) {
            State::Ready(_) => Err(err),
            State::Exhausted => Ok(None),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, State::Exhausted)
    }
}

impl Stream for Cursor {
    type Item = Row;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Row>> {
        Poll::Ready(self.get_mut().advance())
    }
}
