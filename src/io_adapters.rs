use crate::redirect::Stdout;
use std::cell::RefCell;
use std::io::{Result as IoResult, Write};
use std::process::Stdio;
use std::rc::Rc;

/// Memory-backed writer for capturing command output in tests.
///
/// The writer goes through the same boxed-stream plumbing production code
/// uses, while a shared handle keeps the collected bytes readable after the
/// box has been consumed.
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    pub fn new() -> Self {
        Self {
            buf: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Convenience: create writer and return (writer, shared handle).
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let mw = MemWriter::new();
        let rc = mw.buf.clone();
        (mw, rc)
    }
}

impl Default for MemWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

impl Stdout for MemWriter {
    /// In-memory output cannot be handed to a child process; commands spawned
    /// against it write to the null device.
    fn stdio(self: Box<Self>) -> Stdio {
        Stdio::null()
    }
}
