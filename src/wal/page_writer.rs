//! Page-aligned buffered writer
//!
//! Buffers writes and only hands the inner writer whole pages, measured
//! from the offset the log started at, except on an explicit flush. A
//! partially written page then always sits at the tail of the log, which
//! is what lets the decoder tell a torn write from corruption.

use std::io::{self, Write};

/// Bytes buffered before a page-aligned flush is forced
pub const DEFAULT_BUFFER_BYTES: usize = 128 * 1024;

pub struct PageWriter<W: Write> {
    inner: W,
    /// Offset of the buffer start within its page
    page_offset: usize,
    page_bytes: usize,
    buf: Vec<u8>,
    watermark: usize,
}

impl<W: Write> PageWriter<W> {
    /// `page_offset` is the current position of `inner`
    pub fn new(inner: W, page_bytes: usize, page_offset: usize) -> Self {
        Self::with_buffer_bytes(inner, page_bytes, page_offset, DEFAULT_BUFFER_BYTES)
    }

    /// The buffer never holds less than one page
    pub fn with_buffer_bytes(
        inner: W,
        page_bytes: usize,
        page_offset: usize,
        buffer_bytes: usize,
    ) -> Self {
        assert!(page_bytes > 0, "page size must be non-zero");
        let watermark = buffer_bytes.max(page_bytes);
        Self {
            inner,
            page_offset: page_offset % page_bytes,
            page_bytes,
            buf: Vec::with_capacity(watermark + page_bytes),
            watermark,
        }
    }

    /// Bytes waiting for a flush
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    fn write_pages(&mut self, mut data: &[u8]) -> io::Result<()> {
        loop {
            if data.len() + self.buf.len() <= self.watermark {
                self.buf.extend_from_slice(data);
                return Ok(());
            }

            // Complete the slack page so the buffer ends on a page boundary
            let slack = self.page_bytes - (self.page_offset + self.buf.len()) % self.page_bytes;
            if slack != self.page_bytes {
                if slack > data.len() {
                    self.buf.extend_from_slice(data);
                    return Ok(());
                }
                self.buf.extend_from_slice(&data[..slack]);
                data = &data[slack..];
            }

            self.flush_buffer()?;

            // Whole pages go straight through
            if data.len() > self.page_bytes {
                let whole = data.len() / self.page_bytes * self.page_bytes;
                self.inner.write_all(&data[..whole])?;
                data = &data[whole..];
            }
        }
    }

    fn flush_buffer(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        self.inner.write_all(&self.buf)?;
        self.page_offset = (self.page_offset + self.buf.len()) % self.page_bytes;
        self.buf.clear();
        Ok(())
    }
}

impl<W: Write> Write for PageWriter<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.write_pages(data)?;
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_buffer()?;
        self.inner.flush()
    }
}
