use std::io::Read;

use tracing::{debug, trace};

use crate::error::Error;
use crate::header::{wire, PageHeaderV1, PageHeaderV2};

use super::io::{read_full, swap_pairs};
use super::sync::SyncWord;
use super::PageState;

/// Requests shorter than this are served by refilling the shared buffer;
/// longer ones read straight into the destination slice.
const DIRECT_THRESHOLD: usize = 16;

/// Streaming reader over a sequential raster byte source.
///
/// Pages are pulled by alternating [`read_header`](Self::read_header) with
/// [`read_pixels`](Self::read_pixels) calls until the page's rows are
/// exhausted. Any structural or I/O error leaves the stream unusable;
/// there is no resynchronization.
pub struct RasterReader<R> {
    inner: R,
    sync: SyncWord,
    page: PageState,
    /// Remaining emissions of the buffered row
    repeat: u32,
    /// Most recently decoded row, replayed while `repeat` is nonzero
    row: Vec<u8>,
    /// Read cursor into `row` for partial-row hand-offs
    cursor: usize,
    refill: Refill,
}

/// Refill buffer batching source reads for the row decoder, which otherwise
/// asks for one to a few bytes thousands of times per row.
#[derive(Default)]
struct Refill {
    buf: Vec<u8>,
    pos: usize,
    end: usize,
}

impl<R: Read> RasterReader<R> {
    /// Opens a raster stream for reading by consuming its sync word.
    ///
    /// # Errors
    ///
    /// This function errors if the source fails, ends before four bytes
    /// arrive, or starts with an unknown sync word.
    pub fn new(mut inner: R) -> Result<Self, Error> {
        let mut word = [0u8; 4];
        if read_full(&mut inner, &mut word)? < word.len() {
            return Err(Error::UnexpectedEof);
        }
        let value = u32::from_ne_bytes(word);
        let sync = SyncWord::detect(value).ok_or(Error::UnknownSync(value))?;
        debug!(?sync, "opened raster stream");
        Ok(Self {
            inner,
            sync,
            page: PageState::default(),
            repeat: 0,
            row: Vec::new(),
            cursor: 0,
            refill: Refill::default(),
        })
    }

    /// Returns the sync word this stream was opened with
    #[must_use]
    pub const fn sync(&self) -> SyncWord {
        self.sync
    }

    /// Returns the header of the page currently being read
    #[must_use]
    pub const fn header(&self) -> &PageHeaderV2 {
        &self.page.header
    }

    /// Returns the number of rows the current page still owes
    #[must_use]
    pub const fn rows_remaining(&self) -> u32 {
        self.page.rows_left
    }

    /// Consumes the reader, returning the underlying source
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Reads the next page header, or `None` at a clean end of stream.
    ///
    /// Short-revision streams fill only the revision 1 fields; the
    /// extension block comes back zeroed apart from the derived color
    /// count. Reading a header resets the page's row budget and the row
    /// replay state.
    ///
    /// # Errors
    ///
    /// This function errors if the source fails or the record is cut short
    /// mid-way.
    pub fn read_header(&mut self) -> Result<Option<PageHeaderV2>, Error> {
        let len = self.sync.header_len();
        let mut raw = [0u8; wire::HEADER_V2_LEN];
        let got = self.fill(&mut raw[..len])?;
        if got == 0 {
            trace!("end of stream at page boundary");
            return Ok(None);
        }
        if got < len {
            return Err(Error::UnexpectedEof);
        }
        if self.sync.swapped() {
            wire::swap_numeric_prefix(&mut raw);
        }
        self.page.header = wire::decode(&raw)?;
        self.page.refresh(self.sync.short_header());
        if self.sync.compressed() {
            self.row = vec![0; self.page.header.v1.bytes_per_line as usize];
            self.cursor = 0;
            self.repeat = 0;
        }
        debug!(
            width = self.page.header.v1.width,
            height = self.page.header.v1.height,
            rows = self.page.rows_left,
            "read page header"
        );
        Ok(Some(self.page.header.clone()))
    }

    /// Reads the next page header as a revision 1 record.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`read_header`](Self::read_header).
    pub fn read_header_v1(&mut self) -> Result<Option<PageHeaderV1>, Error> {
        Ok(self.read_header()?.map(|header| header.v1))
    }

    /// Reads pixel data for the current page into `buf`.
    ///
    /// Returns the number of bytes delivered: `buf.len()` normally, `0`
    /// once the page's rows are exhausted. Uncompressed streams must be
    /// read in whole-row multiples; compressed streams may be read at any
    /// granularity and hand partially consumed rows over across calls.
    ///
    /// # Errors
    ///
    /// This function errors if the source fails or ends mid-row; the
    /// stream is unusable afterwards.
    pub fn read_pixels(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if self.page.rows_left == 0 || buf.is_empty() {
            return Ok(0);
        }
        let line = self.page.header.v1.bytes_per_line as usize;
        if line == 0 {
            return Ok(0);
        }
        if !self.sync.compressed() {
            let rows = u32::try_from(buf.len() / line).unwrap_or(u32::MAX);
            self.page.rows_left = self.page.rows_left.saturating_sub(rows);
            if read_full(&mut self.inner, buf)? < buf.len() {
                return Err(Error::UnexpectedEof);
            }
            if self.swap_samples() {
                swap_pairs(buf);
            }
            return Ok(buf.len());
        }
        let mut served = 0;
        while served < buf.len() && self.page.rows_left > 0 {
            served += if self.repeat == 0 {
                self.next_row(buf, served, line)?
            } else {
                self.replay(buf, served, line)
            };
        }
        Ok(buf.len())
    }

    /// Serves bytes out of the buffered row while a repeat is outstanding.
    fn replay(&mut self, buf: &mut [u8], at: usize, line: usize) -> usize {
        let n = (line - self.cursor).min(buf.len() - at);
        buf[at..at + n].copy_from_slice(&self.row[self.cursor..self.cursor + n]);
        self.cursor += n;
        if self.cursor >= line {
            self.cursor = 0;
            self.repeat -= 1;
            self.page.rows_left -= 1;
        }
        n
    }

    /// Decodes one encoded row block and hands out as much of the first
    /// emission as the caller's slice still wants.
    fn next_row(&mut self, buf: &mut [u8], at: usize, line: usize) -> Result<usize, Error> {
        let wanted = buf.len() - at;
        let mut lead = [0u8; 1];
        if self.fill(&mut lead)? < 1 {
            return Err(Error::UnexpectedEof);
        }
        self.repeat = u32::from(lead[0]) + 1;
        trace!(repeat = self.repeat, "row block");

        if wanted == line && self.repeat == 1 {
            // single-shot row, decoded straight into the caller's slice
            let dst = &mut buf[at..at + line];
            self.decode_row(dst)?;
            if self.swap_samples() {
                swap_pairs(dst);
            }
            self.cursor = 0;
            self.repeat = 0;
            self.page.rows_left -= 1;
            return Ok(line);
        }

        let mut row = std::mem::take(&mut self.row);
        let decoded = self.decode_row(&mut row);
        self.row = row;
        decoded?;
        if self.swap_samples() {
            swap_pairs(&mut self.row);
        }
        let n = if wanted >= line {
            self.cursor = 0;
            self.repeat -= 1;
            self.page.rows_left -= 1;
            line
        } else {
            // the rest of the row stays buffered for the next call
            self.cursor = wanted;
            wanted
        };
        buf[at..at + n].copy_from_slice(&self.row[..n]);
        Ok(n)
    }

    /// Runs the PackBits opcode loop until exactly one row of output is
    /// materialized in `dst`.
    ///
    /// A repeat opcode whose clamped budget is shorter than one pel ends
    /// the row early with a zeroed tail; this keeps the output aligned to
    /// pel boundaries.
    fn decode_row(&mut self, dst: &mut [u8]) -> Result<(), Error> {
        let pel = self.page.pel;
        let mut pos = 0;
        while pos < dst.len() {
            let mut op = [0u8; 1];
            if self.fill(&mut op)? < 1 {
                return Err(Error::UnexpectedEof);
            }
            let left = dst.len() - pos;
            if op[0] & 0x80 != 0 {
                // literal run of (257 - op) pels, clamped to the row
                let n = ((257 - usize::from(op[0])) * pel).min(left);
                if self.fill(&mut dst[pos..pos + n])? < n {
                    return Err(Error::UnexpectedEof);
                }
                pos += n;
            } else {
                // one pel, emitted (op + 1) times, clamped to the row
                let n = ((usize::from(op[0]) + 1) * pel).min(left);
                if n < pel {
                    // the residual can't hold a whole pel; the row ends
                    // here with a zeroed tail
                    dst[pos..].fill(0);
                    break;
                }
                if self.fill(&mut dst[pos..pos + pel])? < pel {
                    return Err(Error::UnexpectedEof);
                }
                let run_end = pos + n;
                pos += pel;
                // Propagate the pel forward one copy at a time; each copy
                // reads the bytes the previous one just wrote. A clamped
                // run may end on a partial pel.
                while pos < run_end {
                    let step = pel.min(run_end - pos);
                    dst.copy_within(pos - pel..pos - pel + step, pos);
                    pos += step;
                }
            }
        }
        Ok(())
    }

    /// Reads exactly `dst.len()` bytes from the source, batching through
    /// the refill buffer when the stream is compressed.
    ///
    /// Returns the number of bytes delivered; a short count means the
    /// source ended or a buffer refill came up short, and the caller
    /// treats it as terminal.
    fn fill(&mut self, dst: &mut [u8]) -> Result<usize, Error> {
        if !self.sync.compressed() {
            return Ok(read_full(&mut self.inner, dst)?);
        }
        let want = 2 * self.page.header.v1.bytes_per_line as usize;
        if want > self.refill.buf.len() {
            // growing keeps the unread span in place
            self.refill.buf.resize(want, 0);
        }
        let mut total = 0;
        while total < dst.len() {
            let outstanding = dst.len() - total;
            let buffered = self.refill.end - self.refill.pos;
            if buffered == 0 {
                if outstanding >= DIRECT_THRESHOLD {
                    // large ask: skip the buffer entirely
                    if read_full(&mut self.inner, &mut dst[total..])? < outstanding {
                        return Ok(total);
                    }
                    total = dst.len();
                    break;
                }
                let size = self.refill.buf.len();
                if read_full(&mut self.inner, &mut self.refill.buf)? < size {
                    return Ok(total);
                }
                self.refill.pos = 0;
                self.refill.end = size;
                continue;
            }
            let n = outstanding.min(buffered);
            dst[total..total + n]
                .copy_from_slice(&self.refill.buf[self.refill.pos..self.refill.pos + n]);
            self.refill.pos += n;
            total += n;
        }
        Ok(total)
    }

    /// Returns `true` when 16-bit samples need their bytes flipped after
    /// decode.
    fn swap_samples(&self) -> bool {
        self.sync.swapped()
            && (self.page.header.v1.bits_per_color == 16
                || matches!(self.page.header.v1.bits_per_pixel, 12 | 16))
    }
}
