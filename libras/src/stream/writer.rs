use std::io::Write;

use tracing::debug;

use crate::error::Error;
use crate::header::{wire, PageHeaderV1, PageHeaderV2};

use super::io::write_full;
use super::sync::SyncWord;
use super::PageState;

/// Streaming writer producing uncompressed, native-order raster streams.
///
/// Each page is begun with a header and must then be fed exactly
/// [`rows_remaining`](Self::rows_remaining) raw rows through
/// [`write_pixels`](Self::write_pixels). Writers never compress; the
/// decoder handles both forms but the asymmetry is part of the format.
pub struct RasterWriter<W> {
    inner: W,
    page: PageState,
}

impl<W: Write> RasterWriter<W> {
    /// Opens a raster stream for writing by emitting the sync word.
    ///
    /// # Errors
    ///
    /// This function errors if the sync word cannot be written in full.
    pub fn new(mut inner: W) -> Result<Self, Error> {
        write_full(&mut inner, &(SyncWord::Legacy as u32).to_ne_bytes())?;
        debug!("opened raster stream for writing");
        Ok(Self {
            inner,
            page: PageState::default(),
        })
    }

    /// Returns the header of the page currently being written
    #[must_use]
    pub const fn header(&self) -> &PageHeaderV2 {
        &self.page.header
    }

    /// Returns the number of rows the current page still owes
    #[must_use]
    pub const fn rows_remaining(&self) -> u32 {
        self.page.rows_left
    }

    /// Consumes the writer, returning the underlying sink
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Begins a page by writing its header record.
    ///
    /// The page's row budget becomes its full row count. A zero
    /// `num_colors` is filled in from the color-space tag before the
    /// record goes out.
    ///
    /// # Errors
    ///
    /// This function errors if the record cannot be written in full.
    pub fn write_header(&mut self, header: &PageHeaderV2) -> Result<(), Error> {
        self.page.header = header.clone();
        self.start_page()
    }

    /// Begins a page from a revision 1 header; the extension block is
    /// zeroed before the derived color count is filled in.
    ///
    /// # Errors
    ///
    /// This function errors if the record cannot be written in full.
    pub fn write_header_v1(&mut self, header: &PageHeaderV1) -> Result<(), Error> {
        self.page.header = PageHeaderV2 {
            v1: header.clone(),
            ..PageHeaderV2::default()
        };
        self.start_page()
    }

    fn start_page(&mut self) -> Result<(), Error> {
        self.page.refresh(false);
        let mut raw = [0u8; wire::HEADER_V2_LEN];
        wire::encode(&self.page.header, &mut raw)?;
        write_full(&mut self.inner, &raw)?;
        debug!(rows = self.page.rows_left, "wrote page header");
        Ok(())
    }

    /// Writes raw rows for the current page; `data` must hold whole rows.
    ///
    /// # Errors
    ///
    /// This function errors if the page's row budget is already spent or
    /// the sink fails.
    pub fn write_pixels(&mut self, data: &[u8]) -> Result<(), Error> {
        if self.page.rows_left == 0 {
            return Err(Error::PageComplete);
        }
        let line = self.page.header.v1.bytes_per_line as usize;
        if line > 0 {
            let rows = u32::try_from(data.len() / line).unwrap_or(u32::MAX);
            self.page.rows_left = self.page.rows_left.saturating_sub(rows);
        }
        write_full(&mut self.inner, data)?;
        Ok(())
    }
}
