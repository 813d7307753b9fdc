#![allow(clippy::module_name_repetitions)]

//! Reader and writer halves of the raster stream codec.
//!
//! A stream is a single sync word followed by any number of pages, each a
//! fixed-size header record and then that page's rows:
//!
//! ```text
//! <sync word : 4 bytes>
//! ( <header record> <row 0> <row 1> ... )*
//! ```
//!
//! Streams are strictly sequential; there is no index and no way to seek.
//! Reading and writing are split over [`RasterReader`] and [`RasterWriter`]
//! so the decompression buffers only exist on the half that needs them.

mod io;
mod reader;
mod sync;
mod writer;

pub use reader::RasterReader;
pub use sync::SyncWord;
pub use writer::RasterWriter;

use crate::header::PageHeaderV2;

/// Header-derived page state shared by the reader and writer halves.
#[derive(Debug, Default)]
pub(crate) struct PageState {
    /// Header of the page currently in flight
    pub header: PageHeaderV2,
    /// Bytes per pel, re-derived on every header
    pub pel: usize,
    /// Rows the current page still owes
    pub rows_left: u32,
}

impl PageState {
    /// Re-derives the color count, pel width and row budget after a header
    /// lands.
    pub fn refresh(&mut self, force_num_colors: bool) {
        crate::header::update_num_colors(&mut self.header, force_num_colors);
        self.pel = self.header.bytes_per_pel();
        self.rows_left = self.header.rows_per_page();
    }
}
