//! # libras
//!
//!
//! This library provides datatypes and i/o functionality for streaming
//! page raster data, the page-oriented pixel interchange format used
//! between the filter stages of printing pipelines.
//!
//! A raster stream is a single sync word followed by any number of pages,
//! each a fixed-size binary header record and then that page's rows. The
//! sync word encodes three properties at once: the header revision (a
//! short record or the full one), the producer's byte order, and whether
//! rows are stored raw or under a TIFF-style PackBits row compression.
//! Readers handle all six combinations; writers always produce
//! uncompressed streams in their own byte order, which is the asymmetry
//! printing pipelines rely on.
//!
//! ### Limitations
//!
//! Streams are strictly sequential. There is no index, no seeking, and no
//! recovery: once a sync word, header record, or row body fails to decode,
//! the stream is terminally unusable. Uncompressed streams must be read
//! and written in whole-row multiples; only the compressed read path hands
//! out partially consumed rows.
//!
//! ### Usage
//!
//! The primary use case for this library is producing page streams for a
//! consumer further down a pipeline, and reading them back.
//!
//! #### Writing a page
//!
//! ```rust
//! use libras::{ColorOrder, ColorSpace, PageHeaderV1, PageHeaderV2, RasterWriter};
//!
//! fn main() -> anyhow::Result<()> {
//!     let header = PageHeaderV2::builder()
//!         .v1(PageHeaderV1::builder()
//!             .width(4)
//!             .height(2)
//!             .bits_per_color(8)
//!             .bits_per_pixel(8)
//!             .bytes_per_line(4)
//!             .color_order(ColorOrder::Chunked as u32)
//!             .color_space(ColorSpace::White as u32)
//!             .build())
//!         .build();
//!
//!     let mut stream = Vec::new();
//!     let mut writer = RasterWriter::new(&mut stream)?;
//!     writer.write_header(&header)?;
//!     assert_eq!(writer.rows_remaining(), 2);
//!     writer.write_pixels(&[0x00, 0x55, 0xaa, 0xff])?;
//!     writer.write_pixels(&[0xff, 0xaa, 0x55, 0x00])?;
//!     assert_eq!(writer.rows_remaining(), 0);
//!     Ok(())
//! }
//! ```
//!
//! #### Reading pages back
//!
//! ```rust
//! use std::io::Cursor;
//! use libras::{ColorOrder, ColorSpace, PageHeaderV1, PageHeaderV2, RasterReader, RasterWriter};
//!
//! fn main() -> anyhow::Result<()> {
//!     let header = PageHeaderV2::builder()
//!         .v1(PageHeaderV1::builder()
//!             .width(4)
//!             .height(1)
//!             .bits_per_color(8)
//!             .bits_per_pixel(8)
//!             .bytes_per_line(4)
//!             .color_order(ColorOrder::Chunked as u32)
//!             .color_space(ColorSpace::White as u32)
//!             .build())
//!         .build();
//!     let mut stream = Vec::new();
//!     let mut writer = RasterWriter::new(&mut stream)?;
//!     writer.write_header(&header)?;
//!     writer.write_pixels(&[1, 2, 3, 4])?;
//!
//!     let mut reader = RasterReader::new(Cursor::new(stream))?;
//!     let page = reader.read_header()?.expect("stream holds one page");
//!     // the derived color count is filled in from the color space
//!     assert_eq!(page.num_colors, 1);
//!     let mut row = [0u8; 4];
//!     assert_eq!(reader.read_pixels(&mut row)?, 4);
//!     assert_eq!(row, [1, 2, 3, 4]);
//!     // a clean end of stream shows up as "no more pages"
//!     assert!(reader.read_header()?.is_none());
//!     Ok(())
//! }
//! ```
//!
//! #### Unstable API
//!
//! This crate is still very much a work-in-progress. Expect breaking
//! changes between minor releases until `v1.0`. The header types carry the
//! `#[non_exhaustive]` attribute and implement the builder pattern. To
//! avoid breaking changes between versions, use the `Builder` version of
//! the types where possible and set specific fields sparingly.
//!
//!

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

mod error;
/// Module containing page header records and color model tags
pub mod header;
/// Module containing the stream reader and writer
pub mod stream;

pub use error::Error;
pub use header::ColorOrder;
pub use header::ColorSpace;
pub use header::PageHeaderV1;
pub use header::PageHeaderV2;
pub use stream::RasterReader;
pub use stream::RasterWriter;
pub use stream::SyncWord;
