use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
/// Possible `libras` errors
pub enum Error {
    /// Error returned when the underlying byte source or sink fails
    #[error("i/o error")]
    Io(#[from] std::io::Error),
    /// Error returned when the first four bytes of a stream match none of
    /// the known sync words
    #[error("unrecognized sync word {0:#010x}")]
    UnknownSync(u32),
    /// Error returned when the stream ends inside a header record or a row
    /// body. The stream cannot be resynchronized afterwards
    #[error("unexpected end of stream")]
    UnexpectedEof,
    /// Error returned when a header text field holds bytes that are not
    /// valid UTF-8
    #[error("header text field is not valid utf-8")]
    HeaderText(#[from] std::str::Utf8Error),
    /// Error returned when a header text field does not fit its fixed slot
    #[error("header text field longer than {limit} bytes")]
    TextTooLong {
        /// size of the wire slot the text must fit
        limit: usize,
    },
    /// Error returned when pixels are written to a page whose row budget is
    /// already spent
    #[error("page rows already consumed")]
    PageComplete,
}
