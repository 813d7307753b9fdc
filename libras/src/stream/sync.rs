use strum::FromRepr;

use crate::header::{HEADER_V1_LEN, HEADER_V2_LEN};

/// The stream-identifying constant carried in the first four bytes of a
/// raster stream, interpreted in the reader's native byte order.
///
/// The six values are the revision tags and byte reversals of one canonical
/// constant. Which one appears decides the header record length, whether
/// rows are PackBits-compressed, and whether the producer's byte order
/// differs from the reader's.
#[derive(FromRepr, Debug, Clone, Copy, Eq, PartialEq)]
#[repr(u32)]
pub enum SyncWord {
    /// Uncompressed stream with full-size header records, native order
    Legacy = 0x5261_5374,
    /// [`Self::Legacy`] produced by a host of the opposite byte order
    LegacySwapped = 0x7453_6152,
    /// Uncompressed stream with short (revision 1) header records
    V1 = 0x5261_5331,
    /// [`Self::V1`] produced by a host of the opposite byte order
    V1Swapped = 0x3153_6152,
    /// Compressed stream with full-size header records
    V2 = 0x5261_5332,
    /// [`Self::V2`] produced by a host of the opposite byte order
    V2Swapped = 0x3253_6152,
}

impl SyncWord {
    /// Recognizes the sync word read from the head of a stream
    #[must_use]
    pub fn detect(word: u32) -> Option<Self> {
        Self::from_repr(word)
    }

    /// Returns `true` if the producer's byte order differs from ours
    #[must_use]
    pub const fn swapped(self) -> bool {
        matches!(
            self,
            Self::LegacySwapped | Self::V1Swapped | Self::V2Swapped
        )
    }

    /// Returns `true` if row data is PackBits-compressed
    #[must_use]
    pub const fn compressed(self) -> bool {
        matches!(self, Self::V2 | Self::V2Swapped)
    }

    /// Returns `true` for the short header revision
    #[must_use]
    pub const fn short_header(self) -> bool {
        matches!(self, Self::V1 | Self::V1Swapped)
    }

    /// On-wire length of each page header record under this sync word
    #[must_use]
    pub const fn header_len(self) -> usize {
        if self.short_header() {
            HEADER_V1_LEN
        } else {
            HEADER_V2_LEN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_covers_all_six_words() {
        let expected = [
            (SyncWord::Legacy, false, false, HEADER_V2_LEN),
            (SyncWord::LegacySwapped, true, false, HEADER_V2_LEN),
            (SyncWord::V1, false, false, HEADER_V1_LEN),
            (SyncWord::V1Swapped, true, false, HEADER_V1_LEN),
            (SyncWord::V2, false, true, HEADER_V2_LEN),
            (SyncWord::V2Swapped, true, true, HEADER_V2_LEN),
        ];
        for (sync, swapped, compressed, header_len) in expected {
            assert_eq!(SyncWord::detect(sync as u32), Some(sync));
            assert_eq!(sync.swapped(), swapped);
            assert_eq!(sync.compressed(), compressed);
            assert_eq!(sync.header_len(), header_len);
        }
    }

    #[test]
    fn swapped_variants_are_byte_reversals() {
        assert_eq!(
            (SyncWord::Legacy as u32).swap_bytes(),
            SyncWord::LegacySwapped as u32
        );
        assert_eq!((SyncWord::V1 as u32).swap_bytes(), SyncWord::V1Swapped as u32);
        assert_eq!((SyncWord::V2 as u32).swap_bytes(), SyncWord::V2Swapped as u32);
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(SyncWord::detect(0xdead_beef), None);
        assert_eq!(SyncWord::detect(0), None);
    }
}
