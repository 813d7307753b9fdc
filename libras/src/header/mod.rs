#![allow(clippy::module_name_repetitions)]

//! Page header records and the color model tags they carry.
//!
//! A raster stream interleaves one header record before every page of rows.
//! The record is a fixed binary layout (see the byte lengths re-exported
//! here); most of its fields are device conventions the codec carries
//! verbatim. Only the pixel geometry and the color fields are interpreted,
//! through [`PageHeaderV2::bytes_per_pel`] and
//! [`PageHeaderV2::rows_per_page`].

pub(crate) mod wire;

pub use wire::{HEADER_V1_LEN, HEADER_V2_LEN};

use bon::Builder;
use strum::FromRepr;

/// Revision 1 page header: the field set every stream revision shares.
///
/// ## Note
///
/// The codec does not validate device fields against each other; as with
/// the rest of this crate the responsibility of producing coherent pages
/// (for example `bytes_per_line` wide enough for `width` pixels) is on the
/// user.
#[derive(Builder, Default, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct PageHeaderV1 {
    /// Media class selector, e.g. a tray or roll name
    #[builder(default)]
    pub media_class: String,
    /// Media color name
    #[builder(default)]
    pub media_color: String,
    /// Media type name
    #[builder(default)]
    pub media_type: String,
    /// Output type name
    #[builder(default)]
    pub output_type: String,
    /// Distance to advance the media between pages, in points
    #[builder(default)]
    pub advance_distance: u32,
    /// When to advance the media (device tag)
    #[builder(default)]
    pub advance_media: u32,
    /// Collate copies
    #[builder(default)]
    pub collate: bool,
    /// When to cut the media (device tag)
    #[builder(default)]
    pub cut_media: u32,
    /// Print on both sides of the media
    #[builder(default)]
    pub duplex: bool,
    /// Cross-feed and feed resolution in dots per inch
    #[builder(default)]
    pub resolution: (u32, u32),
    /// Imageable area in points: left, bottom, right, top
    #[builder(default)]
    pub imaging_bbox: [u32; 4],
    /// Insert a separator sheet before the page
    #[builder(default)]
    pub insert_sheet: bool,
    /// Output jogging (device tag)
    #[builder(default)]
    pub jog: u32,
    /// Which edge of the page feeds first (device tag)
    #[builder(default)]
    pub leading_edge: u32,
    /// Origin of the imageable area in points: left, bottom
    #[builder(default)]
    pub margins: (u32, u32),
    /// Media is fed manually
    #[builder(default)]
    pub manual_feed: bool,
    /// Media source position (device tag)
    #[builder(default)]
    pub media_position: u32,
    /// Media weight in grams per square meter
    #[builder(default)]
    pub media_weight: u32,
    /// Mirror the page image
    #[builder(default)]
    pub mirror_print: bool,
    /// Invert the page image
    #[builder(default)]
    pub negative_print: bool,
    /// Number of copies
    #[builder(default)]
    pub num_copies: u32,
    /// Page orientation (device tag)
    #[builder(default)]
    pub orientation: u32,
    /// Deliver output face up
    #[builder(default)]
    pub output_face_up: bool,
    /// Page width and length in points
    #[builder(default)]
    pub page_size: (u32, u32),
    /// Print color separations
    #[builder(default)]
    pub separations: bool,
    /// Switch trays automatically when one empties
    #[builder(default)]
    pub tray_switch: bool,
    /// Rotate the back side of duplexed output
    #[builder(default)]
    pub tumble: bool,
    /// Page width in pixels
    #[builder(default)]
    pub width: u32,
    /// Page height in pixels
    #[builder(default)]
    pub height: u32,
    /// Device media code
    #[builder(default)]
    pub media_code: u32,
    /// Bits carried per color sample; 16-bit samples are byte-swapped on
    /// foreign-order streams
    #[builder(default)]
    pub bits_per_color: u32,
    /// Bits carried per pixel across all of its colors
    #[builder(default)]
    pub bits_per_pixel: u32,
    /// Bytes in one row of the page; every row on the wire decodes to
    /// exactly this many bytes
    #[builder(default)]
    pub bytes_per_line: u32,
    /// Pixel layout tag; see [`ColorOrder`]
    #[builder(default)]
    pub color_order: u32,
    /// Color space tag; see [`ColorSpace`]
    #[builder(default)]
    pub color_space: u32,
    /// Device compression code, carried verbatim (stream-level row
    /// compression is selected by the sync word instead)
    #[builder(default)]
    pub compression: u32,
    /// Device rows-per-band code
    #[builder(default)]
    pub row_count: u32,
    /// Device row feed code
    #[builder(default)]
    pub row_feed: u32,
    /// Device row step code
    #[builder(default)]
    pub row_step: u32,
}

/// Full page header: the revision 1 fields plus the extension block.
///
/// Short-revision streams decode into this type as well, with the
/// extension fields zeroed.
#[derive(Builder, Default, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct PageHeaderV2 {
    /// Revision 1 field set shared by every stream
    #[builder(default)]
    pub v1: PageHeaderV1,
    /// Number of color planes; zero means "derive from the color space"
    #[builder(default)]
    pub num_colors: u32,
    /// Scaling factor for borderless printing
    #[builder(default)]
    pub borderless_scaling: f32,
    /// Page width and length in fractional points
    #[builder(default)]
    pub page_size_f: (f32, f32),
    /// Imageable area in fractional points: left, bottom, right, top
    #[builder(default)]
    pub imaging_bbox_f: [f32; 4],
    /// Vendor-defined integer values
    #[builder(default)]
    pub vendor_ints: [u32; 16],
    /// Vendor-defined floating point values
    #[builder(default)]
    pub vendor_floats: [f32; 16],
    /// Vendor-defined text values
    #[builder(default)]
    pub vendor_text: [String; 16],
    /// Ink or toner marker type name
    #[builder(default)]
    pub marker_type: String,
    /// Color rendering intent name
    #[builder(default)]
    pub rendering_intent: String,
    /// Named page size
    #[builder(default)]
    pub page_size_name: String,
}

impl PageHeaderV2 {
    /// Color order tag decoded, if recognized
    #[must_use]
    pub fn color_order(&self) -> Option<ColorOrder> {
        ColorOrder::from_repr(self.v1.color_order)
    }

    /// Color space tag decoded, if recognized
    #[must_use]
    pub fn color_space(&self) -> Option<ColorSpace> {
        ColorSpace::from_repr(self.v1.color_space)
    }

    /// Width in bytes of one pel: a whole pixel under chunked order, a
    /// single color sample otherwise. Never less than one byte, so a
    /// degenerate header cannot stall the row decoder.
    #[must_use]
    pub fn bytes_per_pel(&self) -> usize {
        let bits = if self.color_order() == Some(ColorOrder::Chunked) {
            self.v1.bits_per_pixel
        } else {
            self.v1.bits_per_color
        };
        (bits.div_ceil(8) as usize).max(1)
    }

    /// Number of rows the page owes: one pass per color plane under planar
    /// order, one pass otherwise
    #[must_use]
    pub fn rows_per_page(&self) -> u32 {
        if self.color_order() == Some(ColorOrder::Planar) {
            self.v1.height.saturating_mul(self.num_colors)
        } else {
            self.v1.height
        }
    }
}

/// Pixel layout tags carried in [`PageHeaderV1::color_order`]
#[derive(FromRepr, Debug, Clone, Copy, Eq, PartialEq)]
#[repr(u32)]
pub enum ColorOrder {
    /// All colors of a pixel stored together
    Chunked = 0,
    /// Colors banded within each row
    Banded = 1,
    /// Each color plane stored as a full pass of rows
    Planar = 2,
}

/// Color space tags carried in [`PageHeaderV1::color_space`]
#[derive(FromRepr, Debug, Clone, Copy, Eq, PartialEq)]
#[repr(u32)]
pub enum ColorSpace {
    /// Luminance, white at full value
    White = 0,
    /// Red, green, blue
    Rgb = 1,
    /// Red, green, blue, alpha
    Rgba = 2,
    /// Black ink
    Black = 3,
    /// Cyan, magenta, yellow
    Cmy = 4,
    /// Yellow, magenta, cyan
    Ymc = 5,
    /// Cyan, magenta, yellow, black
    Cmyk = 6,
    /// Yellow, magenta, cyan, black
    Ymck = 7,
    /// Black, cyan, magenta, yellow
    Kcmy = 8,
    /// Black, cyan, magenta, yellow plus light cyan and light magenta
    Kcmycm = 9,
    /// Gold, magenta, cyan, black
    Gmck = 10,
    /// Gold, magenta, cyan, silver
    Gmcs = 11,
    /// Solid white ink
    SolidWhite = 12,
    /// Solid gold ink
    SolidGold = 13,
    /// Solid silver ink
    SolidSilver = 14,
    /// CIE XYZ
    CieXyz = 15,
    /// CIE L*a*b*
    CieLab = 16,
    /// Red, green, blue, white
    Rgbw = 17,
    /// ICC profile based, one of sixteen slots
    Icc1 = 32,
    /// ICC profile slot 2
    Icc2 = 33,
    /// ICC profile slot 3
    Icc3 = 34,
    /// ICC profile slot 4
    Icc4 = 35,
    /// ICC profile slot 5
    Icc5 = 36,
    /// ICC profile slot 6
    Icc6 = 37,
    /// ICC profile slot 7
    Icc7 = 38,
    /// ICC profile slot 8
    Icc8 = 39,
    /// ICC profile slot 9
    Icc9 = 40,
    /// ICC profile slot 10
    IccA = 41,
    /// ICC profile slot 11
    IccB = 42,
    /// ICC profile slot 12
    IccC = 43,
    /// ICC profile slot 13
    IccD = 44,
    /// ICC profile slot 14
    IccE = 45,
    /// ICC profile slot 15
    IccF = 46,
}

/// Fills in `num_colors` from the color-space tag.
///
/// Short-header streams never carry the field, so they always recompute it
/// (`force`); full headers keep an explicit nonzero value. Unrecognized
/// tags leave the field untouched.
pub(crate) fn update_num_colors(header: &mut PageHeaderV2, force: bool) {
    if !force && header.num_colors != 0 {
        return;
    }
    let Some(space) = header.color_space() else {
        return;
    };
    header.num_colors = match space {
        ColorSpace::White
        | ColorSpace::Black
        | ColorSpace::SolidWhite
        | ColorSpace::SolidGold
        | ColorSpace::SolidSilver => 1,
        ColorSpace::Rgb
        | ColorSpace::Cmy
        | ColorSpace::Ymc
        | ColorSpace::CieXyz
        | ColorSpace::CieLab
        | ColorSpace::Icc1
        | ColorSpace::Icc2
        | ColorSpace::Icc3
        | ColorSpace::Icc4
        | ColorSpace::Icc5
        | ColorSpace::Icc6
        | ColorSpace::Icc7
        | ColorSpace::Icc8
        | ColorSpace::Icc9
        | ColorSpace::IccA
        | ColorSpace::IccB
        | ColorSpace::IccC
        | ColorSpace::IccD
        | ColorSpace::IccE
        | ColorSpace::IccF => 3,
        ColorSpace::Rgba
        | ColorSpace::Rgbw
        | ColorSpace::Cmyk
        | ColorSpace::Ymck
        | ColorSpace::Kcmy
        | ColorSpace::Gmck
        | ColorSpace::Gmcs => 4,
        ColorSpace::Kcmycm => {
            if header.v1.bits_per_pixel < 8 {
                6
            } else {
                4
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(space: ColorSpace, order: ColorOrder, bits_per_pixel: u32) -> PageHeaderV2 {
        PageHeaderV2::builder()
            .v1(PageHeaderV1::builder()
                .height(10)
                .bits_per_color(8)
                .bits_per_pixel(bits_per_pixel)
                .color_order(order as u32)
                .color_space(space as u32)
                .build())
            .build()
    }

    #[test]
    fn num_colors_follows_the_color_space_table() {
        let expected: &[(ColorSpace, u32)] = &[
            (ColorSpace::White, 1),
            (ColorSpace::Black, 1),
            (ColorSpace::SolidWhite, 1),
            (ColorSpace::SolidGold, 1),
            (ColorSpace::SolidSilver, 1),
            (ColorSpace::Rgb, 3),
            (ColorSpace::Cmy, 3),
            (ColorSpace::Ymc, 3),
            (ColorSpace::CieXyz, 3),
            (ColorSpace::CieLab, 3),
            (ColorSpace::Icc1, 3),
            (ColorSpace::Icc9, 3),
            (ColorSpace::IccA, 3),
            (ColorSpace::IccF, 3),
            (ColorSpace::Rgba, 4),
            (ColorSpace::Rgbw, 4),
            (ColorSpace::Cmyk, 4),
            (ColorSpace::Ymck, 4),
            (ColorSpace::Kcmy, 4),
            (ColorSpace::Gmck, 4),
            (ColorSpace::Gmcs, 4),
        ];
        for &(space, colors) in expected {
            let mut h = header(space, ColorOrder::Chunked, 8);
            update_num_colors(&mut h, false);
            assert_eq!(h.num_colors, colors, "space {space:?}");
        }
    }

    #[test]
    fn six_color_space_depends_on_pixel_depth() {
        let mut low = header(ColorSpace::Kcmycm, ColorOrder::Chunked, 4);
        update_num_colors(&mut low, false);
        assert_eq!(low.num_colors, 6);

        let mut high = header(ColorSpace::Kcmycm, ColorOrder::Chunked, 8);
        update_num_colors(&mut high, false);
        assert_eq!(high.num_colors, 4);
    }

    #[test]
    fn explicit_count_wins_unless_forced() {
        let mut h = header(ColorSpace::Rgb, ColorOrder::Chunked, 24);
        h.num_colors = 9;
        update_num_colors(&mut h, false);
        assert_eq!(h.num_colors, 9);
        update_num_colors(&mut h, true);
        assert_eq!(h.num_colors, 3);
    }

    #[test]
    fn unrecognized_space_leaves_count_alone() {
        let mut h = header(ColorSpace::Rgb, ColorOrder::Chunked, 24);
        h.v1.color_space = 999;
        h.num_colors = 0;
        update_num_colors(&mut h, true);
        assert_eq!(h.num_colors, 0);
    }

    #[test]
    fn pel_width_follows_the_color_order() {
        let chunked = header(ColorSpace::Rgb, ColorOrder::Chunked, 24);
        assert_eq!(chunked.bytes_per_pel(), 3);

        let mut banded = header(ColorSpace::Rgb, ColorOrder::Banded, 24);
        banded.v1.bits_per_color = 16;
        assert_eq!(banded.bytes_per_pel(), 2);

        let twelve = header(ColorSpace::White, ColorOrder::Chunked, 12);
        assert_eq!(twelve.bytes_per_pel(), 2);
    }

    #[test]
    fn pel_width_has_a_floor_of_one_byte() {
        let mut h = header(ColorSpace::White, ColorOrder::Chunked, 0);
        h.v1.bits_per_color = 0;
        assert_eq!(h.bytes_per_pel(), 1);
    }

    #[test]
    fn planar_pages_owe_one_pass_per_plane() {
        let mut h = header(ColorSpace::Cmyk, ColorOrder::Planar, 8);
        update_num_colors(&mut h, false);
        assert_eq!(h.rows_per_page(), 40);

        let chunked = header(ColorSpace::Cmyk, ColorOrder::Chunked, 32);
        assert_eq!(chunked.rows_per_page(), 10);
    }
}
