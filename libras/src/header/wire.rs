//! Fixed-layout binary codec for page header records.
//!
//! Records are written in the producer's native byte order. A reader that
//! sees a foreign-order sync word byte-reverses the numeric word run with
//! [`swap_numeric_prefix`] before decoding; text slots are never swapped.

use byteorder::{ByteOrder, NativeEndian as NE};

use super::{PageHeaderV1, PageHeaderV2};
use crate::error::Error;

/// Byte length of a revision 1 header record
pub const HEADER_V1_LEN: usize = 420;
/// Byte length of a full header record
pub const HEADER_V2_LEN: usize = 1796;

/// Offset of the first numeric field, right after the four leading text
/// slots
const NUMERIC_START: usize = 256;
/// Number of 32-bit words endianness conversion covers: the 41 numeric
/// words of the revision 1 record plus the 40 of the extension block
const NUMERIC_WORDS: usize = 81;

/// Byte-reverses every word of the numeric run in place. Applying it twice
/// is the identity.
pub(crate) fn swap_numeric_prefix(raw: &mut [u8; HEADER_V2_LEN]) {
    for word in raw[NUMERIC_START..NUMERIC_START + 4 * NUMERIC_WORDS].chunks_exact_mut(4) {
        let value = NE::read_u32(word).swap_bytes();
        NE::write_u32(word, value);
    }
}

fn text(slot: &[u8]) -> Result<String, Error> {
    let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
    Ok(std::str::from_utf8(&slot[..end])?.to_owned())
}

fn put_text(slot: &mut [u8], value: &str) -> Result<(), Error> {
    if value.len() > slot.len() {
        return Err(Error::TextTooLong { limit: slot.len() });
    }
    slot[..value.len()].copy_from_slice(value.as_bytes());
    slot[value.len()..].fill(0);
    Ok(())
}

fn flag(slot: &[u8]) -> bool {
    NE::read_u32(slot) != 0
}

pub(crate) fn decode(raw: &[u8; HEADER_V2_LEN]) -> Result<PageHeaderV2, Error> {
    let v1 = PageHeaderV1 {
        media_class: text(&raw[0..64])?,
        media_color: text(&raw[64..128])?,
        media_type: text(&raw[128..192])?,
        output_type: text(&raw[192..256])?,
        advance_distance: NE::read_u32(&raw[256..260]),
        advance_media: NE::read_u32(&raw[260..264]),
        collate: flag(&raw[264..268]),
        cut_media: NE::read_u32(&raw[268..272]),
        duplex: flag(&raw[272..276]),
        resolution: (NE::read_u32(&raw[276..280]), NE::read_u32(&raw[280..284])),
        imaging_bbox: [
            NE::read_u32(&raw[284..288]),
            NE::read_u32(&raw[288..292]),
            NE::read_u32(&raw[292..296]),
            NE::read_u32(&raw[296..300]),
        ],
        insert_sheet: flag(&raw[300..304]),
        jog: NE::read_u32(&raw[304..308]),
        leading_edge: NE::read_u32(&raw[308..312]),
        margins: (NE::read_u32(&raw[312..316]), NE::read_u32(&raw[316..320])),
        manual_feed: flag(&raw[320..324]),
        media_position: NE::read_u32(&raw[324..328]),
        media_weight: NE::read_u32(&raw[328..332]),
        mirror_print: flag(&raw[332..336]),
        negative_print: flag(&raw[336..340]),
        num_copies: NE::read_u32(&raw[340..344]),
        orientation: NE::read_u32(&raw[344..348]),
        output_face_up: flag(&raw[348..352]),
        page_size: (NE::read_u32(&raw[352..356]), NE::read_u32(&raw[356..360])),
        separations: flag(&raw[360..364]),
        tray_switch: flag(&raw[364..368]),
        tumble: flag(&raw[368..372]),
        width: NE::read_u32(&raw[372..376]),
        height: NE::read_u32(&raw[376..380]),
        media_code: NE::read_u32(&raw[380..384]),
        bits_per_color: NE::read_u32(&raw[384..388]),
        bits_per_pixel: NE::read_u32(&raw[388..392]),
        bytes_per_line: NE::read_u32(&raw[392..396]),
        color_order: NE::read_u32(&raw[396..400]),
        color_space: NE::read_u32(&raw[400..404]),
        compression: NE::read_u32(&raw[404..408]),
        row_count: NE::read_u32(&raw[408..412]),
        row_feed: NE::read_u32(&raw[412..416]),
        row_step: NE::read_u32(&raw[416..420]),
    };

    let mut vendor_text: [String; 16] = Default::default();
    for (i, slot) in vendor_text.iter_mut().enumerate() {
        *slot = text(&raw[580 + 64 * i..644 + 64 * i])?;
    }

    Ok(PageHeaderV2 {
        v1,
        num_colors: NE::read_u32(&raw[420..424]),
        borderless_scaling: NE::read_f32(&raw[424..428]),
        page_size_f: (NE::read_f32(&raw[428..432]), NE::read_f32(&raw[432..436])),
        imaging_bbox_f: [
            NE::read_f32(&raw[436..440]),
            NE::read_f32(&raw[440..444]),
            NE::read_f32(&raw[444..448]),
            NE::read_f32(&raw[448..452]),
        ],
        vendor_ints: std::array::from_fn(|i| NE::read_u32(&raw[452 + 4 * i..456 + 4 * i])),
        vendor_floats: std::array::from_fn(|i| NE::read_f32(&raw[516 + 4 * i..520 + 4 * i])),
        vendor_text,
        marker_type: text(&raw[1604..1668])?,
        rendering_intent: text(&raw[1668..1732])?,
        page_size_name: text(&raw[1732..1796])?,
    })
}

pub(crate) fn encode(header: &PageHeaderV2, raw: &mut [u8; HEADER_V2_LEN]) -> Result<(), Error> {
    let v1 = &header.v1;
    put_text(&mut raw[0..64], &v1.media_class)?;
    put_text(&mut raw[64..128], &v1.media_color)?;
    put_text(&mut raw[128..192], &v1.media_type)?;
    put_text(&mut raw[192..256], &v1.output_type)?;
    NE::write_u32(&mut raw[256..260], v1.advance_distance);
    NE::write_u32(&mut raw[260..264], v1.advance_media);
    NE::write_u32(&mut raw[264..268], u32::from(v1.collate));
    NE::write_u32(&mut raw[268..272], v1.cut_media);
    NE::write_u32(&mut raw[272..276], u32::from(v1.duplex));
    NE::write_u32(&mut raw[276..280], v1.resolution.0);
    NE::write_u32(&mut raw[280..284], v1.resolution.1);
    for (i, &edge) in v1.imaging_bbox.iter().enumerate() {
        NE::write_u32(&mut raw[284 + 4 * i..288 + 4 * i], edge);
    }
    NE::write_u32(&mut raw[300..304], u32::from(v1.insert_sheet));
    NE::write_u32(&mut raw[304..308], v1.jog);
    NE::write_u32(&mut raw[308..312], v1.leading_edge);
    NE::write_u32(&mut raw[312..316], v1.margins.0);
    NE::write_u32(&mut raw[316..320], v1.margins.1);
    NE::write_u32(&mut raw[320..324], u32::from(v1.manual_feed));
    NE::write_u32(&mut raw[324..328], v1.media_position);
    NE::write_u32(&mut raw[328..332], v1.media_weight);
    NE::write_u32(&mut raw[332..336], u32::from(v1.mirror_print));
    NE::write_u32(&mut raw[336..340], u32::from(v1.negative_print));
    NE::write_u32(&mut raw[340..344], v1.num_copies);
    NE::write_u32(&mut raw[344..348], v1.orientation);
    NE::write_u32(&mut raw[348..352], u32::from(v1.output_face_up));
    NE::write_u32(&mut raw[352..356], v1.page_size.0);
    NE::write_u32(&mut raw[356..360], v1.page_size.1);
    NE::write_u32(&mut raw[360..364], u32::from(v1.separations));
    NE::write_u32(&mut raw[364..368], u32::from(v1.tray_switch));
    NE::write_u32(&mut raw[368..372], u32::from(v1.tumble));
    NE::write_u32(&mut raw[372..376], v1.width);
    NE::write_u32(&mut raw[376..380], v1.height);
    NE::write_u32(&mut raw[380..384], v1.media_code);
    NE::write_u32(&mut raw[384..388], v1.bits_per_color);
    NE::write_u32(&mut raw[388..392], v1.bits_per_pixel);
    NE::write_u32(&mut raw[392..396], v1.bytes_per_line);
    NE::write_u32(&mut raw[396..400], v1.color_order);
    NE::write_u32(&mut raw[400..404], v1.color_space);
    NE::write_u32(&mut raw[404..408], v1.compression);
    NE::write_u32(&mut raw[408..412], v1.row_count);
    NE::write_u32(&mut raw[412..416], v1.row_feed);
    NE::write_u32(&mut raw[416..420], v1.row_step);

    NE::write_u32(&mut raw[420..424], header.num_colors);
    NE::write_f32(&mut raw[424..428], header.borderless_scaling);
    NE::write_f32(&mut raw[428..432], header.page_size_f.0);
    NE::write_f32(&mut raw[432..436], header.page_size_f.1);
    for (i, &edge) in header.imaging_bbox_f.iter().enumerate() {
        NE::write_f32(&mut raw[436 + 4 * i..440 + 4 * i], edge);
    }
    for (i, &value) in header.vendor_ints.iter().enumerate() {
        NE::write_u32(&mut raw[452 + 4 * i..456 + 4 * i], value);
    }
    for (i, &value) in header.vendor_floats.iter().enumerate() {
        NE::write_f32(&mut raw[516 + 4 * i..520 + 4 * i], value);
    }
    for (i, value) in header.vendor_text.iter().enumerate() {
        put_text(&mut raw[580 + 64 * i..644 + 64 * i], value)?;
    }
    put_text(&mut raw[1604..1668], &header.marker_type)?;
    put_text(&mut raw[1668..1732], &header.rendering_intent)?;
    put_text(&mut raw[1732..1796], &header.page_size_name)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{ColorOrder, ColorSpace};

    fn sample() -> PageHeaderV2 {
        let mut header = PageHeaderV2::builder()
            .v1(PageHeaderV1::builder()
                .media_class("Roll".to_owned())
                .media_type("stationery".to_owned())
                .advance_distance(12)
                .collate(true)
                .duplex(true)
                .resolution((600, 300))
                .imaging_bbox([18, 36, 594, 756])
                .margins((18, 36))
                .num_copies(2)
                .page_size((612, 792))
                .tumble(true)
                .width(8)
                .height(4)
                .bits_per_color(8)
                .bits_per_pixel(24)
                .bytes_per_line(24)
                .color_order(ColorOrder::Chunked as u32)
                .color_space(ColorSpace::Rgb as u32)
                .build())
            .num_colors(3)
            .borderless_scaling(1.5)
            .page_size_f((612.5, 792.25))
            .marker_type("toner".to_owned())
            .rendering_intent("perceptual".to_owned())
            .page_size_name("na_letter_8.5x11in".to_owned())
            .build();
        header.vendor_ints[0] = 42;
        header.vendor_ints[15] = 7;
        header.vendor_floats[3] = -0.5;
        header.vendor_text[0] = "first".to_owned();
        header.vendor_text[15] = "last".to_owned();
        header
    }

    #[test]
    fn records_survive_an_encode_decode_cycle() {
        let header = sample();
        let mut raw = [0u8; HEADER_V2_LEN];
        encode(&header, &mut raw).unwrap();
        let back = decode(&raw).unwrap();
        assert_eq!(back, header);
    }

    #[test]
    fn numeric_prefix_swap_is_an_involution() {
        let mut raw = [0u8; HEADER_V2_LEN];
        encode(&sample(), &mut raw).unwrap();
        let original = raw;
        swap_numeric_prefix(&mut raw);
        assert_ne!(raw, original);
        // text slots are outside the swapped run
        assert_eq!(raw[0..256], original[0..256]);
        assert_eq!(raw[580..], original[580..]);
        swap_numeric_prefix(&mut raw);
        assert_eq!(raw, original);
    }

    #[test]
    fn swapped_record_decodes_to_reversed_words() {
        let mut raw = [0u8; HEADER_V2_LEN];
        encode(&sample(), &mut raw).unwrap();
        swap_numeric_prefix(&mut raw);
        let foreign = decode(&raw).unwrap();
        assert_eq!(foreign.v1.advance_distance, 12u32.swap_bytes());
        assert_eq!(foreign.v1.media_class, "Roll");
    }

    #[test]
    fn oversized_text_is_rejected() {
        let mut header = sample();
        header.v1.media_class = "x".repeat(65);
        let mut raw = [0u8; HEADER_V2_LEN];
        assert!(matches!(
            encode(&header, &mut raw),
            Err(Error::TextTooLong { limit: 64 })
        ));
    }

    #[test]
    fn text_slots_stop_at_the_first_nul() {
        let mut raw = [0u8; HEADER_V2_LEN];
        raw[0] = b'a';
        raw[1] = b'b';
        // bytes after the terminator are ignored
        raw[3] = b'z';
        let header = decode(&raw).unwrap();
        assert_eq!(header.v1.media_class, "ab");
    }
}
