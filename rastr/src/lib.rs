use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::{bail, Context, Result};
use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder};
use libras::{
    ColorOrder, ColorSpace, PageHeaderV1, PageHeaderV2, RasterReader, RasterWriter,
};
use tracing::{debug, info, instrument};

#[instrument]
pub fn raster_to_image(ras_file: &Path, output_name: &Path) -> Result<()> {
    let file = File::open(ras_file).context("open raster stream")?;
    let mut reader = RasterReader::new(BufReader::new(file))?;
    debug!(sync = ?reader.sync(), "opened raster stream");

    let Some(page) = reader.read_header()? else {
        bail!("stream holds no pages");
    };
    let (width, height) = (page.v1.width, page.v1.height);
    debug!("Raster width, height: {:?}", (&width, &height));

    let (color_type, components) = match (page.color_space(), page.v1.bits_per_pixel) {
        (Some(ColorSpace::White | ColorSpace::Black), 8) => (ExtendedColorType::L8, 1),
        (Some(ColorSpace::Rgb), 24) => (ExtendedColorType::Rgb8, 3),
        (space, bits) => bail!("unsupported page format: {space:?} at {bits} bits per pixel"),
    };
    let line = page.v1.bytes_per_line as usize;
    if line != width as usize * components {
        bail!("row padding is not supported for image export");
    }

    let mut pixels = vec![0u8; line * height as usize];
    for row in pixels.chunks_exact_mut(line) {
        if reader.read_pixels(row)? < row.len() {
            bail!("stream ended before the page was complete");
        }
    }
    // black-ink pages carry full ink at full value; flip for light-on-dark
    if page.color_space() == Some(ColorSpace::Black) {
        for value in &mut pixels {
            *value = 255 - *value;
        }
    }

    let output = File::options()
        .create(true)
        .write(true)
        .truncate(true)
        .open(output_name)?;

    info!("Writing decoded page to {}", output_name.display());
    let encoder = PngEncoder::new(output);
    encoder.write_image(&pixels, width, height, color_type)?;
    info!(
        "Successfully wrote decoded page to {}",
        output_name.display()
    );
    Ok(())
}

#[instrument]
pub fn image_to_raster(image_file: &Path, output_name: &Path) -> Result<()> {
    let img = image::open(image_file).context("open input image")?;
    let (width, height) = (img.width(), img.height());
    debug!("Image width, height: {:?}", (&width, &height));

    let (space, bits, data) = match img {
        image::DynamicImage::ImageLuma8(gray) => (ColorSpace::White, 8, gray.into_raw()),
        other => (ColorSpace::Rgb, 24, other.into_rgb8().into_raw()),
    };
    let header = PageHeaderV2::builder()
        .v1(PageHeaderV1::builder()
            .width(width)
            .height(height)
            .resolution((300, 300))
            .bits_per_color(8)
            .bits_per_pixel(bits)
            .bytes_per_line(width * (bits / 8))
            .color_order(ColorOrder::Chunked as u32)
            .color_space(space as u32)
            .build())
        .build();

    let file = File::options()
        .create(true)
        .write(true)
        .truncate(true)
        .open(output_name)?;
    let mut writer = RasterWriter::new(BufWriter::new(file))?;
    writer.write_header(&header)?;
    writer.write_pixels(&data)?;
    writer.into_inner().flush()?;
    info!("Finished writing raster stream to {}", output_name.display());
    Ok(())
}

#[instrument]
pub fn describe_raster(ras_file: &Path) -> Result<()> {
    let file = File::open(ras_file).context("open raster stream")?;
    let mut reader = RasterReader::new(BufReader::new(file))?;
    println!("sync word: {:?}", reader.sync());

    let mut page_number = 0u32;
    while let Some(page) = reader.read_header()? {
        page_number += 1;
        println!(
            "page {page_number}: {}x{} pixels, {} bits/pixel, {} colors, order {:?}, space {:?}",
            page.v1.width,
            page.v1.height,
            page.v1.bits_per_pixel,
            page.num_colors,
            page.color_order(),
            page.color_space(),
        );
        // no seeking in a raster stream; skip the page row by row
        let mut row = vec![0u8; page.v1.bytes_per_line as usize];
        while reader.read_pixels(&mut row)? > 0 {}
    }
    if page_number == 0 {
        println!("stream holds no pages");
    }
    Ok(())
}
