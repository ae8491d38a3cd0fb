//! Schedule card export.
//!
//! Cards are authored as SVG documents at a fixed 1280×720 logical size,
//! rasterized with resvg and written as PNG or JPEG (quality 95). Two
//! layouts exist: a light minimal card and a dark gamers card.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::models::ScheduleRecord;
use crate::template::display_time;
use crate::utils;

pub const CARD_WIDTH: u32 = 1280;
pub const CARD_HEIGHT: u32 = 720;
const JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CardTemplate {
    #[default]
    Minimal,
    Gamers,
}

impl CardTemplate {
    pub fn as_str(self) -> &'static str {
        match self {
            CardTemplate::Minimal => "minimal",
            CardTemplate::Gamers => "gamers",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            CardTemplate::Minimal => CardTemplate::Gamers,
            CardTemplate::Gamers => CardTemplate::Minimal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }
}

/// Default file name for exported cards.
pub fn default_file_name(format: ImageFormat) -> String {
    format!("vtuber_schedule.{}", format.extension())
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to build card: {0}")]
    Svg(String),
    #[error("failed to encode image: {0}")]
    Encode(String),
    #[error("failed to write {0}: {1}")]
    Io(String, #[source] std::io::Error),
}

/// Render the card for a record and write it to `path`.
pub fn export_card(
    record: &ScheduleRecord,
    template: CardTemplate,
    format: ImageFormat,
    path: &Path,
) -> Result<(), ExportError> {
    let svg = build_card_svg(record, template);
    let pixmap = rasterize(&svg)?;

    let data = match format {
        ImageFormat::Png => pixmap
            .encode_png()
            .map_err(|e| ExportError::Encode(e.to_string()))?,
        ImageFormat::Jpeg => encode_jpeg(&pixmap)?,
    };

    fs::write(path, data).map_err(|e| ExportError::Io(path.display().to_string(), e))
}

fn rasterize(svg: &str) -> Result<tiny_skia::Pixmap, ExportError> {
    let mut options = resvg::usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = resvg::usvg::Tree::from_data(svg.as_bytes(), &options)
        .map_err(|e| ExportError::Svg(e.to_string()))?;

    let mut pixmap = tiny_skia::Pixmap::new(CARD_WIDTH, CARD_HEIGHT)
        .ok_or_else(|| ExportError::Svg("pixmap allocation failed".to_string()))?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    Ok(pixmap)
}

fn encode_jpeg(pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>, ExportError> {
    let mut rgb = image::RgbImage::new(CARD_WIDTH, CARD_HEIGHT);
    for (i, pixel) in pixmap.pixels().iter().enumerate() {
        let c = pixel.demultiply();
        let x = i as u32 % CARD_WIDTH;
        let y = i as u32 / CARD_WIDTH;
        rgb.put_pixel(x, y, image::Rgb([c.red(), c.green(), c.blue()]));
    }

    let mut out = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    encoder
        .encode_image(&rgb)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(out)
}

/// The SVG document for a record with the chosen layout.
pub fn build_card_svg(record: &ScheduleRecord, template: CardTemplate) -> String {
    match template {
        CardTemplate::Minimal => minimal_svg(record),
        CardTemplate::Gamers => gamers_svg(record),
    }
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn card_date(record: &ScheduleRecord) -> String {
    match record.date_value() {
        Some(date) => utils::format_full_date_ja(date),
        None => record.date.clone(),
    }
}

fn minimal_svg(record: &ScheduleRecord) -> String {
    let title = xml_escape(&record.title);
    let date = xml_escape(&card_date(record));
    let category = xml_escape(&record.category);
    let notes = xml_escape(&record.notes);
    let platform = xml_escape(&record.platform);

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">
  <rect width="{w}" height="{h}" fill="#ffffff"/>
  <rect x="0" y="0" width="{w}" height="240" fill="#bfdbfe" opacity="0.5"/>
  <rect x="0" y="480" width="{w}" height="240" fill="#fbcfe8" opacity="0.5"/>
  <text x="640" y="280" text-anchor="middle" font-size="64" font-weight="bold" fill="#1f2937">{title}</text>
  <text x="640" y="370" text-anchor="middle" font-size="40" fill="#374151">{date}</text>
  <text x="640" y="440" text-anchor="middle" font-size="30" fill="#4b5563">カテゴリ: {category}</text>
  <text x="640" y="510" text-anchor="middle" font-size="24" fill="#6b7280">{notes}</text>
  <text x="40" y="680" font-size="20" fill="#9ca3af">{platform}</text>
</svg>
"##,
        w = CARD_WIDTH,
        h = CARD_HEIGHT,
        title = title,
        date = date,
        category = category,
        notes = notes,
        platform = platform,
    )
}

fn gamers_svg(record: &ScheduleRecord) -> String {
    let title = xml_escape(&record.title);
    let category = xml_escape(&record.category);
    let platform = xml_escape(&record.platform);
    let notes = xml_escape(&record.notes);
    let time = xml_escape(&display_time(&record.time));
    let date = match record.date_value() {
        Some(d) => d.format("%m/%d").to_string(),
        None => record.date.clone(),
    };

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">
  <defs>
    <linearGradient id="cat" x1="0" y1="0" x2="1" y2="0">
      <stop offset="0" stop-color="#a855f7"/>
      <stop offset="1" stop-color="#ec4899"/>
    </linearGradient>
  </defs>
  <rect width="{w}" height="{h}" fill="#111827"/>
  <text x="48" y="90" font-size="36" font-weight="bold" letter-spacing="4" fill="url(#cat)">{category}</text>
  <text x="48" y="170" font-size="72" font-weight="bold" fill="#ffffff">{title}</text>
  <rect x="1040" y="48" width="192" height="80" rx="10" fill="none" stroke="#06b6d4" stroke-width="3"/>
  <text x="1136" y="100" text-anchor="middle" font-size="30" font-weight="bold" fill="#06b6d4">{platform}</text>
  <rect x="48" y="220" width="1184" height="340" rx="10" fill="#1f2937" opacity="0.5" stroke="#4b5563" stroke-width="2" stroke-dasharray="12 8"/>
  <text x="48" y="650" font-size="24" fill="#e5e7eb">{notes}</text>
  <text x="1232" y="640" text-anchor="end" font-size="48" font-weight="bold" fill="#ffffff">{date} <tspan fill="#06b6d4">|</tspan> {time}</text>
  <text x="1232" y="684" text-anchor="end" font-size="24" font-weight="bold" fill="#ffffff">STREAMING SOON</text>
</svg>
"##,
        w = CARD_WIDTH,
        h = CARD_HEIGHT,
        category = category,
        title = title,
        platform = platform,
        notes = notes,
        date = date,
        time = time,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record() -> ScheduleRecord {
        ScheduleRecord::new(
            "歌ってみた & 雑談 <新衣装>",
            NaiveDate::from_ymd_opt(2025, 8, 22).unwrap(),
            Some("20:00"),
            "歌枠",
            "Youtube",
            "\"初見\" さん歓迎",
        )
    }

    #[test]
    fn minimal_card_escapes_markup_characters() {
        let svg = build_card_svg(&record(), CardTemplate::Minimal);
        assert!(svg.contains("歌ってみた &amp; 雑談 &lt;新衣装&gt;"));
        assert!(svg.contains("&quot;初見&quot; さん歓迎"));
        assert!(!svg.contains("<新衣装>"));
    }

    #[test]
    fn cards_carry_the_fixed_logical_size() {
        for template in [CardTemplate::Minimal, CardTemplate::Gamers] {
            let svg = build_card_svg(&record(), template);
            assert!(svg.contains(r#"width="1280" height="720""#));
        }
    }

    #[test]
    fn gamers_card_shows_time_with_suffix_and_short_date() {
        let svg = build_card_svg(&record(), CardTemplate::Gamers);
        assert!(svg.contains("08/22"));
        assert!(svg.contains("20:00～"));
        assert!(svg.contains("STREAMING SOON"));
    }

    #[test]
    fn default_file_names_match_the_chosen_format() {
        assert_eq!(default_file_name(ImageFormat::Png), "vtuber_schedule.png");
        assert_eq!(default_file_name(ImageFormat::Jpeg), "vtuber_schedule.jpeg");
    }
}
