use crate::captions::{CaptionInstruction, RowLayout};

/// Clip height the base font metrics were tuned against
const REFERENCE_HEIGHT: f64 = 688.0;

/// ffmpeg `drawtext` look for burned-in captions, scaled to the clip
#[derive(Debug, Clone, PartialEq)]
pub struct BurnInStyle {
    pub font: String,
    pub font_size: u32,
    pub border_width: u32,
    pub layout: RowLayout,
}

impl BurnInStyle {
    /// Metrics for a clip `video_height` pixels tall
    pub fn for_height(video_height: u32) -> Self {
        let scale = video_height as f64 / REFERENCE_HEIGHT;
        let px = |base: f64| (base * scale) as u32;

        Self {
            font: "PingFang SC".to_string(),
            font_size: px(32.0),
            border_width: px(3.0),
            layout: RowLayout {
                bottom_offset: px(100.0),
                row_height: px(40.0),
            },
        }
    }
}

/// Escape text for a single-quoted drawtext value
pub fn escape_drawtext(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "'\\''")
        .replace(':', "\\:")
}

/// One `drawtext` filter per caption row
pub fn drawtext_filters(instructions: &[CaptionInstruction], style: &BurnInStyle) -> Vec<String> {
    let mut filters = Vec::new();

    for instruction in instructions {
        for (text, index) in instruction.rows() {
            let y_offset = style.layout.y_from_bottom(index);
            filters.push(format!(
                "drawtext=text='{}':enable='between(t,{:.3},{:.3})':font='{}':fontsize={}:fontcolor=white:borderw={}:bordercolor=black:x=(w-text_w)/2:y=h-{}",
                escape_drawtext(text),
                instruction.start,
                instruction.end,
                style.font,
                style.font_size,
                style.border_width,
                y_offset
            ));
        }
    }

    filters
}

/// Filter graph that trims the looped clip to `duration` and burns captions in
pub fn filter_graph(
    duration: f64,
    instructions: &[CaptionInstruction],
    style: &BurnInStyle,
) -> String {
    let mut parts = vec![format!("[0:v]trim=0:{},setpts=PTS-STARTPTS", duration)];
    parts.extend(drawtext_filters(instructions, style));
    format!("{}[v]", parts.join(","))
}
