use crate::assets::PosterAssets;
use crate::model::{DrawCommand, PosterLayout, TextAnchor};
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root `<svg id>`; also prefixes the accessible title id.
    pub diagram_id: Option<String>,
    /// When true, emit a `<title>` element with the poster title.
    pub include_title: bool,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            include_title: true,
        }
    }
}

/// Serializes a poster's draw commands into a standalone SVG document.
///
/// Image commands whose slot has no loaded asset are skipped.
pub fn render_poster_svg(
    layout: &PosterLayout,
    assets: &PosterAssets,
    options: &SvgRenderOptions,
) -> String {
    let id = options.diagram_id.as_deref().unwrap_or("wordloom");
    let id_esc = escape_xml(id);
    let w = fmt(layout.width.max(1.0));
    let h = fmt(layout.height.max(1.0));

    let mut out = String::new();
    let labelled = if options.include_title {
        format!(r#" aria-labelledby="poster-title-{id_esc}""#)
    } else {
        String::new()
    };
    let _ = write!(
        &mut out,
        r#"<svg id="{id_esc}" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img"{labelled}>"#
    );
    if options.include_title {
        let _ = write!(
            &mut out,
            r#"<title id="poster-title-{id_esc}">{}</title>"#,
            escape_xml(&layout.title)
        );
    }
    let _ = write!(
        &mut out,
        r#"<g font-family="{}">"#,
        escape_attr(&layout.font_family)
    );

    for command in &layout.commands {
        render_command(&mut out, command, assets);
    }

    out.push_str("</g></svg>\n");
    out
}

fn render_command(out: &mut String, command: &DrawCommand, assets: &PosterAssets) {
    match command {
        DrawCommand::Rect {
            x,
            y,
            width,
            height,
            corner_radius,
            fill,
        } => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                fmt(*x),
                fmt(*y),
                fmt(width.max(0.0)),
                fmt(height.max(0.0))
            );
            if *corner_radius > 0.0 {
                let _ = write!(out, r#" rx="{}""#, fmt(*corner_radius));
            }
            let _ = write!(out, r#" fill="{}"/>"#, escape_attr(fill));
        }
        DrawCommand::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            stroke_width,
        } => {
            let _ = write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
                fmt(*x1),
                fmt(*y1),
                fmt(*x2),
                fmt(*y2),
                escape_attr(stroke),
                fmt(*stroke_width)
            );
        }
        DrawCommand::Text {
            x,
            y,
            text,
            font_size,
            bold,
            fill,
            anchor,
            letter_spacing,
            class,
        } => {
            out.push_str("<text");
            if let Some(class) = class {
                let _ = write!(out, r#" class="{}""#, escape_attr(class));
            }
            let _ = write!(
                out,
                r#" x="{}" y="{}" font-size="{}" fill="{}""#,
                fmt(*x),
                fmt(*y),
                fmt(*font_size),
                escape_attr(fill)
            );
            if *bold {
                out.push_str(r#" font-weight="bold""#);
            }
            if *anchor != TextAnchor::Start {
                let _ = write!(out, r#" text-anchor="{}""#, anchor.as_svg());
            }
            if *letter_spacing != 0.0 {
                let _ = write!(out, r#" letter-spacing="{}""#, fmt(*letter_spacing));
            }
            let _ = write!(out, ">{}</text>", escape_xml(text));
        }
        DrawCommand::Image {
            slot,
            x,
            y,
            width,
            height,
        } => {
            let Some(image) = assets.get(*slot) else {
                return;
            };
            let _ = write!(
                out,
                r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid meet" xlink:href="{}"/>"#,
                fmt(*x),
                fmt(*y),
                fmt(width.max(0.0)),
                fmt(height.max(0.0)),
                image.data_uri()
            );
        }
    }
}

fn fmt(v: f64) -> String {
    // Round-trippable decimal form without `-0` or tiny float noise from layout arithmetic.
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    } else {
        v = (v * 1000.0).round() / 1000.0;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

/// Characters XML 1.0 cannot carry even as references.
fn is_xml_forbidden(ch: char) -> bool {
    matches!(ch, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}')
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            c if is_xml_forbidden(c) => {}
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_xml(text)
}
