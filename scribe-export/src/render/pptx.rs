//! PowerPoint (OOXML) packaging of a slide deck.
//!
//! Writes a minimal but complete presentation package: one slide master, one
//! blank layout, one theme, and a slide per [`Slide`] built from text boxes.

use std::io::{Cursor, Write};

use chrono::{DateTime, Utc};
use zip::ZipWriter;
use zip::result::ZipResult;
use zip::write::SimpleFileOptions;

use super::slides::Slide;
use super::xml_escape;
use crate::options::SlideTemplate;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

// Slide geometry in EMU (4:3, 10in x 7.5in).
const SLIDE_CX: u64 = 9_144_000;
const SLIDE_CY: u64 = 6_858_000;
const MARGIN: u64 = 457_200;

/// Colors and font of a template.
#[derive(Debug, Clone, Copy)]
struct Style {
    background: Option<&'static str>,
    title: &'static str,
    body: &'static str,
    accent: &'static str,
    font: &'static str,
}

fn style(template: SlideTemplate) -> Style {
    match template {
        SlideTemplate::Default => Style {
            background: None,
            title: "1F3864",
            body: "404040",
            accent: "4472C4",
            font: "Calibri",
        },
        SlideTemplate::Minimal => Style {
            background: None,
            title: "000000",
            body: "595959",
            accent: "A6A6A6",
            font: "Arial",
        },
        SlideTemplate::Corporate => Style {
            background: Some("1F3864"),
            title: "FFFFFF",
            body: "D9E2F3",
            accent: "FFC000",
            font: "Calibri",
        },
    }
}

/// Package `slides` as a `.pptx` archive.
pub fn write_pptx(
    slides: &[Slide],
    template: SlideTemplate,
    title: &str,
    created: DateTime<Utc>,
) -> ZipResult<Vec<u8>> {
    let style = style(template);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut parts: Vec<(String, String)> = vec![
        ("[Content_Types].xml".into(), content_types(slides.len())),
        ("_rels/.rels".into(), root_rels()),
        ("docProps/core.xml".into(), core_props(title, created)),
        ("docProps/app.xml".into(), app_props(slides.len())),
        ("ppt/presentation.xml".into(), presentation(slides.len())),
        ("ppt/_rels/presentation.xml.rels".into(), presentation_rels(slides.len())),
        ("ppt/slideMasters/slideMaster1.xml".into(), slide_master()),
        (
            "ppt/slideMasters/_rels/slideMaster1.xml.rels".into(),
            rels(&[
                ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                ("rId2", "theme", "../theme/theme1.xml"),
            ]),
        ),
        ("ppt/slideLayouts/slideLayout1.xml".into(), slide_layout()),
        (
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels".into(),
            rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
        ),
        ("ppt/theme/theme1.xml".into(), theme(&style)),
    ];
    for (i, slide) in slides.iter().enumerate() {
        let n = i + 1;
        parts.push((format!("ppt/slides/slide{n}.xml"), slide_xml(slide, i == 0, &style)));
        parts.push((
            format!("ppt/slides/_rels/slide{n}.xml.rels"),
            rels(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
        ));
    }

    for (name, xml) in parts {
        zip.start_file(name, options)?;
        zip.write_all(xml.as_bytes())?;
    }
    Ok(zip.finish()?.into_inner())
}

fn content_types(slide_count: usize) -> String {
    let mut xml = format!(
        r#"{XML_DECL}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#
    );
    for n in 1..=slide_count {
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn root_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{NS_RELS}"><Relationship Id="rId1" Type="{REL_BASE}/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="{REL_BASE}/extended-properties" Target="docProps/app.xml"/></Relationships>"#
    )
}

fn core_props(title: &str, created: DateTime<Utc>) -> String {
    let title = xml_escape(title);
    let created = created.format("%Y-%m-%dT%H:%M:%SZ");
    format!(
        r#"{XML_DECL}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{title}</dc:title><dc:creator>Scribe</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{created}</dcterms:modified></cp:coreProperties>"#
    )
}

fn app_props(slide_count: usize) -> String {
    format!(
        r#"{XML_DECL}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>Scribe</Application><Slides>{slide_count}</Slides></Properties>"#
    )
}

fn presentation(slide_count: usize) -> String {
    let ids: String = (0..slide_count)
        .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, 3 + i))
        .collect();
    format!(
        r#"{XML_DECL}<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{ids}</p:sldIdLst><p:sldSz cx="{SLIDE_CX}" cy="{SLIDE_CY}" type="screen4x3"/><p:notesSz cx="{SLIDE_CY}" cy="{SLIDE_CX}"/></p:presentation>"#
    )
}

fn presentation_rels(slide_count: usize) -> String {
    let mut entries = vec![
        ("rId1".to_string(), "slideMaster", "slideMasters/slideMaster1.xml".to_string()),
        ("rId2".to_string(), "theme", "theme/theme1.xml".to_string()),
    ];
    for n in 1..=slide_count {
        entries.push((format!("rId{}", n + 2), "slide", format!("slides/slide{n}.xml")));
    }
    let borrowed: Vec<(&str, &str, &str)> = entries
        .iter()
        .map(|(id, kind, target)| (id.as_str(), *kind, target.as_str()))
        .collect();
    rels(&borrowed)
}

fn rels(entries: &[(&str, &str, &str)]) -> String {
    let body: String = entries
        .iter()
        .map(|(id, kind, target)| {
            format!(r#"<Relationship Id="{id}" Type="{REL_BASE}/{kind}" Target="{target}"/>"#)
        })
        .collect();
    format!(r#"{XML_DECL}<Relationships xmlns="{NS_RELS}">{body}</Relationships>"#)
}

const EMPTY_TREE: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#;

fn slide_master() -> String {
    format!(
        r#"{XML_DECL}<p:sldMaster xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{EMPTY_TREE}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#
    )
}

fn slide_layout() -> String {
    format!(
        r#"{XML_DECL}<p:sldLayout xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree>{EMPTY_TREE}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

fn theme(style: &Style) -> String {
    let font = style.font;
    let accent = style.accent;
    let fills = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#.repeat(3);
    let lines: String = [9525, 25400, 38100]
        .iter()
        .map(|w| format!(r#"<a:ln w="{w}"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#))
        .collect();
    let effects = "<a:effectStyle><a:effectLst/></a:effectStyle>".repeat(3);
    format!(
        r#"{XML_DECL}<a:theme xmlns:a="{NS_A}" name="Scribe"><a:themeElements><a:clrScheme name="Scribe"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F3864"/></a:dk2><a:lt2><a:srgbClr val="E7E6E6"/></a:lt2><a:accent1><a:srgbClr val="{accent}"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="Scribe"><a:majorFont><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Scribe"><a:fillStyleLst>{fills}</a:fillStyleLst><a:lnStyleLst>{lines}</a:lnStyleLst><a:effectStyleLst>{effects}</a:effectStyleLst><a:bgFillStyleLst>{fills}</a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#
    )
}

struct TextBox<'a> {
    id: u32,
    name: &'a str,
    y: u64,
    cy: u64,
    size: u32,
    bold: bool,
    centered: bool,
}

fn run(text: &str, size: u32, bold: bool, color: &str, font: &str) -> String {
    let b = if bold { r#" b="1""# } else { "" };
    format!(
        r#"<a:r><a:rPr lang="en-US" sz="{size}"{b} dirty="0"><a:solidFill><a:srgbClr val="{color}"/></a:solidFill><a:latin typeface="{font}"/></a:rPr><a:t>{}</a:t></a:r>"#,
        xml_escape(text)
    )
}

fn text_box(tb: &TextBox, paragraphs: &[(String, &str)], style: &Style) -> String {
    let algn = if tb.centered { r#"<a:pPr algn="ctr"/>"# } else { "" };
    let body: String = if paragraphs.is_empty() {
        r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#.to_string()
    } else {
        paragraphs
            .iter()
            .map(|(text, color)| {
                if text.is_empty() {
                    format!(r#"<a:p>{algn}<a:endParaRPr lang="en-US"/></a:p>"#)
                } else {
                    format!("<a:p>{algn}{}</a:p>", run(text, tb.size, tb.bold, color, style.font))
                }
            })
            .collect()
    };
    let (id, name, y, cy) = (tb.id, tb.name, tb.y, tb.cy);
    let cx = SLIDE_CX - 2 * MARGIN;
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{MARGIN}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square" rtlCol="0"><a:normAutofit/></a:bodyPr><a:lstStyle/>{body}</p:txBody></p:sp>"#
    )
}

fn slide_xml(slide: &Slide, is_title: bool, style: &Style) -> String {
    let background = style
        .background
        .map(|c| {
            format!(r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{c}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#)
        })
        .unwrap_or_default();

    let mut shapes = String::new();
    if is_title {
        shapes.push_str(&text_box(
            &TextBox { id: 2, name: "Title", y: 2_130_425, cy: 1_470_025, size: 4000, bold: true, centered: true },
            &[(slide.title.clone(), style.title)],
            style,
        ));
        if let Some(subtitle) = &slide.subtitle {
            shapes.push_str(&text_box(
                &TextBox { id: 3, name: "Subtitle", y: 3_886_200, cy: 1_752_600, size: 2000, bold: false, centered: true },
                &[(subtitle.clone(), style.body)],
                style,
            ));
        }
    } else {
        shapes.push_str(&text_box(
            &TextBox { id: 2, name: "Title", y: 274_638, cy: 1_143_000, size: 3200, bold: true, centered: false },
            &[(slide.title.clone(), style.title)],
            style,
        ));
        let body: Vec<(String, &str)> = slide
            .body
            .iter()
            .map(|p| (p.text.clone(), p.color.unwrap_or(style.body)))
            .collect();
        shapes.push_str(&text_box(
            &TextBox { id: 3, name: "Content", y: 1_600_200, cy: 4_525_963, size: 1800, bold: false, centered: false },
            &body,
            style,
        ));
    }

    format!(
        r#"{XML_DECL}<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld>{background}<p:spTree>{EMPTY_TREE}{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}
