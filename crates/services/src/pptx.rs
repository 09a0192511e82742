//! PresentationML (.pptx) writer.
//!
//! Emits the smallest package PowerPoint and LibreOffice open without repair:
//! one master, one blank layout, one theme and one part per slide.

use crate::deck::{DeckSlide, Paragraph, SlideDeck, TextBox};
use chrono::{SecondsFormat, Utc};
use quick_xml::escape::escape;
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_PML: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_PML: &str = "application/vnd.openxmlformats-officedocument.presentationml";

/// Relationship ids in presentation.xml.rels before the first slide
const FIXED_PRESENTATION_RELS: usize = 5;

const EMPTY_GROUP: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

/// Serialize a deck into .pptx bytes
pub fn write_pptx(deck: &SlideDeck) -> zip::result::ZipResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut put = |name: &str, body: String| -> zip::result::ZipResult<()> {
        zip.start_file(name, options.clone())?;
        zip.write_all(body.as_bytes())?;
        Ok(())
    };

    put("[Content_Types].xml", content_types(deck.slides.len()))?;
    put("_rels/.rels", root_rels())?;
    put("docProps/core.xml", core_props(&deck.title))?;
    put("docProps/app.xml", app_props(deck.slides.len()))?;
    put("ppt/presentation.xml", presentation(deck))?;
    put("ppt/_rels/presentation.xml.rels", presentation_rels(deck.slides.len()))?;
    put("ppt/presProps.xml", format!("{XML_DECL}<p:presentationPr {NS_PML}/>"))?;
    put("ppt/viewProps.xml", format!("{XML_DECL}<p:viewPr {NS_PML}/>"))?;
    put(
        "ppt/tableStyles.xml",
        format!(
            r#"{XML_DECL}<a:tblStyleLst xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#
        ),
    )?;
    put("ppt/slideMasters/slideMaster1.xml", slide_master())?;
    put(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        rels(&[
            ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
            ("rId2", "theme", "../theme/theme1.xml"),
        ]),
    )?;
    put("ppt/slideLayouts/slideLayout1.xml", slide_layout())?;
    put(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
    )?;
    put("ppt/theme/theme1.xml", theme())?;

    for (i, slide) in deck.slides.iter().enumerate() {
        let n = i + 1;
        put(&format!("ppt/slides/slide{n}.xml"), slide_xml(deck, slide))?;
        put(
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            rels(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
        )?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Escaped text with characters XML 1.0 cannot carry removed
fn text(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_control() || *c == '\t' || *c == '\n')
        .collect();
    escape(cleaned.as_str()).into_owned()
}

fn rels(entries: &[(&str, &str, &str)]) -> String {
    let mut out = format!(r#"{XML_DECL}<Relationships xmlns="{REL_NS}">"#);
    for (id, kind, target) in entries {
        let _ = write!(
            out,
            r#"<Relationship Id="{id}" Type="{REL_TYPE}/{kind}" Target="{target}"/>"#
        );
    }
    out.push_str("</Relationships>");
    out
}

fn content_types(slides: usize) -> String {
    let mut out = format!(
        r#"{XML_DECL}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>"#
    );
    let overrides = [
        ("/ppt/presentation.xml", format!("{CT_PML}.presentation.main+xml")),
        ("/ppt/slideMasters/slideMaster1.xml", format!("{CT_PML}.slideMaster+xml")),
        ("/ppt/slideLayouts/slideLayout1.xml", format!("{CT_PML}.slideLayout+xml")),
        ("/ppt/presProps.xml", format!("{CT_PML}.presProps+xml")),
        ("/ppt/viewProps.xml", format!("{CT_PML}.viewProps+xml")),
        ("/ppt/tableStyles.xml", format!("{CT_PML}.tableStyles+xml")),
        (
            "/ppt/theme/theme1.xml",
            "application/vnd.openxmlformats-officedocument.theme+xml".to_string(),
        ),
        (
            "/docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml".to_string(),
        ),
        (
            "/docProps/app.xml",
            "application/vnd.openxmlformats-officedocument.extended-properties+xml".to_string(),
        ),
    ];
    for (part, ct) in overrides {
        let _ = write!(out, r#"<Override PartName="{part}" ContentType="{ct}"/>"#);
    }
    for n in 1..=slides {
        let _ = write!(
            out,
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="{CT_PML}.slide+xml"/>"#
        );
    }
    out.push_str("</Types>");
    out
}

fn root_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{REL_NS}"><Relationship Id="rId1" Type="{REL_TYPE}/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="{REL_TYPE}/extended-properties" Target="docProps/app.xml"/></Relationships>"#
    )
}

fn core_props(title: &str) -> String {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    format!(
        r#"{XML_DECL}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title><dc:creator>Armin AI</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">{now}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{now}</dcterms:modified></cp:coreProperties>"#,
        text(title)
    )
}

fn app_props(slides: usize) -> String {
    format!(
        r#"{XML_DECL}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>Armin AI</Application><PresentationFormat>Widescreen</PresentationFormat><Slides>{slides}</Slides></Properties>"#
    )
}

fn presentation(deck: &SlideDeck) -> String {
    let (cx, cy) = deck.layout.size_emu();
    let rtl = if deck.rtl { r#" rtl="1""# } else { "" };
    let mut out = format!(
        r#"{XML_DECL}<p:presentation {NS_PML}{rtl} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>"#
    );
    for i in 0..deck.slides.len() {
        let _ = write!(
            out,
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            256 + i,
            FIXED_PRESENTATION_RELS + 1 + i
        );
    }
    let _ = write!(
        out,
        r#"</p:sldIdLst><p:sldSz cx="{cx}" cy="{cy}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
    );
    out
}

fn presentation_rels(slides: usize) -> String {
    let mut entries: Vec<(String, &str, String)> = vec![
        ("rId1".into(), "slideMaster", "slideMasters/slideMaster1.xml".into()),
        ("rId2".into(), "presProps", "presProps.xml".into()),
        ("rId3".into(), "viewProps", "viewProps.xml".into()),
        ("rId4".into(), "theme", "theme/theme1.xml".into()),
        ("rId5".into(), "tableStyles", "tableStyles.xml".into()),
    ];
    for n in 1..=slides {
        entries.push((
            format!("rId{}", FIXED_PRESENTATION_RELS + n),
            "slide",
            format!("slides/slide{n}.xml"),
        ));
    }
    let borrowed: Vec<(&str, &str, &str)> = entries
        .iter()
        .map(|(id, kind, target)| (id.as_str(), *kind, target.as_str()))
        .collect();
    rels(&borrowed)
}

fn slide_master() -> String {
    format!(
        r#"{XML_DECL}<p:sldMaster {NS_PML}><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{EMPTY_GROUP}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#
    )
}

fn slide_layout() -> String {
    format!(
        r#"{XML_DECL}<p:sldLayout {NS_PML} type="blank" preserve="1"><p:cSld name="Blank"><p:spTree>{EMPTY_GROUP}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

fn theme() -> String {
    let colors = [
        ("dk1", r#"<a:sysClr val="windowText" lastClr="000000"/>"#),
        ("lt1", r#"<a:sysClr val="window" lastClr="FFFFFF"/>"#),
        ("dk2", r#"<a:srgbClr val="1F497D"/>"#),
        ("lt2", r#"<a:srgbClr val="EEECE1"/>"#),
        ("accent1", r#"<a:srgbClr val="0088CC"/>"#),
        ("accent2", r#"<a:srgbClr val="005588"/>"#),
        ("accent3", r#"<a:srgbClr val="9BBB59"/>"#),
        ("accent4", r#"<a:srgbClr val="8064A2"/>"#),
        ("accent5", r#"<a:srgbClr val="4BACC6"/>"#),
        ("accent6", r#"<a:srgbClr val="F79646"/>"#),
        ("hlink", r#"<a:srgbClr val="0000FF"/>"#),
        ("folHlink", r#"<a:srgbClr val="800080"/>"#),
    ];
    let mut clr = String::new();
    for (name, value) in colors {
        let _ = write!(clr, "<a:{name}>{value}</a:{name}>");
    }
    let fonts = r#"<a:latin typeface="Arial"/><a:ea typeface=""/><a:cs typeface="Tahoma"/>"#;
    let fill = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = r#"<a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#;
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";
    format!(
        r#"{XML_DECL}<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Armin"><a:themeElements><a:clrScheme name="Armin">{clr}</a:clrScheme><a:fontScheme name="Armin"><a:majorFont>{fonts}</a:majorFont><a:minorFont>{fonts}</a:minorFont></a:fontScheme><a:fmtScheme name="Armin"><a:fillStyleLst>{fill}{fill}{fill}</a:fillStyleLst><a:lnStyleLst>{line}{line}{line}</a:lnStyleLst><a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst><a:bgFillStyleLst>{fill}{fill}{fill}</a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#
    )
}

fn slide_xml(deck: &SlideDeck, slide: &DeckSlide) -> String {
    let mut out = format!(r#"{XML_DECL}<p:sld {NS_PML}><p:cSld><p:spTree>{EMPTY_GROUP}"#);
    for (i, text_box) in slide.text_boxes.iter().enumerate() {
        // id 1 belongs to the group shape
        write_text_box(&mut out, deck, text_box, i + 2);
    }
    out.push_str(
        "</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>",
    );
    out
}

fn write_text_box(out: &mut String, deck: &SlideDeck, text_box: &TextBox, id: usize) {
    let (x, y, cx, cy) = text_box.frame.to_emu(deck.layout);
    let rtl_col = if deck.rtl { "1" } else { "0" };
    let _ = write!(
        out,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Text {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square" rtlCol="{rtl_col}" anchor="{}"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#,
        text_box.style.anchor.as_ooxml()
    );
    for paragraph in &text_box.paragraphs {
        write_paragraph(out, deck, text_box, paragraph);
    }
    out.push_str("</p:txBody></p:sp>");
}

fn write_paragraph(out: &mut String, deck: &SlideDeck, text_box: &TextBox, paragraph: &Paragraph) {
    let style = &text_box.style;
    let algn = style.align.as_ooxml();
    let rtl = if deck.rtl { "1" } else { "0" };
    match paragraph.bullet {
        Some(level) => {
            let lvl = level.saturating_sub(1);
            let mar_l = 342_900 * (lvl as i64 + 1);
            let _ = write!(
                out,
                r#"<a:p><a:pPr marL="{mar_l}" lvl="{lvl}" indent="-342900" algn="{algn}" rtl="{rtl}"><a:buFont typeface="Arial"/><a:buChar char="•"/></a:pPr>"#
            );
        }
        None => {
            let _ = write!(out, r#"<a:p><a:pPr algn="{algn}" rtl="{rtl}"><a:buNone/></a:pPr>"#);
        }
    }
    let lang = if deck.rtl { "fa-IR" } else { "en-US" };
    let bold = if style.bold { "1" } else { "0" };
    let _ = write!(
        out,
        r#"<a:r><a:rPr lang="{lang}" sz="{}" b="{bold}" dirty="0">"#,
        style.font_size_pt * 100
    );
    if let Some(color) = style.color {
        let _ = write!(out, r#"<a:solidFill><a:srgbClr val="{color}"/></a:solidFill>"#);
    }
    let _ = write!(out, "</a:rPr><a:t>{}</a:t></a:r></a:p>", text(&paragraph.text));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::SlideDeck;
    use shared::outline::{Outline, Slide};
    use std::io::Read;
    use zip::ZipArchive;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut out = String::new();
        part.read_to_string(&mut out).unwrap();
        out
    }

    fn sample() -> SlideDeck {
        SlideDeck::from_outline(&Outline {
            title: "T".into(),
            slides: vec![
                Slide {
                    title: "اول".into(),
                    content: vec!["الف".into(), "ب".into()],
                },
                Slide {
                    title: "R&D <2>".into(),
                    content: vec!["x".into(), "y".into(), "z".into()],
                },
            ],
        })
    }

    #[test]
    fn test_package_has_one_part_per_slide() {
        let bytes = write_pptx(&sample()).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let slides: Vec<&str> = archive
            .file_names()
            .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
            .collect();
        assert_eq!(slides.len(), 3);

        let types = read_part(&bytes, "[Content_Types].xml");
        assert!(types.contains("/ppt/slides/slide3.xml"));
        assert!(!types.contains("/ppt/slides/slide4.xml"));
    }

    #[test]
    fn test_presentation_is_wide_and_rtl() {
        let bytes = write_pptx(&sample()).unwrap();
        let pres = read_part(&bytes, "ppt/presentation.xml");
        assert!(pres.contains(r#"rtl="1""#));
        assert!(pres.contains(r#"<p:sldSz cx="12192000" cy="6858000"/>"#));
        assert!(pres.contains(r#"<p:sldId id="258" r:id="rId8"/>"#));

        let rels = read_part(&bytes, "ppt/_rels/presentation.xml.rels");
        assert!(rels.contains(r#"Id="rId8""#));
        assert!(rels.contains(r#"Target="slides/slide3.xml""#));
    }

    #[test]
    fn test_slides_keep_order_and_bullet_counts() {
        let bytes = write_pptx(&sample()).unwrap();

        let first = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(first.contains("<a:t>T</a:t>"));
        assert!(first.contains("تولید شده توسط Armin AI"));
        assert!(first.contains(r#"sz="3600" b="1""#));
        assert_eq!(first.matches("<a:buChar").count(), 0);

        let second = read_part(&bytes, "ppt/slides/slide2.xml");
        assert!(second.contains("<a:t>اول</a:t>"));
        assert_eq!(second.matches("<a:buChar").count(), 2);
        assert!(second.contains(r#"algn="r""#));

        let third = read_part(&bytes, "ppt/slides/slide3.xml");
        assert_eq!(third.matches("<a:buChar").count(), 3);
    }

    #[test]
    fn test_text_is_escaped() {
        let bytes = write_pptx(&sample()).unwrap();
        let third = read_part(&bytes, "ppt/slides/slide3.xml");
        assert!(third.contains("<a:t>R&amp;D &lt;2&gt;</a:t>"));
        assert_eq!(text("a\u{0}b"), "ab");
    }
}
