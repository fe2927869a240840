use std::borrow::Cow;

use quick_xml::encoding::Decoder;
use quick_xml::errors::IllFormedError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// What the strict XML parse yields: subject codes (raw `FormalName` values)
/// and the non-empty, trimmed direct text of every text element, both in
/// document order.
#[derive(Debug)]
pub struct XmlFields {
    pub subject_codes: Vec<String>,
    pub texts: Vec<String>,
    decoder: Decoder,
}

impl XmlFields {
    /// Decode raw bytes of the same document using its declared encoding.
    pub fn decode<'b>(&self, raw: &'b [u8]) -> Result<Cow<'b, str>, quick_xml::Error> {
        Ok(self.decoder.decode(raw)?)
    }
}

/// Walk `xml` once, collecting `FormalName` from elements named in
/// `subject_tags` and direct text from elements named in `text_tags`.
/// Text is decoded with the encoding from the XML declaration.
pub fn extract(
    xml: &[u8],
    subject_tags: &[String],
    text_tags: &[String],
) -> Result<XmlFields, quick_xml::Error> {
    let mut reader = Reader::from_reader(xml);
    let mut subject_codes = Vec::new();
    let mut texts = Vec::new();
    let mut buf = Vec::new();

    // Names of the currently open elements, outermost first.
    let mut open_elements: Vec<Vec<u8>> = Vec::new();
    // Open text elements as (depth, collected direct text).
    let mut open_texts: Vec<(usize, String)> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                open_elements.push(e.name().as_ref().to_vec());
                let name = e.local_name();
                if matches_any(name.as_ref(), subject_tags) {
                    push_formal_name(&e, reader.decoder(), &mut subject_codes)?;
                }
                if matches_any(name.as_ref(), text_tags) {
                    open_texts.push((open_elements.len(), String::new()));
                }
            }
            Event::Empty(e) => {
                if matches_any(e.local_name().as_ref(), subject_tags) {
                    push_formal_name(&e, reader.decoder(), &mut subject_codes)?;
                }
            }
            Event::Text(e) => {
                if let Some((d, text)) = open_texts.last_mut() {
                    if *d == open_elements.len() {
                        text.push_str(&e.unescape()?);
                    }
                }
            }
            Event::CData(e) => {
                if let Some((d, text)) = open_texts.last_mut() {
                    if *d == open_elements.len() {
                        text.push_str(&reader.decoder().decode(&e.into_inner())?);
                    }
                }
            }
            Event::End(_) => {
                if matches!(open_texts.last(), Some((d, _)) if *d == open_elements.len()) {
                    if let Some((_, text)) = open_texts.pop() {
                        let text = text.trim();
                        if !text.is_empty() {
                            texts.push(text.to_string());
                        }
                    }
                }
                open_elements.pop();
            }
            Event::Eof => {
                if let Some(name) = open_elements.last() {
                    return Err(quick_xml::Error::IllFormed(IllFormedError::MissingEndTag(
                        String::from_utf8_lossy(name).into_owned(),
                    )));
                }
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(XmlFields {
        subject_codes,
        texts,
        decoder: reader.decoder(),
    })
}

fn matches_any(name: &[u8], tags: &[String]) -> bool {
    tags.iter().any(|t| t.as_bytes() == name)
}

fn push_formal_name(
    e: &BytesStart<'_>,
    decoder: Decoder,
    codes: &mut Vec<String>,
) -> Result<(), quick_xml::Error> {
    if let Some(attr) = e.try_get_attribute("FormalName")? {
        codes.push(attr.decode_and_unescape_value(decoder)?.trim().to_string());
    }
    Ok(())
}
