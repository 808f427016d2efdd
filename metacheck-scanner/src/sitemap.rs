// Sitemap XML parsing
//
// Only the `<urlset><url><loc>` layout is accepted. Element names are compared
// on their local part so prefixed namespaces parse the same as the default one.

use crate::error::{Result, ScanError};
use quick_xml::Reader;
use quick_xml::events::Event;

const ROOT: &str = "urlset";
const ENTRY: &str = "url";
const LOCATION: &str = "loc";

/// Extract the page URLs listed in a sitemap document, in document order.
///
/// Duplicates are kept. Only the first `<loc>` of each `<url>` is used.
pub fn parse_sitemap(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut state = SitemapState::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                state.open(&name)?;
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                state.open(&name)?;
                state.close(&name)?;
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                state.close(&name)?;
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                state.text(&text)?;
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).to_string();
                state.text(&text)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    state.finish()
}

#[derive(Default)]
struct SitemapState {
    depth: usize,
    root_seen: bool,
    urls: Vec<String>,
    // Some(None) while inside a <url> that has not produced a <loc> yet
    entry: Option<Option<String>>,
    location: Option<String>,
}

impl SitemapState {
    fn open(&mut self, name: &str) -> Result<()> {
        match self.depth {
            0 => {
                if self.root_seen {
                    return Err(ScanError::ParseError(
                        "sitemap has more than one root element".to_string(),
                    ));
                }
                self.root_seen = true;
                if name != ROOT {
                    return Err(ScanError::ParseError(format!(
                        "expected <{}> root element, found <{}>",
                        ROOT, name
                    )));
                }
            }
            1 if name == ENTRY => self.entry = Some(None),
            2 if name == LOCATION && self.entry == Some(None) && self.location.is_none() => {
                self.location = Some(String::new());
            }
            _ => {}
        }

        self.depth += 1;
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.depth = self.depth.saturating_sub(1);

        match self.depth {
            2 if name == LOCATION => {
                if let Some(location) = self.location.take() {
                    self.entry = Some(Some(location.trim().to_string()));
                }
            }
            1 if name == ENTRY => match self.entry.take() {
                Some(Some(location)) => self.urls.push(location),
                Some(None) => {
                    return Err(ScanError::ParseError(format!(
                        "<{}> entry #{} has no <{}>",
                        ENTRY,
                        self.urls.len() + 1,
                        LOCATION
                    )));
                }
                None => {}
            },
            _ => {}
        }

        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        if self.depth == 0 && !text.trim().is_empty() {
            return Err(ScanError::ParseError(
                "text content outside of the root element".to_string(),
            ));
        }

        if self.depth == 3
            && let Some(location) = self.location.as_mut()
        {
            location.push_str(text);
        }

        Ok(())
    }

    fn finish(self) -> Result<Vec<String>> {
        if !self.root_seen {
            return Err(ScanError::ParseError(
                "sitemap document has no root element".to_string(),
            ));
        }
        if self.depth != 0 {
            return Err(ScanError::ParseError(
                "unexpected end of sitemap: unclosed element".to_string(),
            ));
        }
        if self.urls.is_empty() {
            return Err(ScanError::ParseError(format!(
                "<{}> contains no <{}> entries",
                ROOT, ENTRY
            )));
        }

        Ok(self.urls)
    }
}
