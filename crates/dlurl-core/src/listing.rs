//! Parsing of object-storage bucket listings.
//!
//! Only `ListBucketResult/Contents/Key` (and `ListBucketResult/IsTruncated`)
//! are read; every other element is skipped. Keys keep document order.

use dlurl_schema::PackageName;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::ParseError;

const ROOT: &str = "ListBucketResult";
const KEY_PATH: [&str; 3] = [ROOT, "Contents", "Key"];
const TRUNCATED_PATH: [&str; 2] = [ROOT, "IsTruncated"];

/// Object keys from one listing response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    keys: Vec<PackageName>,
    truncated: bool,
}

impl Listing {
    /// Parse a listing document.
    ///
    /// Malformed XML, a foreign root element (an S3 `<Error>` page, HTML) or
    /// a document that stops mid-element is an error, never an empty listing.
    pub fn parse(xml: &str) -> Result<Self, ParseError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut path: Vec<String> = Vec::new();
        let mut saw_root = false;
        let mut key: Option<String> = None;
        let mut truncated_text = String::new();
        let mut keys = Vec::new();

        loop {
            let event = reader.read_event().map_err(|source| ParseError::Xml {
                position: position(&reader),
                source,
            })?;

            match event {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    if path.is_empty() {
                        check_root(&name, &mut saw_root)?;
                    }
                    path.push(name);
                    if at(&path, &KEY_PATH) {
                        key = Some(String::new());
                    }
                }
                Event::Empty(e) => {
                    // Self-closing elements carry no text; only the root matters.
                    if path.is_empty() {
                        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                        check_root(&name, &mut saw_root)?;
                    }
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(|e| ParseError::Xml {
                        position: position(&reader),
                        source: quick_xml::Error::from(e),
                    })?;
                    append_text(&path, &text, &mut key, &mut truncated_text);
                }
                Event::CData(c) => {
                    let text = String::from_utf8_lossy(&c);
                    append_text(&path, &text, &mut key, &mut truncated_text);
                }
                Event::End(_) => {
                    if at(&path, &KEY_PATH) {
                        if let Some(k) = key.take().filter(|k| !k.is_empty()) {
                            keys.push(PackageName::new(k));
                        }
                    }
                    path.pop();
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = path.pop() {
            return Err(ParseError::Truncated(open));
        }
        if !saw_root {
            return Err(ParseError::Empty);
        }

        Ok(Self {
            keys,
            truncated: truncated_text.trim().eq_ignore_ascii_case("true"),
        })
    }

    /// Every key, in document order.
    pub fn keys(&self) -> &[PackageName] {
        &self.keys
    }

    /// Keys ending with the platform suffix, in document order.
    ///
    /// The iterator is lazy and can be cloned or re-created to walk the
    /// listing again.
    pub fn matching<'a>(
        &'a self,
        suffix: &'a str,
    ) -> impl Iterator<Item = &'a PackageName> + Clone + 'a {
        self.keys.iter().filter(move |k| k.has_suffix(suffix))
    }

    /// Whether the bucket reported more keys than this page holds.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn position(reader: &Reader<&[u8]>) -> u64 {
    // usize on some quick-xml releases, u64 on others.
    #[allow(clippy::useless_conversion)]
    u64::try_from(reader.buffer_position()).unwrap_or(u64::MAX)
}

fn check_root(name: &str, saw_root: &mut bool) -> Result<(), ParseError> {
    if *saw_root || name != ROOT {
        return Err(ParseError::UnexpectedRoot(name.to_string()));
    }
    *saw_root = true;
    Ok(())
}

fn at(path: &[String], expected: &[&str]) -> bool {
    path.iter().map(String::as_str).eq(expected.iter().copied())
}

fn append_text(path: &[String], text: &str, key: &mut Option<String>, truncated: &mut String) {
    if at(path, &KEY_PATH) {
        if let Some(k) = key.as_mut() {
            k.push_str(text);
        }
    } else if at(path, &TRUNCATED_PATH) {
        truncated.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>influxdb</Name>
  <Prefix>influxdb</Prefix>
  <Marker></Marker>
  <MaxKeys>1000</MaxKeys>
  <IsTruncated>false</IsTruncated>
  <Contents>
    <Key>influxdb-1.0.0.x86_64.rpm</Key>
    <LastModified>2016-09-08T15:30:00.000Z</LastModified>
    <Size>12345</Size>
  </Contents>
  <Contents>
    <Key>influxdb_1.0.0_amd64.deb</Key>
    <Size>12345</Size>
  </Contents>
  <Contents>
    <Key>influxdb_1.1.0_amd64.deb</Key>
  </Contents>
  <Contents>
    <Key>influxdb_1.1.0_amd64.deb.sha256</Key>
  </Contents>
</ListBucketResult>"#;

    #[test]
    fn test_parse_keys_in_order() {
        let listing = Listing::parse(SAMPLE).unwrap();
        assert_eq!(
            listing.keys(),
            [
                "influxdb-1.0.0.x86_64.rpm",
                "influxdb_1.0.0_amd64.deb",
                "influxdb_1.1.0_amd64.deb",
                "influxdb_1.1.0_amd64.deb.sha256",
            ]
            .map(PackageName::from)
        );
        assert!(!listing.is_truncated());
    }

    #[test]
    fn test_matching_is_restartable() {
        let listing = Listing::parse(SAMPLE).unwrap();
        let debs = listing.matching("amd64.deb");
        let first: Vec<_> = debs.clone().collect();
        let second: Vec<_> = debs.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(listing.matching("x86_64.rpm").count(), 1);
        assert_eq!(listing.matching("i686.rpm").count(), 0);
    }

    #[test]
    fn test_only_key_under_contents() {
        let xml = "<ListBucketResult><Key>stray.deb</Key><Contents><Key>a_1_amd64.deb</Key>\
                   <Owner><Key>nested.deb</Key></Owner></Contents></ListBucketResult>";
        let listing = Listing::parse(xml).unwrap();
        assert_eq!(listing.keys(), [PackageName::from("a_1_amd64.deb")]);
    }

    #[test]
    fn test_entities_and_cdata() {
        let xml = "<ListBucketResult><Contents><Key>a&amp;b_1_amd64.deb</Key></Contents>\
                   <Contents><Key><![CDATA[c_2_amd64.deb]]></Key></Contents></ListBucketResult>";
        let listing = Listing::parse(xml).unwrap();
        assert_eq!(
            listing.keys(),
            ["a&b_1_amd64.deb", "c_2_amd64.deb"].map(PackageName::from)
        );
    }

    #[test]
    fn test_empty_bucket() {
        let listing = Listing::parse("<ListBucketResult/>").unwrap();
        assert!(listing.is_empty());
        let xml = "<ListBucketResult><Contents><Key/></Contents></ListBucketResult>";
        let listing = Listing::parse(xml).unwrap();
        assert!(listing.is_empty());
    }

    #[test]
    fn test_truncated_flag() {
        let xml = "<ListBucketResult><IsTruncated>true</IsTruncated></ListBucketResult>";
        assert!(Listing::parse(xml).unwrap().is_truncated());
    }

    #[test]
    fn test_malformed_is_an_error() {
        assert!(matches!(
            Listing::parse("<ListBucketResult><Contents></Key></ListBucketResult>"),
            Err(ParseError::Xml { .. })
        ));
        assert!(matches!(
            Listing::parse("<ListBucketResult><Contents><Key>a"),
            Err(ParseError::Truncated(_) | ParseError::Xml { .. })
        ));
        assert!(matches!(Listing::parse(""), Err(ParseError::Empty)));
        assert!(matches!(Listing::parse("not xml at all"), Err(ParseError::Empty)));
    }

    #[test]
    fn test_foreign_document_is_an_error() {
        let denied = "<Error><Code>AccessDenied</Code></Error>";
        match Listing::parse(denied) {
            Err(ParseError::UnexpectedRoot(name)) => assert_eq!(name, "Error"),
            other => panic!("expected UnexpectedRoot, got {other:?}"),
        }
        assert!(matches!(
            Listing::parse("<ListBucketResult/><ListBucketResult/>"),
            Err(ParseError::UnexpectedRoot(_))
        ));
    }
}
