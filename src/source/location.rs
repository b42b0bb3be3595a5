//! Locating pattern source in a page URL.

use percent_encoding::percent_decode_str;
use tracing::warn;
use url::Url;

use super::{SourceKind, SourceRef};

impl SourceRef {
    /// Find the pattern source referenced by a page location.
    ///
    /// In order of precedence:
    /// - a `code` query parameter is inline code;
    /// - any other non-empty query is a share ID;
    /// - a non-empty fragment is an encoded hash. A fragment that is itself
    ///   an `http(s)` URL with a fragment (a pasted share link) yields that
    ///   nested fragment instead.
    ///
    /// Returns `None` for an unparseable location or one without a source.
    pub fn from_location(location: &str) -> Option<Self> {
        let url = match Url::parse(location.trim()) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, location, "cannot parse location");
                return None;
            }
        };

        if let Some((_, code)) = url.query_pairs().find(|(key, _)| key == "code") {
            let code = match percent_decode_str(&code).decode_utf8() {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => code.into_owned(),
            };
            return Some(Self::code(code.trim()));
        }

        let query = url.query().unwrap_or_default().trim();
        if !query.is_empty() {
            return Some(Self::share_id(query));
        }

        let fragment = url.fragment()?.trim();
        if fragment.is_empty() {
            return None;
        }
        if let Some(nested) = nested_share_link(fragment) {
            return Some(nested);
        }
        Some(Self::hash(fragment))
    }
}

fn nested_share_link(fragment: &str) -> Option<SourceRef> {
    let lower = fragment.get(..8)?.to_ascii_lowercase();
    if !lower.starts_with("http://") && !lower.starts_with("https://") {
        return None;
    }
    let nested = match Url::parse(fragment) {
        Ok(url) => url,
        Err(e) => {
            warn!(error = %e, "failed to parse nested share URL in fragment");
            return None;
        }
    };
    let hash = nested.fragment().filter(|h| !h.is_empty())?;
    Some(SourceRef {
        kind: SourceKind::Hash,
        payload: hash.to_string(),
        source_url: Some(fragment.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_query_parameter() {
        let src = SourceRef::from_location("http://localhost:5173/?code=note(%22c4%20e4%22)").unwrap();
        assert_eq!(src.kind, SourceKind::Code);
        assert_eq!(src.payload, r#"note("c4 e4")"#);
    }

    #[test]
    fn code_parameter_is_trimmed() {
        let src = SourceRef::from_location("http://x/?code=%20s(%22bd%22)%20%0A").unwrap();
        assert_eq!(src.payload, r#"s("bd")"#);
    }

    #[test]
    fn code_wins_over_other_parameters() {
        let src = SourceRef::from_location("http://x/?foo=1&code=s(%22bd%22)").unwrap();
        assert_eq!(src.kind, SourceKind::Code);
    }

    #[test]
    fn other_query_is_a_share_id() {
        let src = SourceRef::from_location("https://strudel.cc/?xK3_9abc").unwrap();
        assert_eq!(src.kind, SourceKind::ShareId);
        assert_eq!(src.payload, "xK3_9abc");
    }

    #[test]
    fn fragment_is_a_hash() {
        let src = SourceRef::from_location("https://strudel.cc/#JDogbm90ZSgiYyBlIGciKQ%3D%3D").unwrap();
        assert_eq!(src.kind, SourceKind::Hash);
        assert_eq!(src.payload, "JDogbm90ZSgiYyBlIGciKQ%3D%3D");
        assert!(src.source_url.is_none());
    }

    #[test]
    fn nested_share_link_in_fragment() {
        let src = SourceRef::from_location(
            "http://localhost:5173/#https://strudel.cc/#JDogbm90ZSgiYyBlIGciKQ==",
        )
        .unwrap();
        assert_eq!(src.kind, SourceKind::Hash);
        assert_eq!(src.payload, "JDogbm90ZSgiYyBlIGciKQ==");
        assert_eq!(
            src.source_url.as_deref(),
            Some("https://strudel.cc/#JDogbm90ZSgiYyBlIGciKQ==")
        );
    }

    #[test]
    fn nested_link_without_fragment_is_kept_whole() {
        let src = SourceRef::from_location("http://localhost/#https://strudel.cc/").unwrap();
        assert_eq!(src.payload, "https://strudel.cc/");
        assert!(src.source_url.is_none());
    }

    #[test]
    fn bare_location_has_no_source() {
        assert!(SourceRef::from_location("http://localhost:5173/").is_none());
        assert!(SourceRef::from_location("http://localhost:5173/#").is_none());
    }

    #[test]
    fn unparseable_location_has_no_source() {
        assert!(SourceRef::from_location("not a url").is_none());
    }
}
