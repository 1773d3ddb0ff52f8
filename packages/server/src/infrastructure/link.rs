//! Share link and WhatsApp link builders.

use locshare_shared::contract::track_page_path;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::domain::{PhoneNumber, TrackingId};

/// Characters escaped in a URI component: everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Country code prepended to WhatsApp numbers
const COUNTRY_CODE: &str = "91";

/// Builds the public links handed out for a session.
#[derive(Debug, Clone)]
pub struct ShareLinks {
    base_url: String,
}

impl ShareLinks {
    /// `base_url` is the externally reachable address of this server; trailing slashes are dropped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// `<base>/track-location/<tracking_id>`
    pub fn share_link(&self, tracking_id: &TrackingId) -> String {
        format!("{}{}", self.base_url, track_page_path(tracking_id.as_str()))
    }

    /// `https://wa.me/91<number>?text=<encoded invitation>`
    pub fn whatsapp_link(&self, phone: &PhoneNumber, share_link: &str) -> String {
        let message = invitation_message(share_link);
        let encoded = utf8_percent_encode(&message, URI_COMPONENT);
        format!(
            "https://wa.me/{COUNTRY_CODE}{}?text={encoded}",
            strip_country_code(phone.as_str())
        )
    }
}

/// Text sent to the person whose location is requested
pub fn invitation_message(share_link: &str) -> String {
    format!("Click here to share your location: {share_link}")
}

/// Drop an optional leading `+91` / `91` and keep the last ten digits.
fn strip_country_code(number: &str) -> &str {
    let digits = number.strip_prefix('+').unwrap_or(number);
    let national = match digits.strip_prefix(COUNTRY_CODE) {
        Some(rest) if rest.len() >= 10 => rest,
        _ => digits,
    };
    let skip = national.len().saturating_sub(10);
    &national[skip..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> ShareLinks {
        ShareLinks::new("https://example.ngrok.io/")
    }

    #[test]
    fn test_share_link() {
        // テスト項目: ベース URL の末尾スラッシュを除いて共有リンクを組み立てる
        let tracking_id = TrackingId::new("a1b2c3".to_string()).unwrap();

        let link = links().share_link(&tracking_id);

        assert_eq!(link, "https://example.ngrok.io/track-location/a1b2c3");
    }

    #[test]
    fn test_whatsapp_link() {
        // テスト項目: 国番号 91 付きの wa.me リンクにメッセージが URI エンコードされる
        // given (前提条件):
        let phone = PhoneNumber::new("9876543210".to_string()).unwrap();
        let share_link = "https://example.ngrok.io/track-location/a1b2c3";

        // when (操作):
        let link = links().whatsapp_link(&phone, share_link);

        // then (期待する結果):
        assert_eq!(
            link,
            "https://wa.me/919876543210?text=Click%20here%20to%20share%20your%20location%3A%20https%3A%2F%2Fexample.ngrok.io%2Ftrack-location%2Fa1b2c3"
        );
    }

    #[test]
    fn test_whatsapp_link_keeps_numbers_starting_with_91() {
        // テスト項目: 91 で始まる 10 桁の番号は国番号とみなさない
        let phone = PhoneNumber::new("9198765432".to_string()).unwrap();

        let link = links().whatsapp_link(&phone, "x");

        assert!(link.starts_with("https://wa.me/919198765432?text="));
    }

    #[test]
    fn test_strip_country_code() {
        // テスト項目: +91 / 91 の接頭辞を取り除き末尾 10 桁を使う
        assert_eq!(strip_country_code("+919876543210"), "9876543210");
        assert_eq!(strip_country_code("919876543210"), "9876543210");
        assert_eq!(strip_country_code("9876543210"), "9876543210");
    }

    #[test]
    fn test_uri_component_keeps_unreserved() {
        // テスト項目: encodeURIComponent と同じく非予約文字はエスケープしない
        let encoded = utf8_percent_encode("a-b_c.d!e~f*g'h(i)j k", URI_COMPONENT).to_string();

        assert_eq!(encoded, "a-b_c.d!e~f*g'h(i)j%20k");
    }
}
