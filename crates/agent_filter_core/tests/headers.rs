use agent_filter_core::{HeaderTemplate, USER_AGENT};
use pretty_assertions::assert_eq;

#[test]
fn browser_template_carries_the_fixed_header_set() {
    let headers = HeaderTemplate::browser().for_identity("UA1");
    let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();

    assert_eq!(
        names,
        vec![
            "User-Agent",
            "Accept",
            "Accept-Encoding",
            "Accept-Language",
            "Cache-Control",
            "Sec-Fetch-Dest",
            "Sec-Fetch-Mode",
            "Sec-Fetch-Site",
            "X-Requested-With",
        ]
    );
    assert_eq!(headers.get("cache-control"), Some("no-cache"));
    assert_eq!(headers.get("X-Requested-With"), Some("XMLHttpRequest"));
}

#[test]
fn each_identity_gets_an_independent_header_value() {
    let template = HeaderTemplate::browser();
    let first = template.for_identity("Mozilla/5.0 A");
    let second = template.for_identity("Mozilla/5.0 B");

    assert_eq!(first.user_agent(), "Mozilla/5.0 A");
    assert_eq!(second.user_agent(), "Mozilla/5.0 B");
    assert_eq!(first.get(USER_AGENT), Some("Mozilla/5.0 A"));
    assert_eq!(template, HeaderTemplate::browser());
}

#[test]
fn extra_headers_override_case_insensitively_but_not_user_agent() {
    let template = HeaderTemplate::browser()
        .with_header("accept-language", "de-DE")
        .with_header("Referer", "https://example.com/")
        .with_header("user-agent", "ignored");
    let headers = template.for_identity("UA");

    assert_eq!(headers.get("Accept-Language"), Some("de-DE"));
    assert_eq!(headers.get("Referer"), Some("https://example.com/"));
    assert_eq!(headers.user_agent(), "UA");
    assert_eq!(headers.iter().count(), 10);
}
