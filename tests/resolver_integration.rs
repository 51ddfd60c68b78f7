//! Integration tests for the resolver module.
//!
//! Tests the full resolution flow through the public API with page and API
//! payloads shaped like the ones the mirrors serve.

use std::collections::HashSet;

use apk_finder_core::resolver::arch::{DUAL_ARCH_TOKEN, UNIVERSAL_FALLBACKS};
use apk_finder_core::resolver::normalize_href;
use apk_finder_core::{
    ApkMirrorSource, ApkPureSource, AptoideSource, ArchPolicy, BundleType, CandidateSource,
    ParseError, ResolutionRequest, ResolutionResult, UptodownSource, decode_payload,
};

const APKMIRROR_RELEASE_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>YouTube 19.16.39</title></head>
<body>
  <div class="listWidget">
    <div class="table-row headerFont">
      <div class="table-cell">Variant</div><div class="table-cell">Arch</div>
    </div>
    <div class="table-row headerFont">
      <div class="table-cell"><a class="accent_color" href="/apk/google-inc/youtube/youtube-19-16-39-release/youtube-19-16-39-android-apk-download/">19.16.39</a><span class="apkm-badge">BUNDLE</span></div>
      <div class="table-cell">arm64-v8a + armeabi-v7a</div>
      <div class="table-cell">Android 8.0+</div>
    </div>
    <div class="table-row headerFont">
      <div class="table-cell"><a href="/apk/google-inc/youtube/youtube-19-16-39-release/variant-x86/">19.16.39</a></div>
      <div class="table-cell">1546</div><div class="table-cell">APK</div>
      <div class="table-cell">x86</div><div class="table-cell">Android 8.0+</div>
      <div class="table-cell">nodpi</div>
    </div>
    <div class="table-row headerFont">
      <div class="table-cell"><a href="/apk/google-inc/youtube/youtube-19-16-39-release/variant-universal/">19.16.39</a></div>
      <div class="table-cell">1546</div><div class="table-cell">APK</div>
      <div class="table-cell">universal</div><div class="table-cell">Android 8.0+</div>
      <div class="table-cell">nodpi</div>
    </div>
    <div class="table-row headerFont">
      <div class="table-cell"><a href="/apk/google-inc/youtube/youtube-19-16-39-release/variant-arm64/">19.16.39</a></div>
      <div class="table-cell">1546</div><div class="table-cell">APK</div>
      <div class="table-cell">arm64-v8a</div><div class="table-cell">Android 8.0+</div>
      <div class="table-cell">nodpi</div>
    </div>
  </div>
</body></html>"#;

fn apk_request(arch: &str) -> ResolutionRequest {
    ResolutionRequest::new("com.google.android.youtube")
        .with_arch(arch)
        .with_density("nodpi")
        .with_bundle(BundleType::SingleApk)
}

// ==================== Architecture fallback ====================

#[test]
fn test_expand_specific_arch_prepends_requested_token() {
    for arch in ["arm64-v8a", "x86", "made-up-arch"] {
        let chain = ArchPolicy::default().expand(arch);
        assert_eq!(chain.len(), 4);
        assert_eq!(chain.as_slice()[0], arch);
        assert_eq!(&chain.as_slice()[1..], UNIVERSAL_FALLBACKS.as_slice());
    }
}

#[test]
fn test_expand_all_is_exactly_universal_list() {
    let chain = ArchPolicy::default().expand("all");
    assert_eq!(chain.as_slice(), ["universal", "noarch", DUAL_ARCH_TOKEN].as_slice());
}

// ==================== APKMirror ====================

#[test]
fn test_apkmirror_first_matching_row_in_document_order_wins() {
    // The universal row precedes the exact arm64 row, so it is chosen.
    let result = ApkMirrorSource::new().resolve(APKMIRROR_RELEASE_PAGE, &apk_request("arm64-v8a"));
    assert_eq!(
        result,
        ResolutionResult::Found(
            "https://www.apkmirror.com/apk/google-inc/youtube/youtube-19-16-39-release/variant-universal/"
                .to_string()
        )
    );
}

#[test]
fn test_apkmirror_short_rows_do_not_abort_scan() {
    let result = ApkMirrorSource::new().resolve(APKMIRROR_RELEASE_PAGE, &apk_request("x86"));
    assert_eq!(
        result.locator(),
        Some("https://www.apkmirror.com/apk/google-inc/youtube/youtube-19-16-39-release/variant-x86/")
    );
}

#[test]
fn test_apkmirror_no_table_distinct_from_no_match() {
    let source = ApkMirrorSource::new();
    let no_table = source.resolve(
        "<html><body><div class=\"table-row\">APK</div></body></html>",
        &apk_request("arm64-v8a"),
    );
    let no_match = source.resolve(
        APKMIRROR_RELEASE_PAGE,
        &apk_request("arm64-v8a").with_density("480dpi"),
    );
    assert_eq!(no_table, ResolutionResult::NoTableFound);
    assert_eq!(no_match, ResolutionResult::NoMatchInTable);
    assert_ne!(no_table, no_match);
}

#[test]
fn test_apkmirror_custom_origin_for_relative_links() {
    let source = ApkMirrorSource::with_origin("http://127.0.0.1:8080/");
    let result = source.resolve(APKMIRROR_RELEASE_PAGE, &apk_request("x86"));
    assert_eq!(
        result.locator(),
        Some("http://127.0.0.1:8080/apk/google-inc/youtube/youtube-19-16-39-release/variant-x86/")
    );
}

#[test]
fn test_apkmirror_candidates_include_short_rows() {
    let rows = ApkMirrorSource::new().candidates(APKMIRROR_RELEASE_PAGE).unwrap();
    assert_eq!(rows.len(), 5);
    assert!(rows[0].fields.len() < 6);
    assert_eq!(rows[4].field(3), Some("arm64-v8a"));
}

#[test]
fn test_normalize_href_joins_and_passes_through() {
    let origin = "https://www.apkmirror.com";
    assert_eq!(normalize_href("apk/x/", origin), "https://www.apkmirror.com/apk/x/");
    assert_eq!(normalize_href("/apk/x/", origin), "https://www.apkmirror.com/apk/x/");
    assert_eq!(normalize_href("http://cdn.example/x", origin), "http://cdn.example/x");
    assert_eq!(normalize_href("https://cdn.example/x", origin), "https://cdn.example/x");
}

// ==================== APKPure ====================

const APKPURE_VERSIONS_PAGE: &str = r#"<html><body>
  <div class="ver-top-down" data-dt-version="19.16.39" data-dt-versioncode="1546"></div>
  <ul class="ver-wrap">
    <li><div class="ver-item"><a href="https://apkpure.net/youtube/com.google.android.youtube/download/19.16.39"><span class="ver-item-n">19.16.39</span></a></div></li>
    <li><div class="ver-item"><a href="https://apkpure.net/youtube/com.google.android.youtube/download/19.15.36"><span class="ver-item-n">19.15.36</span></a></div></li>
    <li><div class="ver-item"><a href="https://apkpure.net/youtube/com.google.android.youtube/download/19.15.36-beta"><span class="ver-item-n">19.15.36</span></a></div></li>
  </ul>
</body></html>"#;

#[test]
fn test_apkpure_versions_page() {
    let source = ApkPureSource::new();
    assert_eq!(source.latest_version(APKPURE_VERSIONS_PAGE).as_deref(), Some("19.16.39"));
    assert_eq!(source.all_versions(APKPURE_VERSIONS_PAGE), vec!["19.16.39", "19.15.36"]);
}

#[test]
fn test_apkpure_download_page_and_urls() {
    let source = ApkPureSource::new();
    let page = r#"<a class="da" href="https://d.apkpure.net/b/APK/com.google.android.youtube?versionCode=1546">Download APK</a>"#;
    assert_eq!(
        source.download_link(page).as_deref(),
        Some("https://d.apkpure.net/b/APK/com.google.android.youtube?versionCode=1546")
    );
    assert_eq!(
        source.page_url("youtube", "com.google.android.youtube", None),
        "https://apkpure.net/youtube/com.google.android.youtube/versions"
    );
}

// ==================== Aptoide ====================

#[test]
fn test_aptoide_list_versions_dedup_first_seen() {
    let json = r#"{"info":{"status":"OK"},"datalist":{"list":[
        {"file":{"vername":"19.16.39","vercode":1546,"path":"https://p/a.apk"}},
        {"file":{"vername":"19.15.36","vercode":1545,"path":"https://p/b.apk"}},
        {"file":{"vername":"19.16.39","vercode":1547,"path":"https://p/c.apk"}},
        {"file":"corrupt"},
        {"file":{"vername":"19.14.37","vercode":"1544","path":"https://p/d.apk"}}
    ]}}"#;
    let source = AptoideSource::new();
    assert_eq!(source.list_versions(json), vec!["19.16.39", "19.15.36", "19.14.37"]);
    assert_eq!(source.find_version_code(json, "19.16.39"), Some(1546));
    assert_eq!(source.find_version_code(json, "19.14.37"), Some(1544));
}

#[test]
fn test_aptoide_malformed_payloads_are_absent() {
    let source = AptoideSource::new();
    assert_eq!(source.latest_version_from_search("<html>"), None);
    assert_eq!(source.download_from_metadata(r#"{"data":null}"#), None);
    assert!(source.list_versions(r#"{"datalist":{"list":"nope"}}"#).is_empty());
}

#[test]
fn test_aptoide_urls_carry_architecture_filter() {
    let source = AptoideSource::new();
    let filtered = source.search_url("com.google.android.youtube", "arm64-v8a");
    assert!(filtered.contains("&q="));
    let unfiltered = source.search_url("com.google.android.youtube", "universal");
    assert!(!unfiltered.contains("&q="));
}

// ==================== Uptodown ====================

fn allowed(archs: &[&str]) -> HashSet<String> {
    archs.iter().map(ToString::to_string).collect()
}

#[test]
fn test_uptodown_strict_adjacency() {
    let source = UptodownSource::new();
    let tight = r#"<p>arm64-v8a</p><div class="v-report" data-file-id="12345"></div>"#;
    let spaced = r#"<p>arm64-v8a</p>
<div class="v-report" data-file-id="12345"></div>"#;
    assert_eq!(source.resolve(tight, &allowed(&["arm64-v8a"])).as_deref(), Some("12345"));
    assert_eq!(source.resolve(spaced, &allowed(&["arm64-v8a"])), None);
}

#[test]
fn test_uptodown_allowed_set_order_is_irrelevant() {
    let fragment = concat!(
        r#"<p>armeabi-v7a</p><div class="v-report" data-file-id="32"></div>"#,
        r#"<p>arm64-v8a</p><div class="v-report" data-file-id="64"></div>"#
    );
    let source = UptodownSource::new();
    assert_eq!(
        source.resolve(fragment, &allowed(&["arm64-v8a", "armeabi-v7a"])).as_deref(),
        Some("32")
    );
    assert_eq!(
        source.resolve(fragment, &allowed(&["armeabi-v7a", "arm64-v8a"])).as_deref(),
        Some("32")
    );
}

// ==================== Payload decoding ====================

#[test]
fn test_decode_payload_feeds_adapters() {
    let text = decode_payload(APKMIRROR_RELEASE_PAGE.as_bytes()).unwrap();
    assert!(ApkMirrorSource::new().resolve(text, &apk_request("all")).locator().is_some());
    assert!(matches!(
        decode_payload(b"\xfe\xff"),
        Err(ParseError::InvalidEncoding { offset: 0, .. })
    ));
}
