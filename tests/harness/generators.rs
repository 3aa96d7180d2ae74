// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for hostile-input simulation.

use chat_content_guard::FileMeta;

const MB: u64 = 1024 * 1024;

/// Generate a pool of chat session ids.
pub fn generate_sessions(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("session-{i:04}")).collect()
}

/// URLs that must never survive in an `href` or `src`.
const DANGEROUS_URLS: &[&str] = &[
    "javascript:alert(1)",
    "javascript://comment%0Aalert(1)",
    "data:text/html;base64,PHNjcmlwdD5hbGVydCgxKTwvc2NyaXB0Pg==",
    "vbscript:msgbox(1)",
    "file:///etc/passwd",
    "about:blank",
    "ws://evil.example.com/socket",
    "wss://evil.example.com/socket",
];

/// Casing and whitespace variations of every dangerous URL.
pub fn generate_scheme_variants() -> Vec<String> {
    let mut variants = Vec::new();
    for url in DANGEROUS_URLS {
        variants.push(url.to_string());
        variants.push(url.to_uppercase());
        variants.push(alternate_case(url));
        variants.push(format!("   {url}"));
        variants.push(format!("\t{url}"));
        variants.push(format!("\n{url}"));
        variants.push(format!("{url}   "));
    }
    variants
}

fn alternate_case(s: &str) -> String {
    s.chars()
        .enumerate()
        .map(|(i, c)| {
            if i % 2 == 0 {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

/// Attribute values that only become a script URL after entity decoding.
pub fn generate_encoded_schemes() -> Vec<&'static str> {
    vec![
        "&#106;avascript:alert(1)",
        "&#x6A;avascript:alert(1)",
        "&#X6a;&#X61;vascript:alert(1)",
        "java&#x09;script:alert(1)",
        "jav&#x0A;ascript:alert(1)",
        "&#0000106&#0000097&#0000118&#0000097&#0000115&#0000099&#0000114&#0000105&#0000112&#0000116&#0000058alert(1)",
    ]
}

/// Classic cross-site scripting payloads.
pub fn generate_xss_payloads() -> Vec<&'static str> {
    vec![
        "<script>alert(1)</script>",
        "<SCRIPT SRC=https://evil.example.com/x.js></SCRIPT>",
        "<scr<script>ipt>alert(1)</scr</script>ipt>",
        r#"<img src=x onerror="alert(1)">"#,
        "<img src=x onerror=alert(1)//",
        r#"<svg onload="alert(1)"><circle r="1"/></svg>"#,
        "<svg><script>alert(1)</script></svg>",
        "<math><mtext><table><mglyph><style><img src=x onerror=alert(1)>",
        r#"<iframe src="javascript:alert(1)"></iframe>"#,
        r#"<iframe srcdoc="<script>alert(1)</script>"></iframe>"#,
        r#"<object data="data:text/html,<script>alert(1)</script>"></object>"#,
        r#"<embed src="javascript:alert(1)">"#,
        r#"<form action="javascript:alert(1)"><button>go</button></form>"#,
        r#"<input autofocus onfocus="alert(1)">"#,
        r#"<body onload="alert(1)">hi</body>"#,
        r#"<a href="javascript:alert(1)">click</a>"#,
        r#"<a href="https://ok.example.com" onclick="alert(1)">ok</a>"#,
        r#"<a href="/local" target="_blank" rel="opener">tab</a>"#,
        r#"<div style="background:url(javascript:alert(1))">bg</div>"#,
        r#"<img src="/pic.png" style="width:expression(alert(1));background:url(data:x)">"#,
        r#"<video poster="javascript:alert(1)" src="/clip.mp4"></video>"#,
        r#"<audio src="vbscript:msgbox(1)" controls></audio>"#,
        "<style>body{background:url(javascript:alert(1))}</style>",
        "<noscript><p title=\"</noscript><img src=x onerror=alert(1)>\">",
        "<!--<img src=x onerror=alert(1)>-->",
        "<![CDATA[<script>alert(1)</script>]]>",
        r#"<meta http-equiv="refresh" content="0;url=javascript:alert(1)">"#,
        r#"<link rel="stylesheet" href="javascript:alert(1)">"#,
        r#"<base href="javascript:alert(1)//">"#,
        "<template><script>alert(1)</script></template>",
        "<p>unclosed <b>bold <i>italic",
        "</p></div></a>stray closers",
        "<<script>script>alert(1)<</script>/script>",
    ]
}

/// Attachment samples and whether the default configuration accepts them.
pub fn generate_attachments() -> Vec<(FileMeta, bool)> {
    vec![
        (FileMeta::new(1024, "image/png", "photo.png"), true),
        (FileMeta::new(10 * MB, "image/jpeg", "big.JPG"), true),
        (FileMeta::new(10 * MB + 1, "image/jpeg", "bigger.jpg"), false),
        (FileMeta::new(2048, "application/pdf", "report.pdf"), true),
        (FileMeta::new(2048, "text/csv", "data.csv"), true),
        (FileMeta::new(2048, "image/svg+xml", "logo.svg"), false),
        (FileMeta::new(2048, "text/html", "page.html"), false),
        (FileMeta::new(2048, "image/png", "payload.exe"), false),
        (FileMeta::new(2048, "application/pdf", "invoice.pdf.exe"), false),
        (FileMeta::new(2048, "text/plain", "notes"), false),
        (FileMeta::new(2048, "IMAGE/PNG", "photo.png"), false),
        (FileMeta::new(0, "text/plain", "empty.txt"), true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_sessions_unique() {
        let sessions = generate_sessions(100);
        let unique: std::collections::HashSet<_> = sessions.iter().collect();
        assert_eq!(unique.len(), 100);
    }

    #[test]
    fn test_scheme_variants_cover_casing() {
        let variants = generate_scheme_variants();
        assert!(variants.iter().any(|v| v == "JAVASCRIPT:ALERT(1)"));
        assert!(variants.iter().any(|v| v.starts_with('\t')));
    }
}
