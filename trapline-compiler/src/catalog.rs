//! Built-in template catalog
//!
//! Pre-authored payload templates shipped with the console, keyed by the
//! ids operators already know from the platform. Stored as YAML text and
//! parsed on demand through the compiler, so the catalog exercises exactly
//! the same path as operator-supplied documents.

pub const JS_ALERT_DOMAIN: &str = r#"id: jsalertdom
title: XSS alert() domain
description: This payload will show an alert with the current domain.
rules:
  - name: reply with js alert
    protocol: http
    predicates:
    - http.method: get
    results:
    - http.code: 200
    - http.header: |
        Content-Type: application/javascript
      http.body: |
        // show current domain
        alert(document.domain)
"#;

pub const CORS_PREFLIGHT: &str = r#"id: cors
title: CORS (cross origin resource sharing) preflight settings
description: This sends a very permissive CORS reply to any OPTIONS request.
rules:
  - name: OPTIONS call CORS
    protocol: http
    predicates:
    - http.method: options
    results:
    - http.code: 200
    - http.header: "Access-Control-Allow-Credentials: true"
    - http.header: "Access-Control-Allow-Headers: *"
    - http.header: "Access-Control-Allow-Origin: *"
"#;

pub const DNS_LOCALHOST: &str = r#"id: localhost
title: Reply with localhost
description: Reply to DNS A record requests with 127.0.0.1 (but will still log requests).
rules:
  - name: Reply with localhost
    protocol: dns
    predicates:
      - dns.type: A
    results:
      - dns.type: A
      - dns.data: '{"ip":"127.0.0.1"}'
"#;

/// Catalog ids, in display order.
pub fn ids() -> &'static [&'static str] {
    &["jsalertdom", "cors", "localhost"]
}

/// Look up a built-in template document by id.
pub fn builtin(id: &str) -> Option<&'static str> {
    match id {
        "jsalertdom" => Some(JS_ALERT_DOMAIN),
        "cors" => Some(CORS_PREFLIGHT),
        "localhost" => Some(DNS_LOCALHOST),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TemplateCompiler;

    #[test]
    fn every_catalog_entry_compiles() {
        let compiler = TemplateCompiler::new();
        for id in ids() {
            let source = builtin(id).unwrap();
            let template = compiler.parse_template(source).unwrap();
            assert_eq!(&template.id, id);
            assert!(!template.rules.is_empty(), "{id} has no rules");
            for rule in &template.rules {
                assert_eq!(rule.priority, 1);
            }
        }
    }

    #[test]
    fn js_alert_expands_the_combined_entry() {
        let template = TemplateCompiler::new()
            .parse_template(JS_ALERT_DOMAIN)
            .unwrap();
        let components = &template.rules[0].components;
        // method predicate, then code, header, body results
        assert_eq!(components.len(), 4);
        assert!(components[0].is_predicate);
        assert_eq!(components[2].action_name, "http.header");
        assert!(components[3].action_value.contains("alert(document.domain)"));
    }

    #[test]
    fn unknown_ids_are_none() {
        assert!(builtin("xxeoob").is_none());
    }
}
