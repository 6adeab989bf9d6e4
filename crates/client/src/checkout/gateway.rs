//! Gateway handoff for the ONLINE payment path.
//!
//! The gateway expects a browser-native form POST to its hosted payment
//! page, with every server-provided parameter as a hidden field. The
//! client renders an auto-submitting form; control leaves the application
//! once it submits, and the gateway returns via its own redirect URLs.

use std::collections::BTreeMap;

/// A prepared cross-site form POST to the gateway's hosted page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayRedirect {
    /// The gateway URL the form posts to.
    pub action: String,
    /// Hidden fields, passed through verbatim from the backend.
    pub fields: BTreeMap<String, String>,
}

impl GatewayRedirect {
    /// Render a minimal HTML page whose form submits itself on load.
    #[must_use]
    pub fn auto_submit_form(&self) -> String {
        let mut inputs = String::new();
        for (name, value) in &self.fields {
            inputs.push_str(&format!(
                "    <input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
                escape(name),
                escape(value)
            ));
        }

        format!(
            "<!doctype html>\n\
             <html>\n\
             <body onload=\"document.forms[0].submit()\">\n\
             <form method=\"post\" action=\"{}\">\n\
             {inputs}\
             </form>\n\
             <p>Redirecting to the payment page&hellip;</p>\n\
             </body>\n\
             </html>\n",
            escape(&self.action)
        )
    }
}

/// Escape a string for use inside an HTML attribute value.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_carries_every_field() {
        let redirect = GatewayRedirect {
            action: "https://secure.payu.in/_payment".to_owned(),
            fields: BTreeMap::from([
                ("key".to_owned(), "merchant-key".to_owned()),
                ("txnid".to_owned(), "txn-123".to_owned()),
                ("hash".to_owned(), "abc123".to_owned()),
            ]),
        };

        let html = redirect.auto_submit_form();
        assert!(html.contains("action=\"https://secure.payu.in/_payment\""));
        assert!(html.contains("name=\"key\" value=\"merchant-key\""));
        assert!(html.contains("name=\"txnid\" value=\"txn-123\""));
        assert!(html.contains("name=\"hash\" value=\"abc123\""));
        assert!(html.contains("document.forms[0].submit()"));
    }

    #[test]
    fn field_values_are_escaped() {
        let redirect = GatewayRedirect {
            action: "https://gw.example/pay".to_owned(),
            fields: BTreeMap::from([(
                "productinfo".to_owned(),
                "Tee \"Summer\" <black & white>".to_owned(),
            )]),
        };

        let html = redirect.auto_submit_form();
        assert!(html.contains("Tee &quot;Summer&quot; &lt;black &amp; white&gt;"));
        assert!(!html.contains("<black"));
    }
}
