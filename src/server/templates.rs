//! HTML views. Plain `format!` rendering; every interpolated value is escaped.

pub const INVALID_CREDENTIALS: &str = "Invalid Username/Password";

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

const PAGE_STYLE: &str = "font-family: Arial; text-align: center; padding: 50px;";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n    <head><title>{}</title></head>\n    <body style=\"{}\">\n{}\n    </body>\n</html>\n",
        escape_html(title), PAGE_STYLE, body
    )
}

/// Pod identity page served in `hello` mode.
pub fn hello_page(hostname: &str, version: &str) -> String {
    let body = format!(
        "        <h1>Hello from Kubernetes!</h1>\n        <p><strong>Pod hostname:</strong> {}</p>\n        <p><strong>Version:</strong> {}</p>\n        <p>Refresh the page to see load balancing in action!</p>",
        escape_html(hostname), escape_html(version)
    );
    page("Hello from Kubernetes", &body)
}

pub fn login_page(error: Option<&str>) -> String {
    let err = match error {
        Some(msg) => format!("        <p class=\"error\" style=\"color: #c0392b;\">{}</p>\n", escape_html(msg)),
        None => String::new(),
    };
    let body = format!(
        "        <h1>Login</h1>\n{}        <form method=\"post\" action=\"/login\">\n            <p><input type=\"text\" name=\"username\" placeholder=\"Username\" required></p>\n            <p><input type=\"password\" name=\"password\" placeholder=\"Password\" required></p>\n            <p><button type=\"submit\">Login</button></p>\n        </form>",
        err
    );
    page("Login", &body)
}

pub fn dashboard_page(user: &str, hostname: &str, version: &str) -> String {
    let body = format!(
        "        <h1>Welcome, {}!</h1>\n        <p><strong>Pod hostname:</strong> {}</p>\n        <p><strong>Version:</strong> {}</p>\n        <p>Refresh the page to see load balancing in action!</p>\n        <p><a href=\"/logout\">Logout</a></p>",
        escape_html(user), escape_html(hostname), escape_html(version)
    );
    page("Dashboard", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<b>\"a\" & 'b'</b>"), "&lt;b&gt;&quot;a&quot; &amp; &#x27;b&#x27;&lt;/b&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn login_page_error_is_optional() {
        assert!(!login_page(None).contains(INVALID_CREDENTIALS));
        let html = login_page(Some(INVALID_CREDENTIALS));
        assert!(html.contains(INVALID_CREDENTIALS));
        assert!(html.contains("name=\"username\""));
        assert!(html.contains("name=\"password\""));
    }

    #[test]
    fn dashboard_shows_identity() {
        let html = dashboard_page("admin", "pod-7f9c", "v3");
        assert!(html.contains("Welcome, admin!"));
        assert!(html.contains("pod-7f9c"));
        assert!(html.contains("v3"));
        assert!(html.contains("href=\"/logout\""));
    }

    #[test]
    fn dashboard_escapes_user() {
        let html = dashboard_page("<script>", "h", "v1");
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn hello_page_mentions_load_balancing() {
        let html = hello_page("pod-a", "v1.0");
        assert!(html.contains("Hello from Kubernetes!"));
        assert!(html.contains("pod-a"));
        assert!(html.contains("load balancing"));
    }
}
