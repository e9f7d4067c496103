#![warn(missing_docs)]
//! # phish-guard-render
//!
//! ## Purpose
//! Renders [`PresentationState`] and [`PopupView`] values into markup for the
//! two extension surfaces.
//!
//! ## Responsibilities
//! - Build the dismissible in-page warning banner for phishing results.
//! - Keep at most one banner mounted in a [`PageDocument`].
//! - Render the popup summary as an HTML fragment or plain text.
//! - Map semantic colour tokens to literal colours.
//!
//! ## Data flow
//! `phish-guard-ui` decision -> [`render_banner`] -> [`PageDocument::mount_banner`]
//! for the page context; [`PopupView`] -> [`render_popup`] for the popup.
//!
//! ## Security and privacy notes
//! Risk factors and threat types come from the backend and are escaped with
//! [`escape_html`] before they are embedded.

use std::fmt::Write as _;

use phish_guard_ui::{ColorToken, PopupView, PresentationState, ScanPhase, Severity};

/// DOM id of the page warning banner.
pub const BANNER_ID: &str = "phishing-warning-banner";

const BANNER_STYLE: &str = "position: fixed; top: 0; left: 0; width: 100%; \
background-color: #ff4444; color: white; padding: 15px; text-align: left; \
font-size: 16px; z-index: 999999; font-family: Arial, sans-serif; \
box-shadow: 0 2px 4px rgba(0,0,0,0.2);";

const DISMISS_BUTTON_STYLE: &str = "margin-top: 10px; padding: 5px 10px; border: none; \
border-radius: 3px; background: white; cursor: pointer; font-weight: bold;";

/// Escapes a string for safe inclusion in HTML content or quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Literal CSS colour for a popup result box.
pub fn css_color(token: ColorToken) -> &'static str {
    match token {
        ColorToken::Safe => "#00ff00",
        ColorToken::Caution => "#ffa500",
        ColorToken::Danger => "#ff0000",
        ColorToken::Error => "#cccccc",
    }
}

/// CSS class suffix for a popup result box.
pub fn css_class(token: ColorToken) -> &'static str {
    match token {
        ColorToken::Safe => "safe",
        ColorToken::Caution => "warning",
        ColorToken::Danger => "phishing",
        ColorToken::Error => "error",
    }
}

/// Rendered page banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Complete banner element markup.
    pub html: String,
}

/// Renders the page warning banner.
///
/// Returns `None` unless the state is [`Severity::Phishing`]; the page context
/// never shows a banner for safe or suspicious results.
pub fn render_banner(state: &PresentationState) -> Option<Banner> {
    if state.severity != Severity::Phishing {
        return None;
    }

    let mut html = String::new();
    let _ = write!(html, r#"<div id="{BANNER_ID}" style="{BANNER_STYLE}">"#);
    let _ = write!(html, "&#9888;&#65039; {}<br>", escape_html(&state.label));
    let _ = write!(html, "<strong>Confidence:</strong> {}<br>", state.confidence);
    html.push_str(r#"<ul style="margin: 5px 0; padding-left: 20px;">"#);
    for line in &state.detail_lines {
        let _ = write!(html, "<li>{}</li>", escape_html(line));
    }
    html.push_str("</ul>");
    let _ = write!(
        html,
        r#"<button onclick="this.parentElement.remove()" style="{DISMISS_BUTTON_STYLE}">Dismiss Warning</button>"#
    );
    html.push_str("</div>");

    Some(Banner { html })
}

/// One top-level element in the page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNode {
    /// Element id, when it has one.
    pub id: Option<String>,
    /// Element markup.
    pub html: String,
}

/// Owned model of the page body the reporter decorates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageDocument {
    nodes: Vec<PageNode>,
}

impl PageDocument {
    /// Creates a document whose body holds the given markup.
    pub fn with_body(html: impl Into<String>) -> Self {
        Self {
            nodes: vec![PageNode {
                id: None,
                html: html.into(),
            }],
        }
    }

    /// Inserts the banner as the first body element, replacing any previous one.
    pub fn mount_banner(&mut self, banner: Banner) {
        self.remove_banner_nodes();
        self.nodes.insert(
            0,
            PageNode {
                id: Some(BANNER_ID.to_string()),
                html: banner.html,
            },
        );
    }

    /// Removes the banner, as the dismiss button does. Returns `true` if one was
    /// present.
    pub fn dismiss_banner(&mut self) -> bool {
        self.remove_banner_nodes() > 0
    }

    /// Number of banner elements currently mounted.
    pub fn banner_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.id.as_deref() == Some(BANNER_ID))
            .count()
    }

    /// Markup of the mounted banner, if any.
    pub fn banner_html(&self) -> Option<&str> {
        self.nodes
            .iter()
            .find(|node| node.id.as_deref() == Some(BANNER_ID))
            .map(|node| node.html.as_str())
    }

    /// Body elements in document order.
    pub fn nodes(&self) -> &[PageNode] {
        &self.nodes
    }

    /// Serialises the body.
    pub fn to_html(&self) -> String {
        self.nodes.iter().map(|node| node.html.as_str()).collect()
    }

    fn remove_banner_nodes(&mut self) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|node| node.id.as_deref() != Some(BANNER_ID));
        before - self.nodes.len()
    }
}

/// Renders the popup body fragment.
pub fn render_popup(view: &PopupView) -> String {
    let mut html = String::new();

    let disabled = if view.scan_enabled() { "" } else { " disabled" };
    let _ = write!(html, r#"<button id="scanButton"{disabled}>Scan Website</button>"#);

    let loading_display = if view.is_loading() { "block" } else { "none" };
    let _ = write!(
        html,
        r#"<div id="loading" style="display: {loading_display};">Analyzing...</div>"#
    );

    if matches!(view.phase, ScanPhase::Idle | ScanPhase::Loading) {
        return html;
    }

    let token = view.color.unwrap_or(ColorToken::Error);
    let _ = write!(
        html,
        r#"<div id="result" class="result-box {}" style="display: block; background-color: {};">"#,
        css_class(token),
        css_color(token)
    );
    let _ = write!(html, r#"<div id="status">{}</div>"#, escape_html(&view.status));
    let _ = write!(
        html,
        r#"<div id="confidence">{}</div>"#,
        view.confidence_text.as_deref().map(escape_html).unwrap_or_default()
    );
    html.push_str(r#"<ul id="riskFactors">"#);
    for line in &view.detail_lines {
        let _ = write!(html, "<li>{}</li>", escape_html(line));
    }
    html.push_str("</ul></div>");

    html
}

/// Renders the popup summary for a terminal.
pub fn render_popup_text(view: &PopupView) -> String {
    match view.phase {
        ScanPhase::Idle => return "No scan yet.\n".to_string(),
        ScanPhase::Loading => return "Analyzing...\n".to_string(),
        ScanPhase::Result | ScanPhase::Error => {}
    }

    let mut out = String::new();
    let tag = view.color.map(css_class).unwrap_or("error").to_ascii_uppercase();
    let _ = writeln!(out, "[{tag}] {}", view.status);
    if let Some(confidence) = &view.confidence_text {
        let _ = writeln!(out, "{confidence}");
    }
    for line in &view.detail_lines {
        let _ = writeln!(out, "  - {line}");
    }
    out
}

#[cfg(test)]
mod tests {
    //! Unit tests for banner and popup rendering.

    use phish_guard_analysis_contract::AnalysisResult;
    use phish_guard_ui::decide;

    use super::*;

    fn state(confidence: f64, is_phishing: bool, risk_factors: &[&str]) -> PresentationState {
        decide(&AnalysisResult {
            confidence,
            is_phishing,
            risk_factors: risk_factors.iter().map(|s| s.to_string()).collect(),
            external_checks: None,
        })
    }

    #[test]
    fn banner_only_for_phishing() {
        assert!(render_banner(&state(0.1, false, &[])).is_none());
        assert!(render_banner(&state(0.4, false, &[])).is_none());

        let banner = render_banner(&state(0.92, true, &["suspicious domain age"]))
            .expect("phishing state should render banner");
        assert!(banner.html.contains(BANNER_ID));
        assert!(banner.html.contains("position: fixed"));
        assert!(banner.html.contains("92.0%"));
        assert!(banner.html.contains("<li>suspicious domain age</li>"));
        assert!(banner.html.contains("Dismiss Warning"));
    }

    #[test]
    fn banner_escapes_backend_strings() {
        let banner = render_banner(&state(0.9, true, &["<script>alert('x')</script>"]))
            .expect("banner should render");
        assert!(!banner.html.contains("<script>"));
        assert!(banner.html.contains("&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"));
    }

    #[test]
    fn mounting_twice_keeps_one_banner() {
        let mut document = PageDocument::with_body("<p>page</p>");
        let banner = render_banner(&state(0.9, true, &[])).expect("banner should render");

        document.mount_banner(banner.clone());
        document.mount_banner(banner);

        assert_eq!(document.banner_count(), 1);
        assert_eq!(document.nodes()[0].id.as_deref(), Some(BANNER_ID));
        assert!(document.to_html().ends_with("<p>page</p>"));

        assert!(document.dismiss_banner());
        assert_eq!(document.banner_count(), 0);
        assert!(!document.dismiss_banner());
    }

    #[test]
    fn popup_error_omits_confidence() {
        let mut view = PopupView::new();
        assert!(view.begin_scan());
        view.show_error();

        let html = render_popup(&view);
        assert!(html.contains(r#"<div id="confidence"></div>"#));
        assert!(html.contains("result-box error"));
        assert!(!html.contains("disabled"));

        let text = render_popup_text(&view);
        assert!(text.starts_with("[ERROR] Error analyzing website"));
        assert!(!text.contains("Confidence"));
    }

    #[test]
    fn popup_loading_disables_scan_button() {
        let mut view = PopupView::new();
        assert!(view.begin_scan());

        let html = render_popup(&view);
        assert!(html.contains(r#"<button id="scanButton" disabled>"#));
        assert!(html.contains("display: block;"));
    }

    #[test]
    fn popup_result_uses_colour_token() {
        let mut view = PopupView::new();
        assert!(view.begin_scan());
        view.show_result(&state(0.35, false, &["Suspicious keywords found in URL"]));

        let html = render_popup(&view);
        assert!(html.contains("result-box warning"));
        assert!(html.contains("#ffa500"));
        assert!(html.contains("Confidence Score: 35.0%"));

        let text = render_popup_text(&view);
        assert_eq!(
            text,
            "[WARNING] Caution: Website May Be Phished.\n\
             Confidence Score: 35.0%\n  - Suspicious keywords found in URL\n"
        );
    }
}
