//! Stage 1: fetch the target page and extract its interactive elements.

use crate::config::Config;
use crate::elements::{
    ButtonElement, ElementListing, FormElement, FormInput, InputElement, LinkElement,
};
use crate::retry::{self, RetryPolicy};
use crate::theme;
use anyhow::{Context, Result, bail};
use scraper::{ElementRef, Html, Selector};
use std::path::PathBuf;
use std::time::Duration;

/// Page fetches get a tighter bound than the shared client's LLM timeout.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

fn page_request(http: &reqwest::Client, url: &str) -> reqwest::RequestBuilder {
    http.get(url).timeout(FETCH_TIMEOUT)
}

/// Fetch the target page body.  Transient failures are retried; a non-2xx
/// final status is an error.
pub async fn fetch_page(http: &reqwest::Client, url: &str) -> Result<String> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        bail!("URL must start with http:// or https://");
    }
    let parsed = url::Url::parse(url).with_context(|| format!("Invalid URL: {url}"))?;
    if parsed.host_str().is_none() {
        bail!("URL has no host");
    }

    let response = retry::send_with_retry(page_request(http, url), &RetryPolicy::default(), "scrape")
        .await
        .with_context(|| format!("Failed to fetch {url}"))?;

    let status = response.status();
    if !status.is_success() {
        bail!(
            "HTTP {} — {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        );
    }

    response.text().await.context("Failed to read response body")
}

fn attr(el: &ElementRef<'_>, name: &str) -> String {
    el.value().attr(name).unwrap_or("").to_string()
}

fn classes(el: &ElementRef<'_>) -> Vec<String> {
    el.value().classes().map(str::to_string).collect()
}

fn visible_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn selector(css: &str) -> Selector {
    // Selectors here are static and known-valid.
    Selector::parse(css).expect("static selector")
}

/// Extract the four interactive element classes from an HTML document.
///
/// Buttons cover `<button>` plus `<input type="button">`; inputs cover every
/// other `<input>`.  Missing attributes record as empty strings.
pub fn extract_elements(html: &str, source_url: &str) -> ElementListing {
    let document = Html::parse_document(html);
    let mut listing = ElementListing::new(source_url);

    let button_sel = selector("button, input[type=\"button\"]");
    for el in document.select(&button_sel) {
        listing.buttons.push(ButtonElement {
            text: visible_text(&el),
            id: attr(&el, "id"),
            class: classes(&el),
            kind: attr(&el, "type"),
        });
    }

    let link_sel = selector("a");
    for el in document.select(&link_sel) {
        listing.links.push(LinkElement {
            text: visible_text(&el),
            href: attr(&el, "href"),
            id: attr(&el, "id"),
            class: classes(&el),
        });
    }

    let input_sel = selector("input");
    for el in document.select(&input_sel) {
        if attr(&el, "type") == "button" {
            continue;
        }
        listing.inputs.push(InputElement {
            kind: attr(&el, "type"),
            name: attr(&el, "name"),
            id: attr(&el, "id"),
            placeholder: attr(&el, "placeholder"),
        });
    }

    let form_sel = selector("form");
    for el in document.select(&form_sel) {
        let inputs = el
            .select(&input_sel)
            .map(|input| FormInput {
                kind: attr(&input, "type"),
                name: attr(&input, "name"),
            })
            .collect();
        listing.forms.push(FormElement {
            action: attr(&el, "action"),
            method: attr(&el, "method"),
            id: attr(&el, "id"),
            inputs,
        });
    }

    listing
}

/// Run the scrape stage end to end and return the artifact path.
pub async fn run(
    http: &reqwest::Client,
    config: &Config,
    url_override: Option<&str>,
) -> Result<PathBuf> {
    let url = url_override.unwrap_or(&config.target_url);

    let pb = theme::spinner(&format!("Fetching {url}"));
    let html = match fetch_page(http, url).await {
        Ok(body) => {
            theme::spinner_ok(&pb, &format!("Fetched {url}"));
            body
        }
        Err(err) => {
            theme::spinner_fail(&pb, &format!("Failed to fetch {url}"));
            return Err(err);
        }
    };

    let listing = extract_elements(&html, url);
    if listing.is_empty() {
        eprintln!(
            "{}",
            theme::icon_warn("Page yielded no interactive elements")
        );
    }

    let path = config.elements_path();
    listing.save(&path)?;

    println!("{}", theme::label_value("Buttons", &listing.buttons.len().to_string()));
    println!("{}", theme::label_value("Links", &listing.links.len().to_string()));
    println!("{}", theme::label_value("Inputs", &listing.inputs.len().to_string()));
    println!("{}", theme::label_value("Forms", &listing.forms.len().to_string()));
    println!(
        "{}",
        theme::icon_ok(&format!("Saved element listing to {}", path.display()))
    );

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <html><body>
          <nav><a href="/" id="home" class="nav-link">Home</a>
               <a href="/cart">Cart</a></nav>
          <form action="/login" method="post" id="login-form">
            <input type="text" name="username" id="user" placeholder="Username">
            <input type="password" name="password" id="pass">
            <input type="button" name="cancel" value="Cancel">
            <button type="submit" id="submit-btn" class="btn primary">Sign in</button>
          </form>
          <button id="lone">Click me</button>
        </body></html>
    "#;

    #[test]
    fn extracts_buttons_including_input_buttons() {
        let listing = extract_elements(FIXTURE, "https://example.org");
        // Two <button> elements plus one <input type="button">.
        assert_eq!(listing.buttons.len(), 3);
        let submit = listing
            .buttons
            .iter()
            .find(|b| b.id == "submit-btn")
            .unwrap();
        assert_eq!(submit.text, "Sign in");
        assert_eq!(submit.kind, "submit");
        assert_eq!(submit.class, vec!["btn", "primary"]);
    }

    #[test]
    fn input_buttons_are_excluded_from_inputs() {
        let listing = extract_elements(FIXTURE, "https://example.org");
        assert_eq!(listing.inputs.len(), 2);
        assert!(listing.inputs.iter().all(|i| i.kind != "button"));
        let user = listing.inputs.iter().find(|i| i.name == "username").unwrap();
        assert_eq!(user.placeholder, "Username");
    }

    #[test]
    fn links_record_href_and_text() {
        let listing = extract_elements(FIXTURE, "https://example.org");
        assert_eq!(listing.links.len(), 2);
        assert_eq!(listing.links[0].text, "Home");
        assert_eq!(listing.links[0].href, "/");
        // Missing attributes come back as empty strings.
        assert_eq!(listing.links[1].id, "");
    }

    #[test]
    fn forms_carry_nested_inputs() {
        let listing = extract_elements(FIXTURE, "https://example.org");
        assert_eq!(listing.forms.len(), 1);
        let form = &listing.forms[0];
        assert_eq!(form.action, "/login");
        assert_eq!(form.method, "post");
        assert_eq!(form.inputs.len(), 3);
        assert_eq!(form.inputs[0].name, "username");
    }

    #[test]
    fn page_requests_carry_the_fetch_timeout() {
        let http = reqwest::Client::new();
        let req = page_request(&http, "https://example.org")
            .build()
            .unwrap();
        assert_eq!(req.timeout().copied(), Some(FETCH_TIMEOUT));
        assert_eq!(FETCH_TIMEOUT, Duration::from_secs(30));
    }

    #[test]
    fn empty_page_yields_empty_listing() {
        let listing = extract_elements("<html><body><p>hi</p></body></html>", "x");
        assert!(listing.is_empty());
        assert_eq!(listing.len(), 0);
    }
}
