//! GitHub deep links for suggestion cards.
//!
//! No API calls here: the card's action is a prefilled new-issue URL the
//! user opens in their browser.

use anyhow::{Context, Result};
use std::process::Command;
use url::Url;

const GITHUB_HOST: &str = "https://github.com";

/// Derive the `owner/repo` slug from a repository URL by taking the URL
/// path without its leading slash. No further validation: the analysis
/// already succeeded against whatever the user typed.
pub fn repo_slug(repo_url: &str) -> Result<String> {
    let url = Url::parse(repo_url).context("Invalid repository URL")?;
    Ok(url.path().trim_start_matches('/').to_string())
}

/// Build the prefilled new-issue URL for a suggestion. `body` is the raw
/// markdown description, not the rendered form, so the issue keeps the
/// original formatting.
pub fn new_issue_url(repo_slug: &str, title: &str, body: &str) -> String {
    let mut url = Url::parse(GITHUB_HOST).expect("static URL parses");
    url.set_path(&format!("{}/issues/new", repo_slug));
    url.query_pairs_mut()
        .append_pair("title", title)
        .append_pair("body", body);
    url.to_string()
}

/// Open a URL in the default browser
pub fn open_url(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        Command::new("open")
            .arg(url)
            .spawn()
            .context("Failed to open URL")?;
    }

    #[cfg(target_os = "linux")]
    {
        Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("Failed to open URL")?;
    }

    #[cfg(target_os = "windows")]
    {
        Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("Failed to open URL")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_slug_strips_leading_slash() {
        let slug = repo_slug("https://github.com/rust-lang/cargo").unwrap();
        assert_eq!(slug, "rust-lang/cargo");
    }

    #[test]
    fn test_repo_slug_rejects_garbage() {
        assert!(repo_slug("not a url").is_err());
    }

    #[test]
    fn test_new_issue_url_round_trips_query_params() {
        let title = "Fix the \"flaky\" tests & retries";
        let body = "### Problem\nTests fail 50% of the time.\n\n```rust\nassert!(ok);\n```";
        let link = new_issue_url("rust-lang/cargo", title, body);

        assert!(link.starts_with("https://github.com/rust-lang/cargo/issues/new?"));

        let parsed = Url::parse(&link).unwrap();
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs[0], ("title".to_string(), title.to_string()));
        assert_eq!(pairs[1], ("body".to_string(), body.to_string()));
    }
}
