//! Plain HTML rendering for the three pages.
//!
//! All interpolated data passes through [`escape`]; provider messages and
//! user-typed values never reach the page unescaped.

use std::fmt::Write as _;

use axum::response::Html;

use clipcast_core::LinkedAccount;
use clipcast_tiktok::TikTokUser;

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{}</title></head>\n<body>\n{body}\n</body>\n</html>\n",
        escape(title)
    ))
}

fn notice_block(success: Option<&str>, error: Option<&str>) -> String {
    let mut block = String::new();
    if let Some(message) = success {
        let _ = writeln!(block, "<p class=\"success\">{}</p>", escape(message));
    }
    if let Some(message) = error {
        let _ = writeln!(block, "<p class=\"error\">{}</p>", escape(message));
    }
    block
}

/// Landing page with links to both providers' logins.
pub fn landing_page(error: Option<&str>) -> Html<String> {
    let body = format!(
        "{notices}<h1>clipcast</h1>\n\
         <p>Publish a hosted video to your social accounts.</p>\n\
         <ul>\n\
         <li><a href=\"/insta/login\">Connect Instagram</a></li>\n\
         <li><a href=\"/tiktok/login\">Connect TikTok</a></li>\n\
         </ul>",
        notices = notice_block(None, error),
    );
    page("clipcast", &body)
}

/// Instagram publish form, listing the resolved destination accounts.
pub fn publish_page(
    accounts: &[LinkedAccount],
    success: Option<&str>,
    error: Option<&str>,
) -> Html<String> {
    let mut options = String::new();
    for account in accounts {
        let label = match &account.username {
            Some(username) => format!("{} (@{})", account.name, username),
            None => account.name.clone(),
        };
        let _ = writeln!(
            options,
            "<option value=\"{}\">{}</option>",
            escape(&account.id),
            escape(&label)
        );
    }

    let body = format!(
        "{notices}<h1>Publish to Instagram Reels</h1>\n\
         <form method=\"post\" action=\"/insta/publish\">\n\
         <label>Account <select name=\"ig_user_id\">\n{options}</select></label>\n\
         <label>Video URL <input type=\"url\" name=\"video_url\" required></label>\n\
         <button type=\"submit\">Publish</button>\n\
         </form>",
        notices = notice_block(success, error),
    );
    page("Publish to Instagram", &body)
}

/// TikTok upload form with the authenticated user's display info.
pub fn upload_page(
    user: Option<&TikTokUser>,
    success: Option<&str>,
    error: Option<&str>,
) -> Html<String> {
    let mut greeting = String::new();
    if let Some(user) = user {
        let _ = writeln!(
            greeting,
            "<p>Signed in as {}</p>",
            escape(&user.display_name)
        );
    }

    let body = format!(
        "{notices}<h1>Upload to TikTok</h1>\n{greeting}\
         <form method=\"post\" action=\"/tiktok/upload\">\n\
         <label>Video URL <input type=\"url\" name=\"video_url\" required></label>\n\
         <button type=\"submit\">Upload</button>\n\
         </form>",
        notices = notice_block(success, error),
    );
    page("Upload to TikTok", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape("<script>alert('&\"')</script>"),
            "&lt;script&gt;alert(&#39;&amp;&quot;&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn landing_page_renders_error_escaped() {
        let Html(html) = landing_page(Some("token <expired>"));
        assert!(html.contains("token &lt;expired&gt;"));
        assert!(!html.contains("token <expired>"));
    }

    #[test]
    fn publish_page_lists_accounts_with_optional_handles() {
        let accounts = vec![
            LinkedAccount {
                id: "IG1".to_owned(),
                name: "Acme".to_owned(),
                username: Some("acme_official".to_owned()),
            },
            LinkedAccount {
                id: "IG2".to_owned(),
                name: "Globex".to_owned(),
                username: None,
            },
        ];
        let Html(html) = publish_page(&accounts, None, None);
        assert!(html.contains("Acme (@acme_official)"));
        assert!(html.contains(">Globex<"));
        assert!(html.contains("value=\"IG1\""));
    }

    #[test]
    fn publish_page_shows_success_notice() {
        let Html(html) = publish_page(&[], Some("Video #M999 published successfully"), None);
        assert!(html.contains("Video #M999 published successfully"));
    }

    #[test]
    fn upload_page_greets_user() {
        let user = TikTokUser {
            display_name: "Clip Caster".to_owned(),
            open_id: "open-1".to_owned(),
            union_id: None,
            avatar_url: None,
        };
        let Html(html) = upload_page(Some(&user), None, None);
        assert!(html.contains("Signed in as Clip Caster"));
    }
}
