//! Server-rendered HTML.
//!
//! Every page goes through [`layout`], which draws the navigation, the
//! requester's point total and the pending flash message. All interpolated
//! text passes through `escape_html`.

pub(crate) mod admin;
pub(crate) mod auth;
pub(crate) mod feed;
pub(crate) mod pages;
pub(crate) mod upload;

use chrono::{DateTime, FixedOffset};
use portal_http::{AuthUser, Flash, escape_html};
use std::fmt::Write;

/// Per-request page furniture.
#[derive(Debug, Clone, Default)]
pub(crate) struct Chrome {
    pub(crate) user: Option<AuthUser>,
    pub(crate) points: i64,
    pub(crate) flash: Option<Flash>,
}

const STYLE: &str = "body{font-family:sans-serif;margin:0;background:#f6f7f9;color:#222}\
header,footer{background:#1f3a5f;color:#fff;padding:.6rem 1rem}\
header a,footer a{color:#fff;margin-right:.8rem}\
main{max-width:960px;margin:1rem auto;padding:0 1rem}\
.flash{padding:.6rem;border-radius:4px;margin-bottom:1rem}\
.flash-success{background:#dff3e3}.flash-info{background:#e3eefb}.flash-error{background:#fbe3e3}\
.card{background:#fff;border:1px solid #ddd;border-radius:4px;padding:.8rem;margin-bottom:.8rem}\
.badge{font-size:.8rem;padding:.1rem .4rem;border-radius:3px;background:#eee}\
.points{float:right}table{width:100%;border-collapse:collapse}\
td,th{border-bottom:1px solid #ddd;padding:.4rem;text-align:left}\
form.inline{display:inline}";

pub(crate) fn layout(chrome: &Chrome, title: &str, body: &str) -> String {
    let mut html = String::with_capacity(body.len() + 2048);
    let _ = write!(
        html,
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{} | Notes Portal</title><style>{STYLE}</style></head><body><header>",
        escape_html(title)
    );

    match &chrome.user {
        Some(user) => {
            html.push_str(
                "<a href=\"/\">Home</a><a href=\"/upload\">Upload</a>\
                 <a href=\"/my-uploads\">My Uploads</a><a href=\"/leaderboard\">Leaderboard</a>",
            );
            if user.is_staff {
                html.push_str(
                    "<a href=\"/admin-panel/uploads\">Moderate</a>\
                     <a href=\"/admin-panel/reports\">Reports</a>",
                );
            }
            let _ = write!(
                html,
                "<span class=\"points\">{} &middot; {} points \
                 <form class=\"inline\" method=\"post\" action=\"/logout\">\
                 <button type=\"submit\">Logout</button></form></span>",
                escape_html(&user.username),
                chrome.points
            );
        }
        None => html.push_str("<a href=\"/login\">Login</a><a href=\"/signup\">Sign up</a>"),
    }
    html.push_str("</header><main>");

    if let Some(flash) = &chrome.flash {
        let _ = write!(
            html,
            "<div class=\"flash flash-{}\">{}</div>",
            flash.level.as_str(),
            escape_html(&flash.message)
        );
    }

    let _ = write!(html, "<h1>{}</h1>{body}</main>", escape_html(title));
    html.push_str(
        "<footer><a href=\"/privacy-policy\">Privacy Policy</a><a href=\"/terms\">Terms</a>\
         <a href=\"/disclaimer\">Disclaimer</a><a href=\"/contact\">Contact</a></footer>\
         </body></html>",
    );
    html
}

/// Bare page for errors raised before the chrome could be assembled.
pub(crate) fn error_page(status: u16, message: &str) -> String {
    layout(
        &Chrome::default(),
        &format!("Error {status}"),
        &format!(
            "<p>{}</p><p><a href=\"/\">Back to home</a></p>",
            escape_html(message)
        ),
    )
}

pub(crate) fn timestamp(at: &DateTime<FixedOffset>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// `<option>` list; `selected` is compared against each value.
pub(crate) fn options<I, L>(items: I, selected: Option<&str>) -> String
where
    I: IntoIterator<Item = (String, L)>,
    L: AsRef<str>,
{
    let mut html = String::new();
    for (value, label) in items {
        let is_selected = selected == Some(value.as_str());
        let _ = write!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            escape_html(&value),
            if is_selected { " selected" } else { "" },
            escape_html(label.as_ref())
        );
    }
    html
}
