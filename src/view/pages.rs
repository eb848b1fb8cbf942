//! Footer pages. Static copy, rendered inside the normal layout.

use crate::view::{Chrome, layout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StaticPage {
    PrivacyPolicy,
    Terms,
    Disclaimer,
    Contact,
}

impl StaticPage {
    pub(crate) const ALL: [StaticPage; 4] = [
        Self::PrivacyPolicy,
        Self::Terms,
        Self::Disclaimer,
        Self::Contact,
    ];

    pub(crate) fn path(self) -> &'static str {
        match self {
            Self::PrivacyPolicy => "/privacy-policy",
            Self::Terms => "/terms",
            Self::Disclaimer => "/disclaimer",
            Self::Contact => "/contact",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::PrivacyPolicy => "Privacy Policy",
            Self::Terms => "Terms of Use",
            Self::Disclaimer => "Disclaimer",
            Self::Contact => "Contact",
        }
    }

    fn body(self) -> &'static str {
        match self {
            Self::PrivacyPolicy => {
                "<p>We store your username, email address and the files you upload. \
                 Passwords are kept only as salted hashes. Your username and point total \
                 appear on the public leaderboard.</p>"
            }
            Self::Terms => {
                "<p>Upload only material you have the right to share. Uploads are \
                 reviewed by moderators and may be removed without notice. Points have \
                 no monetary value.</p>"
            }
            Self::Disclaimer => {
                "<p>Study materials are contributed by students and are provided as is. \
                 Verified uploads were checked by a moderator, but no material is \
                 guaranteed to be correct or complete.</p>"
            }
            Self::Contact => {
                "<p>Questions, takedown requests or problems with an upload? Use the \
                 report button on the upload page or contact a moderator.</p>"
            }
        }
    }
}

pub(crate) fn static_page(chrome: &Chrome, page: StaticPage) -> String {
    layout(chrome, page.title(), page.body())
}
