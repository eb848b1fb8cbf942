use crate::persistence::{BranchModel, SemesterModel, UploadType};
use crate::service::points_service::LeaderboardEntry;
use crate::service::taxonomy_service::SubjectOption;
use crate::service::upload_service::UploadListing;
use crate::view::{Chrome, layout, options, timestamp};
use portal_http::escape_html;
use std::fmt::Write;

/// Raw query values echoed back into the filter form.
#[derive(Debug, Default)]
pub(crate) struct FeedSelection {
    pub(crate) branch: Option<String>,
    pub(crate) semester: Option<String>,
    pub(crate) subject: Option<String>,
    pub(crate) upload_type: Option<String>,
}

pub(crate) struct HomeView<'a> {
    pub(crate) branches: &'a [BranchModel],
    pub(crate) semesters: &'a [SemesterModel],
    pub(crate) subjects: &'a [SubjectOption],
    pub(crate) selection: &'a FeedSelection,
    pub(crate) listings: &'a [UploadListing],
}

pub(crate) fn listing_card(listing: &UploadListing) -> String {
    let upload = &listing.upload;
    format!(
        "<div class=\"card\"><h3><a href=\"/view/{id}\">{title}</a></h3>\
         <p><span class=\"badge\">{kind}</span> <span class=\"badge\">{status}</span> \
         {subject} &middot; by {uploader} &middot; {created}</p></div>",
        id = upload.id,
        title = escape_html(&upload.title),
        kind = upload.upload_type.label(),
        status = upload.status.label(),
        subject = escape_html(&listing.subject_name),
        uploader = escape_html(&listing.uploader_username),
        created = timestamp(&upload.created_at),
    )
}

pub(crate) fn home_page(chrome: &Chrome, view: &HomeView<'_>) -> String {
    let selection = view.selection;
    let mut body = String::new();
    let _ = write!(
        body,
        "<form class=\"card\" method=\"get\" action=\"/\">\
         <select name=\"branch\"><option value=\"\">All branches</option>{}</select> \
         <select name=\"semester\"><option value=\"\">All semesters</option>{}</select> \
         <select name=\"subject\"><option value=\"\">All subjects</option>{}</select> \
         <select name=\"type\"><option value=\"\">All types</option>{}</select> \
         <button type=\"submit\">Filter</button></form>",
        options(
            view.branches
                .iter()
                .map(|branch| (branch.id.to_string(), branch.name.as_str())),
            selection.branch.as_deref(),
        ),
        options(
            view.semesters
                .iter()
                .map(|semester| (semester.id.to_string(), semester_label(semester))),
            selection.semester.as_deref(),
        ),
        options(
            view.subjects
                .iter()
                .map(|subject| (subject.id.to_string(), subject.name.as_str())),
            selection.subject.as_deref(),
        ),
        options(
            UploadType::ALL
                .iter()
                .map(|kind| (kind.code().to_string(), kind.label())),
            selection.upload_type.as_deref(),
        ),
    );

    if view.listings.is_empty() {
        body.push_str("<p>No uploads match these filters yet.</p>");
    }
    for listing in view.listings {
        body.push_str(&listing_card(listing));
    }

    layout(chrome, "Study materials", &body)
}

pub(crate) fn semester_label(semester: &SemesterModel) -> String {
    format!("Semester {}", semester.number)
}

pub(crate) fn leaderboard_page(chrome: &Chrome, entries: &[LeaderboardEntry]) -> String {
    let mut body = String::from("<table><tr><th>#</th><th>User</th><th>Points</th></tr>");
    for (rank, entry) in entries.iter().enumerate() {
        let _ = write!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            rank + 1,
            escape_html(&entry.username),
            entry.total
        );
    }
    body.push_str("</table>");
    if entries.is_empty() {
        body.push_str("<p>Nobody has earned points yet.</p>");
    }
    layout(chrome, "Leaderboard", &body)
}
