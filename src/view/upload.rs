use crate::persistence::{BranchModel, PointsLogModel, ReportReason, SemesterModel, UploadType};
use crate::service::rating_service::{RatingSummary, STAR_RANGE};
use crate::service::upload_service::UploadListing;
use crate::view::feed::{listing_card, semester_label};
use crate::view::{Chrome, layout, options, timestamp};
use portal_http::escape_html;
use std::fmt::Write;

const SUBJECT_LOOKUP_SCRIPT: &str = "<script>\
(function(){\
var b=document.getElementById('branch'),s=document.getElementById('semester'),\
t=document.getElementById('subject');\
function load(){\
t.innerHTML='<option value=\"\">Select subject</option>';\
if(!b.value||!s.value)return;\
fetch('/ajax/get-subjects?branch_id='+b.value+'&semester_id='+s.value)\
.then(function(r){return r.json();})\
.then(function(list){list.forEach(function(x){\
var o=document.createElement('option');o.value=x.id;o.textContent=x.name;t.appendChild(o);});});}\
b.addEventListener('change',load);s.addEventListener('change',load);})();\
</script>";

pub(crate) fn upload_form(
    chrome: &Chrome,
    branches: &[BranchModel],
    semesters: &[SemesterModel],
) -> String {
    let body = format!(
        "<form class=\"card\" method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\
         <p><select id=\"branch\" name=\"branch\" required><option value=\"\">Select branch</option>{branches}</select> \
         <select id=\"semester\" name=\"semester\" required><option value=\"\">Select semester</option>{semesters}</select> \
         <select id=\"subject\" name=\"subject\" required><option value=\"\">Select subject</option></select></p>\
         <p><label>Title <input name=\"title\" maxlength=\"200\" required></label></p>\
         <p><label>Description <textarea name=\"description\"></textarea></label></p>\
         <p><select name=\"upload_type\" required><option value=\"\">Select type</option>{types}</select></p>\
         <p><input type=\"file\" name=\"file\" required></p>\
         <button type=\"submit\">Upload (+10 points)</button></form>{SUBJECT_LOOKUP_SCRIPT}",
        branches = options(
            branches
                .iter()
                .map(|branch| (branch.id.to_string(), branch.name.as_str())),
            None,
        ),
        semesters = options(
            semesters
                .iter()
                .map(|semester| (semester.id.to_string(), semester_label(semester))),
            None,
        ),
        types = options(
            UploadType::ALL
                .iter()
                .map(|kind| (kind.code().to_string(), kind.label())),
            None,
        ),
    );
    layout(chrome, "Upload study material", &body)
}

fn summary_text(summary: &RatingSummary) -> String {
    match summary.average {
        Some(average) => format!(
            "{average:.1} / 5 from {} rating{}",
            summary.count,
            if summary.count == 1 { "" } else { "s" }
        ),
        None => "No ratings yet".to_string(),
    }
}

pub(crate) fn detail_page(
    chrome: &Chrome,
    listing: &UploadListing,
    summary: &RatingSummary,
    my_rating: Option<i32>,
) -> String {
    let upload = &listing.upload;
    let mut body = String::new();
    let _ = write!(
        body,
        "<div class=\"card\"><p><span class=\"badge\">{kind}</span> \
         <span class=\"badge\">{status}</span> {subject} &middot; by {uploader} &middot; {created}</p>\
         <p>{description}</p>\
         <p><a href=\"/files/{id}\">Download {filename}</a> ({size} bytes)</p>\
         <p>Rating: {rating}</p></div>",
        kind = upload.upload_type.label(),
        status = upload.status.label(),
        subject = escape_html(&listing.subject_name),
        uploader = escape_html(&listing.uploader_username),
        created = timestamp(&upload.created_at),
        description = escape_html(&upload.description),
        id = upload.id,
        filename = escape_html(&upload.original_filename),
        size = upload.byte_size,
        rating = summary_text(summary),
    );

    let selected = my_rating.map(|stars| stars.to_string());
    let _ = write!(
        body,
        "<form class=\"card\" method=\"post\" action=\"/rate/{id}\">\
         <label>Your rating <select name=\"stars\">{stars}</select></label> \
         <button type=\"submit\">Rate</button></form>\
         <form class=\"card\" method=\"post\" action=\"/report/{id}\">\
         <label>Report <select name=\"reason\">{reasons}</select></label> \
         <button type=\"submit\">Report</button></form>",
        id = upload.id,
        stars = options(
            STAR_RANGE.map(|stars| (stars.to_string(), "★".repeat(stars as usize))),
            selected.as_deref(),
        ),
        reasons = options(
            ReportReason::ALL
                .iter()
                .map(|reason| (reason.code().to_string(), reason.label())),
            None,
        ),
    );

    layout(chrome, &upload.title, &body)
}

pub(crate) fn my_uploads_page(
    chrome: &Chrome,
    listings: &[UploadListing],
    history: &[PointsLogModel],
) -> String {
    let mut body = String::new();
    if listings.is_empty() {
        body.push_str("<p>You have not uploaded anything yet. <a href=\"/upload\">Upload now</a></p>");
    }
    for listing in listings {
        body.push_str(&listing_card(listing));
        let _ = write!(
            body,
            "<form class=\"inline\" method=\"post\" action=\"/delete/{}\" \
             onsubmit=\"return confirm('Delete this upload? You will lose 10 points.');\">\
             <button type=\"submit\">Delete</button></form>",
            listing.upload.id
        );
    }
    body.push_str(&points_history(history));
    layout(chrome, "My uploads", &body)
}

/// Newest entries first.
fn points_history(history: &[PointsLogModel]) -> String {
    let mut html = String::from("<h2>Points history</h2>");
    if history.is_empty() {
        html.push_str("<p>No points earned yet.</p>");
        return html;
    }
    html.push_str("<table class=\"points-history\"><tr><th>When</th><th>Action</th><th>Points</th></tr>");
    for entry in history.iter().rev() {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{:+}</td></tr>",
            timestamp(&entry.created_at),
            escape_html(&entry.action),
            entry.points_change
        );
    }
    html.push_str("</table>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_without_ratings() {
        let summary = RatingSummary {
            average: None,
            count: 0,
        };
        assert_eq!(summary_text(&summary), "No ratings yet");
    }

    #[test]
    fn summary_pluralizes() {
        let one = RatingSummary {
            average: Some(5.0),
            count: 1,
        };
        assert_eq!(summary_text(&one), "5.0 / 5 from 1 rating");
        let two = RatingSummary {
            average: Some(2.5),
            count: 2,
        };
        assert_eq!(summary_text(&two), "2.5 / 5 from 2 ratings");
    }

    #[test]
    fn points_history_lists_newest_first() {
        let at = chrono::Utc::now().fixed_offset();
        let entry = |id, action: &str, points_change| PointsLogModel {
            id,
            user_id: 1,
            action: action.to_string(),
            points_change,
            created_at: at,
        };
        let history = [entry(1, "Uploaded notes", 10), entry(2, "Deleted <upload>", -10)];
        let html = my_uploads_page(&Chrome::default(), &[], &history);
        let deleted = html.find("Deleted &lt;upload&gt;").unwrap();
        let uploaded = html.find("Uploaded notes").unwrap();
        assert!(deleted < uploaded);
        assert!(html.contains("<td>+10</td>"));
        assert!(html.contains("<td>-10</td>"));
    }

    #[test]
    fn empty_points_history_says_so() {
        let html = my_uploads_page(&Chrome::default(), &[], &[]);
        assert!(html.contains("No points earned yet."));
    }

    #[test]
    fn upload_form_posts_multipart() {
        let html = upload_form(&Chrome::default(), &[], &[]);
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains("/ajax/get-subjects"));
    }
}
