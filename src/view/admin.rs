use crate::persistence::UploadStatus;
use crate::service::report_service::ReportListing;
use crate::service::upload_service::UploadListing;
use crate::view::{Chrome, layout, timestamp};
use portal_http::escape_html;
use std::fmt::Write;

fn moderation_buttons(listing: &UploadListing) -> String {
    let id = listing.upload.id;
    let mut html = String::new();
    if listing.upload.status != UploadStatus::Verified {
        let _ = write!(
            html,
            "<form class=\"inline\" method=\"post\" action=\"/admin-panel/uploads/{id}/verify\">\
             <button type=\"submit\">Verify</button></form> "
        );
    }
    if listing.upload.status != UploadStatus::Removed {
        let _ = write!(
            html,
            "<form class=\"inline\" method=\"post\" action=\"/admin-panel/uploads/{id}/remove\">\
             <button type=\"submit\">Remove</button></form>"
        );
    }
    html
}

pub(crate) fn uploads_page(chrome: &Chrome, listings: &[UploadListing]) -> String {
    let mut body = String::from(
        "<table><tr><th>Title</th><th>Subject</th><th>Uploader</th><th>Type</th>\
         <th>Status</th><th>Uploaded</th><th></th></tr>",
    );
    for listing in listings {
        let upload = &listing.upload;
        let _ = write!(
            body,
            "<tr><td><a href=\"/view/{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td></tr>",
            upload.id,
            escape_html(&upload.title),
            escape_html(&listing.subject_name),
            escape_html(&listing.uploader_username),
            upload.upload_type.label(),
            upload.status.label(),
            timestamp(&upload.created_at),
            moderation_buttons(listing),
        );
    }
    body.push_str("</table>");
    layout(chrome, "All uploads", &body)
}

pub(crate) fn reports_page(chrome: &Chrome, reports: &[ReportListing]) -> String {
    let mut body = String::from(
        "<table><tr><th>Upload</th><th>Reporter</th><th>Reason</th><th>Reported</th></tr>",
    );
    for listing in reports {
        let report = &listing.report;
        let _ = write!(
            body,
            "<tr><td><a href=\"/view/{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>",
            report.upload_id,
            escape_html(&listing.upload_title),
            escape_html(&listing.reporter_username),
            report.reason.label(),
            timestamp(&report.created_at),
        );
    }
    body.push_str("</table>");
    if reports.is_empty() {
        body.push_str("<p>No reports filed.</p>");
    }
    layout(chrome, "Reports", &body)
}
