use crate::view::{Chrome, layout};

pub(crate) fn signup_page(chrome: &Chrome) -> String {
    layout(
        chrome,
        "Sign up",
        "<form class=\"card\" method=\"post\" action=\"/signup\">\
         <p><label>Username <input name=\"username\" maxlength=\"150\" required></label></p>\
         <p><label>Email <input name=\"email\" type=\"email\"></label></p>\
         <p><label>Password <input name=\"password\" type=\"password\" required></label></p>\
         <p><label>Confirm password <input name=\"confirm_password\" type=\"password\" required></label></p>\
         <button type=\"submit\">Create account</button></form>\
         <p>Already registered? <a href=\"/login\">Login</a></p>",
    )
}

pub(crate) fn login_page(chrome: &Chrome) -> String {
    layout(
        chrome,
        "Login",
        "<form class=\"card\" method=\"post\" action=\"/login\">\
         <p><label>Username <input name=\"username\" required></label></p>\
         <p><label>Password <input name=\"password\" type=\"password\" required></label></p>\
         <button type=\"submit\">Login</button></form>\
         <p>New here? <a href=\"/signup\">Create an account</a></p>",
    )
}
