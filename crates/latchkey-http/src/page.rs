//! Status page rendering.
//!
//! One fixed-structure HTML document whose dynamic parts are the lock-state
//! text, an optional invalid-PIN notice, and which action the PIN form
//! offers (always the opposite of the current state).

use latchkey_core::LockState;

/// Render the status page for the given post-toggle state.
///
/// `invalid_pin` adds the red rejection notice; it should be set only when a
/// non-empty, incorrect PIN was supplied.
pub fn render_page(state: LockState, invalid_pin: bool) -> String {
    let mut page = String::with_capacity(1024);
    let mut line = |text: &str| {
        page.push_str(text);
        page.push_str("\r\n");
    };

    line("<!DOCTYPE html><html>");
    line("<head><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    line("<link rel=\"icon\" href=\"data:,\">");

    line("<style>");
    line("html { font-family: Helvetica; display: inline-block; margin: 0px auto; text-align: center;}");
    line(".button { background-color: #4CAF50; border: none; color: white; padding: 16px 40px;");
    line("text-decoration: none; font-size: 30px; margin: 2px; cursor: pointer;}");
    line(".button2 {background-color: #555555;}");
    line("input[type=number] {width: 100px; padding: 12px 20px; margin: 8px 0; box-sizing: border-box;}");
    line("</style></head>");

    line("<body><h1>Smart Lock</h1>");
    line(&format!("<p>Lock State: {}</p>", state.display_text()));

    if invalid_pin {
        line("<p style='color:red'>Invalid PIN code!</p>");
    }

    if state.is_locked() {
        line("<form action=\"/unlock\" method=\"post\">");
        line("<input type=\"number\" name=\"pin\" placeholder=\"Enter PIN\" required>");
        line("<p><button type=\"submit\" class=\"button\">Unlock</button></p>");
        line("</form>");
    } else {
        line("<form action=\"/lock\" method=\"post\">");
        line("<input type=\"number\" name=\"pin\" placeholder=\"Enter PIN\" required>");
        line("<p><button type=\"submit\" class=\"button button2\">Lock</button></p>");
        line("</form>");
    }

    line("</body></html>");
    page
}
