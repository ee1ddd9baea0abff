//! Minimal standalone page used by rebuild mode.

/// Title of a rebuilt page.
pub const SHELL_TITLE: &str = "Prototype";

/// Tailwind CDN script loaded by every rebuilt page.
pub const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

/// Wrap `fragment` in a complete HTML page: fixed head boilerplate, the
/// Tailwind CDN script, and a body holding only the fragment.
pub fn render_shell(fragment: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{SHELL_TITLE}</title>\n\
         <script src=\"{TAILWIND_CDN}\"></script>\n\
         </head>\n\
         <body>\n\
         {fragment}\n\
         </body>\n\
         </html>\n"
    )
}
