// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_article(paragraphs: usize) -> String {
    let mut html = String::from(r#"<div id="parent-container"><div>"#);
    for i in 0..paragraphs {
        html.push_str(&format!(
            "<h2>Section {i}</h2><p>Paragraph {i} has <b>bold</b> and <i>italic</i> words, \
             plus a <a href=\"#s{i}\">link</a> to keep the tree realistic.</p>"
        ));
    }
    html.push_str("</div></div>");
    html
}

#[allow(dead_code)]
pub fn generate_nested(depth: usize) -> String {
    let mut html = String::from(r#"<div id="parent-container">"#);
    for level in 0..depth {
        html.push_str(&format!("<section><p>Level {level} text</p>"));
    }
    html.push_str("deepest");
    for _ in 0..depth {
        html.push_str("</section>");
    }
    html.push_str("</div>");
    html
}
