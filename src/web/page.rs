use std::fmt::Write as _;

use crate::{
    foundation::error::ArtError,
    pipeline::Generation,
    request::params::{
        GenerationParams, NTH_RANGE, NUM_SHAPES_RANGE, OUTPUT_SIZE_RANGE, OutputFormat,
        REPEAT_RANGE, RESIZE_RANGE, ShapeMode, WORKERS_RANGE,
    },
};

/// What the preview column shows.
pub enum Outcome<'a> {
    Blank,
    Done(&'a Generation),
    Failed(&'a ArtError),
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn render(params: &GenerationParams, outcome: Outcome<'_>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str(HEAD);
    html.push_str("<main>");
    render_form(&mut html, params);
    render_preview(&mut html, outcome);
    html.push_str("</main></body></html>");
    html
}

fn number_input(
    html: &mut String,
    label: &str,
    name: &str,
    value: u32,
    range: &std::ops::RangeInclusive<u32>,
) {
    let _ = write!(
        html,
        r#"<label>{label} <input type="number" name="{name}" value="{value}" min="{}" max="{}"></label>"#,
        range.start(),
        range.end()
    );
}

fn checkbox(html: &mut String, label: &str, name: &str, checked: bool) {
    let _ = write!(
        html,
        r#"<label><input type="checkbox" name="{name}"{}> {label}</label>"#,
        if checked { " checked" } else { "" }
    );
}

fn render_form(html: &mut String, params: &GenerationParams) {
    html.push_str(
        r#"<form class="settings" method="post" action="/generate" enctype="multipart/form-data">
<h3>Settings</h3>
<label>Upload image <input type="file" name="image" accept=".png,.jpg,.jpeg,image/png,image/jpeg" required></label>"#,
    );

    number_input(html, "Number of shapes (-n)", "num_shapes", params.num_shapes, &NUM_SHAPES_RANGE);

    html.push_str(r#"<label>Shape mode (-m) <select name="mode">"#);
    for mode in ShapeMode::ALL {
        let _ = write!(
            html,
            r#"<option value="{}"{}>{mode}</option>"#,
            mode.code(),
            if mode == params.mode { " selected" } else { "" }
        );
    }
    html.push_str("</select></label>");

    let bg = params.background.as_hex();
    let bg_type = if bg.len() == 6 { "color" } else { "text" };
    let _ = write!(
        html,
        r##"<label>Background color (-bg) <input type="{bg_type}" name="background" value="#{}"></label>"##,
        escape_html(bg)
    );
    let _ = write!(
        html,
        r#"<label>Alpha (-a) <input type="number" name="alpha" value="{}" min="0" max="255"></label>"#,
        params.alpha
    );
    number_input(html, "Resize input (-r)", "resize", params.resize, &RESIZE_RANGE);
    number_input(html, "Output size (-s)", "output_size", params.output_size, &OUTPUT_SIZE_RANGE);

    html.push_str("<details><summary>Advanced options</summary>");
    number_input(html, "Repeat (-rep)", "repeat", params.repeat, &REPEAT_RANGE);
    number_input(html, "Frame interval (-nth)", "nth", params.nth, &NTH_RANGE);
    number_input(html, "Workers (-j)", "workers", params.workers, &WORKERS_RANGE);

    html.push_str(r#"<label>Output format <select name="format">"#);
    for format in OutputFormat::ALL {
        let _ = write!(
            html,
            r#"<option value="{format}"{}>{}</option>"#,
            if format == params.format { " selected" } else { "" },
            format.extension().to_ascii_uppercase()
        );
    }
    html.push_str("</select></label>");
    checkbox(html, "Verbose (-v)", "verbose", params.verbose);
    checkbox(html, "Very verbose (-vv)", "very_verbose", params.very_verbose);
    html.push_str("</details>");

    html.push_str(r#"<button type="submit">Generate artwork</button></form>"#);
}

fn render_preview(html: &mut String, outcome: Outcome<'_>) {
    html.push_str(r#"<section class="preview"><h3>Art preview</h3>"#);
    match outcome {
        Outcome::Blank => {
            html.push_str("<p>Upload an image and press Generate.</p>");
        }
        Outcome::Failed(err) => {
            let _ = write!(
                html,
                r#"<p class="error">{}</p>"#,
                escape_html(&err.user_message())
            );
        }
        Outcome::Done(generation) => {
            let _ = write!(
                html,
                r#"<div class="columns">
<figure><figcaption>Input</figcaption><img src="{}" alt="input"></figure>
<figure><figcaption>Output</figcaption><img src="{}" alt="output"></figure>
</div>"#,
                generation.input.data_uri(),
                generation.output.data_uri()
            );
            let _ = write!(
                html,
                r#"<p><a class="download" href="{}" download="{}">Download your artwork</a></p>"#,
                generation.output.data_uri(),
                escape_html(&generation.output.file_name)
            );
            html.push_str("<h3>Generated command</h3>");
            for command in &generation.commands {
                let _ = write!(html, "<pre>{}</pre>", escape_html(&command.to_string()));
            }
            let _ = write!(
                html,
                "<p>Finished in {:.1}s</p>",
                generation.elapsed.as_secs_f64()
            );
        }
    }
    html.push_str("</section>");
}

const HEAD: &str = r#"<!doctype html>
<html><head><meta charset="utf-8"><title>Primitive Art Generator</title>
<style>
body { font-family: sans-serif; margin: 0; background: #f7fff7; }
header { text-align: center; padding: 2rem; background: linear-gradient(135deg, #ff6b6b, #4ecdc4); color: white; }
main { display: grid; grid-template-columns: 3fr 7fr; gap: 1.5rem; padding: 1.5rem; }
form.settings { border: 2px solid #4ecdc4; border-radius: 15px; padding: 1.5rem; background: white; }
form.settings label { display: block; margin: 0.6rem 0; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
figure img { width: 100%; object-fit: contain; border: 2px solid #4ecdc4; border-radius: 10px; }
.error { color: #b00020; font-weight: bold; }
a.download { display: inline-block; padding: 1rem 2rem; background: #4ecdc4; color: white; border-radius: 25px; text-decoration: none; }
pre { background: #2c3e50; color: #f7fff7; padding: 1rem; border-radius: 8px; overflow-x: auto; }
</style></head>
<body><header><h1>Primitive Art Generator</h1><p>Turn an image into geometric shapes.</p></header>
"#;

#[cfg(test)]
#[path = "../../tests/unit/web/page.rs"]
mod tests;
