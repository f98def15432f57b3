//! HTML report with alignment columns colored by their probability class.

use crate::libs::confidence::{column_classes, identical_runs, multiple_symbol, ProbClass};
use crate::libs::coord::chunk_coords;
use crate::libs::geometry::letter_sizes;
use crate::libs::maf::MafBlock;

pub const TRAILER: &str = "</body></html>";

fn class_style(class: ProbClass) -> (&'static str, &'static str) {
    // (background color, legend text)
    match class {
        ProbClass::A => ("#3333FF", "prob &gt; 0.999"),
        ProbClass::B => ("#9933FF", "prob &gt; 0.99 "),
        ProbClass::C => ("#FF66CC", "prob &gt; 0.95 "),
        ProbClass::D => ("#FF3333", "prob &gt; 0.9  "),
        ProbClass::E => ("#FF9933", "prob &gt; 0.5  "),
        ProbClass::F => ("#FFFF00", "prob &le; 0.5  "),
    }
}

/// Document prologue: styles and the color legend.
pub fn header_lines() -> Vec<String> {
    let mut lines = vec![
        String::new(),
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN""#.to_string(),
        r#" "http://www.w3.org/TR/html4/strict.dtd">"#.to_string(),
        r#"<html lang="en"><head>"#.to_string(),
        r#"<meta http-equiv="Content-type" content="text/html; charset=UTF-8">"#.to_string(),
        "<title>Reliable Alignments</title>".to_string(),
        r#"<style type="text/css">"#.to_string(),
        "/* Try to force monospace, working around browser insanity: */".to_string(),
        r#"pre {font-family: "Courier New", monospace, serif; font-size: 0.8125em}"#.to_string(),
    ];
    for class in ProbClass::ALL {
        let (color, _) = class_style(class);
        lines.push(format!(".{} {{background-color: {}}}", class.css(), color));
    }
    lines.push(".key {display:inline; margin-right:2em}".to_string());
    lines.push("</style>".to_string());
    lines.push("</head><body>".to_string());
    lines.push(String::new());

    lines.push(r#"<div style="line-height:1">"#.to_string());
    for class in ProbClass::ALL {
        let (_, legend) = class_style(class);
        lines.push(format!(
            r#"<pre class="key"><span class="{}">  </span> {}</pre>"#,
            class.css(),
            legend
        ));
    }
    lines.push("</div>".to_string());
    lines.push(String::new());

    lines
}

fn html_spans(text: &str, runs: &[(Option<ProbClass>, usize, usize)]) -> String {
    runs.iter()
        .map(|(class, beg, end)| match class {
            Some(c) => format!(r#"<span class="{}">{}</span>"#, c.css(), &text[*beg..*end]),
            None => text[*beg..*end].to_string(),
        })
        .collect()
}

/// Renders one block as an `<h3>` title and a wrapped, color-coded `<pre>`.
pub fn to_html(block: &MafBlock, line_size: usize) -> Vec<String> {
    let mut title = "Alignment".to_string();
    if let Some(score) = block.annotation("score") {
        title += &format!(" score={}", score);
        if let Some(expect) = block.annotation("expect") {
            title += &format!(", expect={}", expect);
        }
    }

    let mut lines = vec![format!("<h3>{}:</h3>", title), "<pre>".to_string()];

    let classes = column_classes(block);
    let name_width = block
        .components
        .iter()
        .map(|c| c.src.len())
        .max()
        .unwrap_or(0);

    for chunk in chunk_coords(block, &letter_sizes(block), line_size) {
        let start_width = chunk.starts.iter().map(|s| s.len()).max().unwrap_or(0);
        let end_width = chunk.ends.iter().map(|s| s.len()).max().unwrap_or(0);
        let runs = identical_runs(&classes[chunk.beg..chunk.end]);

        for (i, comp) in block.components.iter().enumerate() {
            let spans = html_spans(&comp.text[chunk.beg..chunk.end], &runs);
            lines.push(format!(
                "{:<name_width$} {:>start_width$} {} {:>end_width$}",
                comp.src, chunk.starts[i], spans, chunk.ends[i],
            ));
        }

        let symbols: String = (chunk.beg..chunk.end)
            .map(|i| multiple_symbol(&block.column(i)))
            .collect();
        lines.push(format!(
            "{} {} {}",
            " ".repeat(name_width),
            " ".repeat(start_width),
            symbols
        ));
        lines.push(String::new());
    }

    lines.push("</pre>".to_string());
    lines
}
